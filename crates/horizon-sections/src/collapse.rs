//! Collapse toggling and the collapse event stream.

use std::fmt;

use horizon_sections_core::{ConnectionId, Signal};

use crate::store::{SectionItem, SectionKey, SectionStore};

/// A section's collapsed state changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollapseEvent<S> {
    section: S,
    collapsed: bool,
}

impl<S> CollapseEvent<S> {
    /// Create an event.
    pub fn new(section: S, collapsed: bool) -> Self {
        Self { section, collapsed }
    }

    /// The toggled section.
    pub fn section(&self) -> &S {
        &self.section
    }

    /// The section's state after the toggle.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }
}

impl<S: fmt::Display> fmt::Display for CollapseEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.collapsed { "collapsed" } else { "expanded" };
        write!(f, "{} {state}", self.section)
    }
}

/// Multicast stream of [`CollapseEvent`]s.
///
/// Subscribers receive events published after they subscribe, in publish
/// order. There is no replay.
pub struct CollapseStream<S> {
    signal: Signal<CollapseEvent<S>>,
}

impl<S> Default for CollapseStream<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CollapseStream<S> {
    /// Create a stream with no subscribers.
    pub fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Register a subscriber.
    pub fn subscribe<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&CollapseEvent<S>) + Send + Sync + 'static,
    {
        self.signal.connect(subscriber)
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.signal.disconnect(id)
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.signal.connection_count()
    }

    /// Deliver `event` to every subscriber. Returns how many were reached.
    pub fn publish(&self, event: CollapseEvent<S>) -> usize {
        self.signal.emit(event)
    }
}

impl<S> fmt::Debug for CollapseStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollapseStream")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Flip the stored collapsed flag of `section` and describe the change.
pub(crate) fn toggle<S: SectionKey, I: SectionItem>(
    store: &SectionStore<S, I>,
    section: &S,
) -> CollapseEvent<S> {
    let collapsed = store.toggle_collapsed(section);
    CollapseEvent::new(section.clone(), collapsed)
}

static_assertions::assert_impl_all!(CollapseEvent<String>: Send, Sync);
static_assertions::assert_impl_all!(CollapseStream<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let store = SectionStore::<&str, u32>::new(true);

        let first = toggle(&store, &"a");
        assert_eq!(first, CollapseEvent::new("a", false));
        let second = toggle(&store, &"a");
        assert!(second.is_collapsed());
        assert!(store.is_collapsed(&"a"));
    }

    #[test]
    fn test_subscribers_see_events_in_order() {
        let stream = CollapseStream::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        stream.subscribe(move |event: &CollapseEvent<&str>| sink.lock().push(event.clone()));

        stream.publish(CollapseEvent::new("a", false));
        stream.publish(CollapseEvent::new("a", true));

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(!seen[0].is_collapsed());
        assert!(seen[1].is_collapsed());
    }

    #[test]
    fn test_no_replay_after_unsubscribe() {
        let stream = CollapseStream::new();
        let count = Arc::new(Mutex::new(0));

        stream.publish(CollapseEvent::new("early", true));

        let counter = count.clone();
        let id = stream.subscribe(move |_: &CollapseEvent<&str>| *counter.lock() += 1);
        assert_eq!(*count.lock(), 0);

        assert_eq!(stream.publish(CollapseEvent::new("a", true)), 1);
        assert!(stream.unsubscribe(id));
        assert!(!stream.unsubscribe(id));
        assert_eq!(stream.publish(CollapseEvent::new("a", false)), 0);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(CollapseEvent::new("inbox", false).to_string(), "inbox expanded");
    }
}
