//! Item reconciliation.
//!
//! A pass makes a section's child views match its item list, reusing the
//! children already attached. It runs in two halves:
//!
//! 1. [`prepare`] runs on a worker and asks the factory for every view the
//!    section will need beyond the children seen when the pass was
//!    scheduled. Built views are detached, so nothing touches the live tree.
//! 2. [`commit`] runs on the owner context and edits the container: trim
//!    surplus children, rebind survivors, append the prepared views.
//!
//! The container may have changed between the halves (another pass over the
//! same recycled view, for instance), so `commit` trusts the live child
//! count over the one `prepare` was planned against.

use crate::position::ItemPosition;
use crate::view::{ClickHandler, ItemView, ViewContainer, ViewFactory, ViewRebinder};

/// Views built ahead of a commit.
pub(crate) struct PreparedViews<V> {
    /// Index of the first prepared view.
    first: usize,
    views: Vec<Option<V>>,
    /// The factory declined at `first + views.len()`.
    factory_miss: bool,
}

impl<V> PreparedViews<V> {
    fn take(&mut self, index: usize) -> Option<V> {
        let offset = index.checked_sub(self.first)?;
        self.views.get_mut(offset)?.take()
    }

    fn missed_at(&self, index: usize) -> bool {
        self.factory_miss && index == self.first + self.views.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }
}

/// Build views for `items[from..]`, stopping at the first factory miss.
pub(crate) fn prepare<I, V>(items: &[I], from: usize, factory: &ViewFactory<I, V>) -> PreparedViews<V> {
    let len = items.len();
    let mut prepared = PreparedViews {
        first: from,
        views: Vec::with_capacity(len.saturating_sub(from)),
        factory_miss: false,
    };

    for (index, item) in items.iter().enumerate().skip(from) {
        match factory(item, ItemPosition::classify(index, len)) {
            Some(view) => prepared.views.push(Some(view)),
            None => {
                prepared.factory_miss = true;
                break;
            }
        }
    }

    prepared
}

/// What a committed pass did to the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Surplus children detached from the end.
    pub removed: usize,
    /// Existing children rebound to a new item.
    pub rebound: usize,
    /// New children appended.
    pub created: usize,
    /// The factory declined a view and the rest of the pass was skipped.
    pub aborted: bool,
}

impl ReconcileReport {
    /// Whether the container was left untouched.
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.rebound == 0 && self.created == 0
    }
}

/// Apply `items` to `container`.
///
/// `click_handler` produces the handler installed on the view of each item.
/// On return, and unless the pass aborted, child `i` shows `items[i]` and the
/// child count equals `items.len()`.
pub(crate) fn commit<C, I>(
    container: &mut C,
    items: &[I],
    mut prepared: PreparedViews<C::ItemView>,
    factory: &ViewFactory<I, C::ItemView>,
    rebinder: &ViewRebinder<I, C::ItemView>,
    click_handler: impl Fn(&I) -> ClickHandler,
) -> ReconcileReport
where
    C: ViewContainer + ?Sized,
{
    let len = items.len();
    let mut report = ReconcileReport::default();

    while container.child_count() > len {
        container.remove_child_at(container.child_count() - 1);
        report.removed += 1;
    }

    for (index, item) in items.iter().enumerate() {
        let position = ItemPosition::classify(index, len);

        if let Some(child) = container.child_at_mut(index) {
            rebinder(child, item, position);
            child.set_click_handler(click_handler(item));
            report.rebound += 1;
            continue;
        }

        let view = match prepared.take(index) {
            Some(view) => Some(view),
            None if prepared.missed_at(index) => None,
            // Fewer live children than planned; build the gap here.
            None => factory(item, position),
        };
        let Some(mut view) = view else {
            report.aborted = true;
            break;
        };

        view.set_click_handler(click_handler(item));
        container.append_child(view);
        report.created += 1;
    }

    report
}
