//! Section state store.
//!
//! All per-section state lives behind a single [`SectionStore`]: the bound
//! data set, collapsed flags, loading flags, the derived visible section
//! list and the active filter. The raw mappings are never handed out; every
//! read and write goes through an accessor that takes the store's lock, so
//! the revalidation guard and the reconciler always observe each other's
//! writes in order.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};

/// Identity of a section: hashable, comparable and printable.
///
/// Implemented for every type meeting the bounds.
pub trait SectionKey: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

impl<T> SectionKey for T where T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

/// A record rendered as one item view.
///
/// Implemented for every type meeting the bounds.
pub trait SectionItem: Clone + Send + Sync + 'static {}

impl<T> SectionItem for T where T: Clone + Send + Sync + 'static {}

/// Sections in display order, each with its ordered items.
pub type SectionedData<S, I> = IndexMap<S, Vec<I>>;

/// Collapsed flag per section. Missing sections use the configured default.
pub type CollapsedState<S> = HashMap<S, bool>;

/// Shared, immutable item list of one section.
pub(crate) type SectionItems<I> = Arc<[I]>;

/// The state guarded by the store's lock.
pub(crate) struct SectionState<S, I> {
    pub(crate) data: Option<IndexMap<S, SectionItems<I>>>,
    pub(crate) collapsed: CollapsedState<S>,
    /// Number of reconciliation passes in flight per section.
    pub(crate) loading: HashMap<S, usize>,
    pub(crate) visible: Vec<S>,
    pub(crate) filter: Option<S>,
}

impl<S: SectionKey, I> SectionState<S, I> {
    /// The filter, if it names a section in the bound data.
    fn active_filter(&self) -> Option<&S> {
        let filter = self.filter.as_ref()?;
        self.data.as_ref()?.contains_key(filter).then_some(filter)
    }

    pub(crate) fn any_loading(&self) -> bool {
        self.loading.values().any(|&passes| passes > 0)
    }
}

/// Owner of all per-section state.
pub struct SectionStore<S, I> {
    state: Mutex<SectionState<S, I>>,
    default_collapsed: bool,
}

impl<S: SectionKey, I: SectionItem> SectionStore<S, I> {
    /// Create an empty store.
    pub fn new(default_collapsed: bool) -> Self {
        Self {
            state: Mutex::new(SectionState {
                data: None,
                collapsed: CollapsedState::new(),
                loading: HashMap::new(),
                visible: Vec::new(),
                filter: None,
            }),
            default_collapsed,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SectionState<S, I>> {
        self.state.lock()
    }

    /// Replace the data set, and the collapsed flags when `collapsed` is given.
    ///
    /// Visible sections are left alone until the next revalidation.
    pub fn replace(&self, data: Option<SectionedData<S, I>>, collapsed: Option<CollapsedState<S>>) {
        let data = data.map(|data| {
            data.into_iter()
                .map(|(section, items)| (section, SectionItems::from(items)))
                .collect()
        });

        let mut state = self.state.lock();
        state.data = data;
        if let Some(collapsed) = collapsed {
            state.collapsed = collapsed;
        }
    }

    /// Whether a data set is bound.
    pub fn has_data(&self) -> bool {
        self.state.lock().data.is_some()
    }

    /// The item list bound for `section`.
    pub(crate) fn items(&self, section: &S) -> Option<SectionItems<I>> {
        self.state.lock().data.as_ref()?.get(section).cloned()
    }

    /// Number of items bound for `section`, if it is in the data set.
    pub fn item_count(&self, section: &S) -> Option<usize> {
        Some(self.state.lock().data.as_ref()?.get(section)?.len())
    }

    /// Clone of the items bound for `section`.
    pub fn items_of(&self, section: &S) -> Option<Vec<I>> {
        self.items(section).map(|items| items.to_vec())
    }

    /// The current filter, valid or not.
    pub fn filter(&self) -> Option<S> {
        self.state.lock().filter.clone()
    }

    /// Replace the filter.
    pub fn set_filter(&self, filter: Option<S>) {
        self.state.lock().filter = filter;
    }

    /// Collapsed flag for `section`, falling back to the default.
    pub fn is_collapsed(&self, section: &S) -> bool {
        self.state
            .lock()
            .collapsed
            .get(section)
            .copied()
            .unwrap_or(self.default_collapsed)
    }

    /// Store a collapsed flag for `section`.
    pub fn set_collapsed(&self, section: S, collapsed: bool) {
        self.state.lock().collapsed.insert(section, collapsed);
    }

    /// Flip the collapsed flag of `section` and return the new value.
    pub fn toggle_collapsed(&self, section: &S) -> bool {
        let mut state = self.state.lock();
        let current = state
            .collapsed
            .get(section)
            .copied()
            .unwrap_or(self.default_collapsed);
        state.collapsed.insert(section.clone(), !current);
        !current
    }

    /// Whether a reconciliation pass for `section` is in flight.
    pub fn is_loading(&self, section: &S) -> bool {
        self.state
            .lock()
            .loading
            .get(section)
            .is_some_and(|&passes| passes > 0)
    }

    /// Whether any section is loading.
    pub fn any_loading(&self) -> bool {
        self.state.lock().any_loading()
    }

    /// Loading flag of every tracked section.
    pub fn loading_state(&self) -> HashMap<S, bool> {
        self.state
            .lock()
            .loading
            .iter()
            .map(|(section, &passes)| (section.clone(), passes > 0))
            .collect()
    }

    /// Mark `section` loading until the returned guard is dropped.
    ///
    /// Passes over the same section nest: the flag reads `false` only once
    /// every guard is gone.
    pub(crate) fn begin_loading(self: &Arc<Self>, section: S) -> LoadingGuard<S, I> {
        *self.state.lock().loading.entry(section.clone()).or_insert(0) += 1;
        LoadingGuard {
            store: Arc::downgrade(self),
            section,
        }
    }

    fn finish_loading(&self, section: &S) {
        if let Some(passes) = self.state.lock().loading.get_mut(section) {
            *passes = passes.saturating_sub(1);
        }
    }

    /// Sections currently exposed to the hosting list, in data order.
    pub fn visible_sections(&self) -> Vec<S> {
        self.state.lock().visible.clone()
    }

    /// Number of section slots the hosting list should show.
    pub fn section_count(&self) -> usize {
        let state = self.state.lock();
        let Some(data) = state.data.as_ref() else {
            return 0;
        };
        match state.active_filter() {
            Some(filter) => usize::from(data.get(filter).is_some_and(|items| !items.is_empty())),
            None => state.visible.len(),
        }
    }

    /// The section shown at slot `position`.
    pub fn section_at(&self, position: usize) -> Option<S> {
        let state = self.state.lock();
        state.data.as_ref()?;
        match state.active_filter() {
            Some(filter) => (position == 0).then(|| filter.clone()),
            None => state.visible.get(position).cloned(),
        }
    }
}

impl<S, I> fmt::Debug for SectionStore<S, I>
where
    S: SectionKey + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SectionStore")
            .field("has_data", &state.data.is_some())
            .field("visible", &state.visible)
            .field("filter", &state.filter)
            .field("default_collapsed", &self.default_collapsed)
            .finish()
    }
}

/// Clears one loading mark for a section when dropped.
///
/// Travels with a reconciliation pass from worker to owner context, so the
/// mark is released on every exit path: normal completion, a factory miss,
/// a panicking collaborator, or a job that is dropped without running.
#[must_use = "the section stops loading as soon as the guard is dropped"]
pub(crate) struct LoadingGuard<S: SectionKey, I: SectionItem> {
    store: Weak<SectionStore<S, I>>,
    section: S,
}

impl<S: SectionKey, I: SectionItem> LoadingGuard<S, I> {
    pub(crate) fn section(&self) -> &S {
        &self.section
    }
}

impl<S: SectionKey, I: SectionItem> Drop for LoadingGuard<S, I> {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.finish_loading(&self.section);
        }
    }
}
