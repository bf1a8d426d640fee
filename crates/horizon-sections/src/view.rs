//! View collaborators.
//!
//! The engine does not draw anything. It decides which view operations must
//! happen (create, rebind, remove, collapse) and in what order, and performs
//! them through the traits in this module. The hosting toolkit implements:
//!
//! - [`ItemView`] for the per-item child view
//! - [`ViewContainer`] for the ordered child list of a section body
//! - [`SectionView`] for a whole section slot (header + body)
//!
//! and registers a [`ViewFactory`] and a [`ViewRebinder`] on the adapter.
//!
//! Every method on these traits is only ever called from a job dispatched
//! through [`Scheduler::run_on_owner`](horizon_sections_core::Scheduler::run_on_owner).
//! The factory is the exception: it builds detached views and may run on a
//! worker.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::position::ItemPosition;

/// A click callback attached to a view.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Builds a fresh item view, or declines with `None`.
///
/// Must be side-effect free beyond constructing the view.
pub type ViewFactory<I, V> = Arc<dyn Fn(&I, ItemPosition) -> Option<V> + Send + Sync>;

/// Applies an item and its position to an existing item view.
pub type ViewRebinder<I, V> = Arc<dyn Fn(&mut V, &I, ItemPosition) + Send + Sync>;

/// Maps a section to its header label.
pub type SectionMapper<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// A single item's view.
pub trait ItemView: Send + 'static {
    /// Replace the view's click handler.
    fn set_click_handler(&mut self, handler: ClickHandler);
}

/// An ordered, index-addressable list of item views.
pub trait ViewContainer {
    /// The child view type.
    type ItemView: ItemView;

    /// Number of children currently attached.
    fn child_count(&self) -> usize;

    /// Mutable access to the child at `index`, if any.
    fn child_at_mut(&mut self, index: usize) -> Option<&mut Self::ItemView>;

    /// Attach a child after the current last child.
    fn append_child(&mut self, view: Self::ItemView);

    /// Detach the child at `index`.
    fn remove_child_at(&mut self, index: usize);
}

/// A section slot: a clickable header above a collapsible item container.
pub trait SectionView: ViewContainer + Send + 'static {
    /// Show `title` in the header.
    fn set_title(&mut self, title: &str);

    /// Hide (`true`) or show the body and update the header indicator.
    fn set_collapsed(&mut self, collapsed: bool);

    /// Replace the header's click handler.
    ///
    /// The handler may run while the view is locked. The stored flag still
    /// flips, but [`set_collapsed`](Self::set_collapsed) is skipped for that
    /// click, so a view that dispatches from inside itself should read the
    /// adapter's state afterwards or be bound again.
    fn set_header_click_handler(&mut self, handler: ClickHandler);
}

/// How the host shares a section view with the engine.
///
/// The engine locks the handle on the owner context to update the view.
/// Do not hold the lock across `bind_section`.
pub type SectionHandle<V> = Arc<Mutex<V>>;
