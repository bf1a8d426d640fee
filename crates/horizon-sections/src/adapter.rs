//! The section adapter.
//!
//! [`SectionAdapter`] is what a hosting list control talks to. The host asks
//! it how many section slots to show and binds each slot's view through
//! [`SectionAdapter::bind_section`]; the adapter keeps the slot's header and
//! item views in sync with the bound data.
//!
//! Background work (revalidation, building views) is handed to the
//! [`Scheduler`]'s worker side. Everything that touches a view or calls back
//! into user code is dispatched to its owner side.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use horizon_sections_core::logging::targets;
use horizon_sections_core::{ConnectionId, ImmediateScheduler, PerfSpan, Scheduler, Signal};
use parking_lot::{Mutex, RwLock};

use crate::collapse::{self, CollapseEvent, CollapseStream};
use crate::config::AdapterConfig;
use crate::error::{Result, SectionError};
use crate::position::ItemPosition;
use crate::reconcile::{self, PreparedViews};
use crate::store::{
    CollapsedState, LoadingGuard, SectionItem, SectionItems, SectionKey, SectionStore, SectionedData,
};
use crate::validate::Revalidation;
use crate::view::{
    ClickHandler, SectionHandle, SectionMapper, SectionView, ViewFactory, ViewRebinder,
};

type Callback = Arc<dyn Fn() + Send + Sync>;
type ItemCallback<I> = Arc<dyn Fn(&I) + Send + Sync>;

/// User-registered collaborators. Cloned out before use so no lock is held
/// while user code runs.
struct Callbacks<S, I, W> {
    view_factory: Option<ViewFactory<I, W>>,
    view_rebinder: Option<ViewRebinder<I, W>>,
    section_mapper: Option<SectionMapper<S>>,
    item_click: Option<ItemCallback<I>>,
    section_opened: Option<Callback>,
    data_available: Option<Callback>,
    no_data_available: Option<Callback>,
}

impl<S, I, W> Default for Callbacks<S, I, W> {
    fn default() -> Self {
        Self {
            view_factory: None,
            view_rebinder: None,
            section_mapper: None,
            item_click: None,
            section_opened: None,
            data_available: None,
            no_data_available: None,
        }
    }
}

/// Signals emitted by a [`SectionAdapter`].
pub struct AdapterSignals {
    /// The whole data set changed and every slot must be rebound.
    ///
    /// Emitted on the owner context after each bind, and directly from
    /// [`SectionAdapter::set_filter`].
    pub data_set_changed: Signal<()>,
}

struct Inner<S: SectionKey, I: SectionItem, V: SectionView> {
    store: Arc<SectionStore<S, I>>,
    config: AdapterConfig<S>,
    scheduler: Arc<dyn Scheduler>,
    callbacks: RwLock<Callbacks<S, I, V::ItemView>>,
    collapse_events: CollapseStream<S>,
    signals: AdapterSignals,
    /// Last view bound to each section, for collapse side effects.
    bound_views: Mutex<Vec<(S, Weak<Mutex<V>>)>>,
}

/// Keeps sectioned data and a list of section views in sync.
///
/// Cloning is cheap and yields another handle to the same adapter.
///
/// # Example
///
/// ```
/// use horizon_sections::prelude::*;
///
/// #[derive(Default)]
/// struct Row(String);
///
/// impl ItemView for Row {
///     fn set_click_handler(&mut self, _handler: ClickHandler) {}
/// }
///
/// #[derive(Default)]
/// struct Section {
///     title: String,
///     collapsed: bool,
///     rows: Vec<Row>,
/// }
///
/// impl ViewContainer for Section {
///     type ItemView = Row;
///     fn child_count(&self) -> usize { self.rows.len() }
///     fn child_at_mut(&mut self, index: usize) -> Option<&mut Row> { self.rows.get_mut(index) }
///     fn append_child(&mut self, view: Row) { self.rows.push(view) }
///     fn remove_child_at(&mut self, index: usize) { self.rows.remove(index); }
/// }
///
/// impl SectionView for Section {
///     fn set_title(&mut self, title: &str) { self.title = title.to_owned() }
///     fn set_collapsed(&mut self, collapsed: bool) { self.collapsed = collapsed }
///     fn set_header_click_handler(&mut self, _handler: ClickHandler) {}
/// }
///
/// let adapter = SectionAdapter::<&str, u32, Section>::new();
/// adapter.set_view_factory(|item, _| Some(Row(item.to_string())));
/// adapter.set_view_rebinder(|row, item, _| row.0 = item.to_string());
///
/// let mut data = SectionedData::new();
/// data.insert("open", vec![1, 2, 3]);
/// data.insert("closed", vec![]);
/// adapter.bind(Some(data), None);
///
/// assert_eq!(adapter.section_count(), 1);
///
/// let view = SectionHandle::new(parking_lot::Mutex::new(Section::default()));
/// adapter.bind_section(0, &view).unwrap();
///
/// let view = view.lock();
/// assert_eq!(view.title, "open");
/// assert_eq!(view.rows.len(), 3);
/// ```
pub struct SectionAdapter<S: SectionKey, I: SectionItem, V: SectionView> {
    inner: Arc<Inner<S, I, V>>,
}

impl<S: SectionKey, I: SectionItem, V: SectionView> Clone for SectionAdapter<S, I, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: SectionKey, I: SectionItem, V: SectionView> Default for SectionAdapter<S, I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SectionKey, I: SectionItem, V: SectionView> SectionAdapter<S, I, V> {
    /// Create an adapter with the default configuration that runs all work
    /// inline on the calling thread.
    pub fn new() -> Self {
        Self::with_config(AdapterConfig::default())
    }

    /// Create an adapter that runs all work inline on the calling thread.
    pub fn with_config(config: AdapterConfig<S>) -> Self {
        Self::with_scheduler(config, Arc::new(ImmediateScheduler))
    }

    /// Create an adapter that dispatches through `scheduler`.
    pub fn with_scheduler(config: AdapterConfig<S>, scheduler: Arc<dyn Scheduler>) -> Self {
        let store = Arc::new(SectionStore::new(config.default_collapsed));
        Self {
            inner: Arc::new(Inner {
                store,
                config,
                scheduler,
                callbacks: RwLock::new(Callbacks::default()),
                collapse_events: CollapseStream::new(),
                signals: AdapterSignals {
                    data_set_changed: Signal::new(),
                },
                bound_views: Mutex::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register the factory that builds item views.
    ///
    /// The factory may run on a worker. Returning `None` stops the current
    /// reconciliation pass for that section.
    pub fn set_view_factory<F>(&self, factory: F)
    where
        F: Fn(&I, ItemPosition) -> Option<V::ItemView> + Send + Sync + 'static,
    {
        self.inner.callbacks.write().view_factory = Some(Arc::new(factory));
    }

    /// Register the function that shows an item in an existing view.
    pub fn set_view_rebinder<F>(&self, rebinder: F)
    where
        F: Fn(&mut V::ItemView, &I, ItemPosition) + Send + Sync + 'static,
    {
        self.inner.callbacks.write().view_rebinder = Some(Arc::new(rebinder));
    }

    /// Register the header label function. Without one, labels use `Display`.
    pub fn set_section_mapper<F>(&self, mapper: F)
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.inner.callbacks.write().section_mapper = Some(Arc::new(mapper));
    }

    /// Called with the item behind a clicked row.
    pub fn set_on_item_click<F>(&self, callback: F)
    where
        F: Fn(&I) + Send + Sync + 'static,
    {
        self.inner.callbacks.write().item_click = Some(Arc::new(callback));
    }

    /// Called after a toggle expands a section.
    pub fn set_on_section_opened<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.callbacks.write().section_opened = Some(Arc::new(callback));
    }

    /// Called after a revalidation that found at least one section.
    pub fn set_on_data_available<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.callbacks.write().data_available = Some(Arc::new(callback));
    }

    /// Called after a revalidation that found no sections.
    pub fn set_on_no_data_available<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.callbacks.write().no_data_available = Some(Arc::new(callback));
    }

    /// Subscribe to collapse events. Only toggles made afterwards are seen.
    pub fn subscribe_collapse_events<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&CollapseEvent<S>) + Send + Sync + 'static,
    {
        self.inner.collapse_events.subscribe(subscriber)
    }

    /// Remove a collapse event subscriber.
    pub fn unsubscribe_collapse_events(&self, id: ConnectionId) -> bool {
        self.inner.collapse_events.unsubscribe(id)
    }

    /// The adapter's signals.
    pub fn signals(&self) -> &AdapterSignals {
        &self.inner.signals
    }

    /// The configuration this adapter was built with.
    pub fn config(&self) -> &AdapterConfig<S> {
        &self.inner.config
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the bound data, and the collapsed flags when given.
    ///
    /// The replacement is immediate. Revalidation is queued on a worker and
    /// followed by an availability callback and a `data_set_changed`
    /// emission on the owner context. Passing `None` for `collapsed` keeps
    /// the current flags.
    pub fn bind(&self, data: Option<SectionedData<S, I>>, collapsed: Option<CollapsedState<S>>) {
        tracing::debug!(
            target: targets::ADAPTER,
            sections = data.as_ref().map(|data| data.len()),
            replace_collapsed = collapsed.is_some(),
            "binding data"
        );
        self.inner.store.replace(data, collapsed);

        let adapter = Arc::downgrade(&self.inner);
        self.inner.scheduler.run_on_worker(Box::new(move || {
            if let Some(inner) = adapter.upgrade() {
                inner.revalidate();
            }
        }));
    }

    /// Whether a data set is bound.
    pub fn has_data(&self) -> bool {
        self.inner.store.has_data()
    }

    /// Restrict the list to a single section, or clear the restriction.
    ///
    /// A filter naming a section that is not in the data has no effect on
    /// what is shown. Emits `data_set_changed` before returning.
    pub fn set_filter(&self, filter: Option<S>) {
        self.inner.store.set_filter(filter);
        self.inner.signals.data_set_changed.emit(());
    }

    /// The current filter, if any.
    pub fn filter(&self) -> Option<S> {
        self.inner.store.filter()
    }

    /// Number of section slots the host should show.
    pub fn section_count(&self) -> usize {
        self.inner.store.section_count()
    }

    /// The section in slot `position`.
    pub fn section_at(&self, position: usize) -> Option<S> {
        self.inner.store.section_at(position)
    }

    /// Stable id of slot `position`. Slots are identified by position.
    pub fn item_id(&self, position: usize) -> u64 {
        position as u64
    }

    /// Visible sections in data order, ignoring the filter.
    pub fn visible_sections(&self) -> Vec<S> {
        self.inner.store.visible_sections()
    }

    /// Header label of `section`.
    pub fn section_label(&self, section: &S) -> String {
        self.inner.section_label(section)
    }

    /// Whether `section` is collapsed. Unknown sections use the configured default.
    pub fn is_collapsed(&self, section: &S) -> bool {
        self.inner.store.is_collapsed(section)
    }

    /// Whether a reconciliation pass over `section` is in flight.
    pub fn is_loading(&self, section: &S) -> bool {
        self.inner.store.is_loading(section)
    }

    /// Loading flag of every section tracked since the last revalidation.
    pub fn loading_state(&self) -> HashMap<S, bool> {
        self.inner.store.loading_state()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Bind slot `position` to `view`.
    ///
    /// Sets the header, then reconciles the view's children against the
    /// section's items. Both happen through the scheduler; with the default
    /// inline scheduler they are done when this returns.
    ///
    /// # Errors
    ///
    /// [`SectionError::NoSectionAt`] if no section is shown at `position`.
    pub fn bind_section(&self, position: usize, view: &SectionHandle<V>) -> Result<()> {
        let Some(section) = self.section_at(position) else {
            return Err(SectionError::NoSectionAt {
                position,
                count: self.section_count(),
            });
        };

        let title = self.inner.section_label(&section);
        let collapsed = self.inner.store.is_collapsed(&section);
        let header = self.inner.header_click_handler(section.clone());
        self.inner.remember_view(&section, view);

        tracing::trace!(
            target: targets::ADAPTER,
            %section,
            position,
            collapsed,
            "binding section view"
        );

        let handle = view.clone();
        self.inner.scheduler.run_on_owner(Box::new(move || {
            let mut view = handle.lock();
            view.set_title(&title);
            view.set_collapsed(collapsed);
            view.set_header_click_handler(header);
        }));

        self.inner.reconcile(section, view.clone());
        Ok(())
    }

    /// Flip `section` between collapsed and expanded.
    ///
    /// The stored flag changes immediately and the new state is returned.
    /// The view update, the [`CollapseEvent`] and the section-opened
    /// callback follow on the owner context, in that order.
    ///
    /// If the section's view is locked when the update runs, the view is
    /// left alone. It shows the new state after its next
    /// [`bind_section`](Self::bind_section).
    pub fn toggle(&self, section: &S) -> bool {
        self.inner.toggle(section)
    }
}

impl<S: SectionKey, I: SectionItem, V: SectionView> Inner<S, I, V> {
    fn section_label(&self, section: &S) -> String {
        let mapper = self.callbacks.read().section_mapper.clone();
        match mapper {
            Some(mapper) => mapper(section),
            None => section.to_string(),
        }
    }

    fn revalidate(self: &Arc<Self>) {
        let outcome = self.store.revalidate(&self.config.excluded_sections);
        match &outcome {
            Revalidation::NoData => {
                tracing::debug!(target: targets::VALIDATE, "no data bound");
            }
            Revalidation::Contended => {
                tracing::warn!(
                    target: targets::VALIDATE,
                    "revalidation dropped, a reconciliation pass is in flight"
                );
            }
            Revalidation::Completed { visible } => {
                tracing::debug!(target: targets::VALIDATE, visible = visible.len(), "sections revalidated");
            }
        }

        if let Some(has_sections) = outcome.has_sections() {
            self.post(move |inner| inner.notify_availability(has_sections));
        }
        self.post(|inner| {
            inner.signals.data_set_changed.emit(());
        });
    }

    fn notify_availability(&self, has_sections: bool) {
        let callback = {
            let callbacks = self.callbacks.read();
            if has_sections {
                callbacks.data_available.clone()
            } else {
                callbacks.no_data_available.clone()
            }
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Run `job` on the owner context if the adapter is still alive then.
    fn post(self: &Arc<Self>, job: impl FnOnce(&Arc<Self>) + Send + 'static) {
        let adapter = Arc::downgrade(self);
        self.scheduler.run_on_owner(Box::new(move || {
            if let Some(inner) = adapter.upgrade() {
                job(&inner);
            }
        }));
    }

    fn remember_view(&self, section: &S, view: &SectionHandle<V>) {
        let target = Arc::as_ptr(view);
        let mut bound = self.bound_views.lock();
        bound.retain(|(bound_section, weak)| {
            weak.strong_count() > 0 && weak.as_ptr() != target && bound_section != section
        });
        bound.push((section.clone(), Arc::downgrade(view)));
    }

    fn bound_view(&self, section: &S) -> Option<SectionHandle<V>> {
        self.bound_views
            .lock()
            .iter()
            .find(|(bound_section, _)| bound_section == section)
            .and_then(|(_, weak)| weak.upgrade())
    }

    fn header_click_handler(self: &Arc<Self>, section: S) -> ClickHandler {
        let adapter = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(inner) = adapter.upgrade() {
                inner.toggle(&section);
            }
        })
    }

    fn item_click_handler(self: &Arc<Self>, item: &I) -> ClickHandler {
        let adapter = Arc::downgrade(self);
        let item = item.clone();
        Arc::new(move || {
            let Some(inner) = adapter.upgrade() else {
                return;
            };
            let callback = inner.callbacks.read().item_click.clone();
            if let Some(callback) = callback {
                callback(&item);
            }
        })
    }

    fn toggle(self: &Arc<Self>, section: &S) -> bool {
        let event = collapse::toggle(&self.store, section);
        let collapsed = event.is_collapsed();
        let view = self.bound_view(section);

        tracing::debug!(target: targets::ADAPTER, %section, collapsed, "section toggled");

        self.post(move |inner| {
            if let Some(view) = view {
                // Held when the host dispatches the click from inside the view.
                match view.try_lock() {
                    Some(mut view) => view.set_collapsed(collapsed),
                    None => tracing::debug!(
                        target: targets::ADAPTER,
                        section = %event.section(),
                        "section view busy, collapsed state applies on next bind"
                    ),
                }
            }
            inner.collapse_events.publish(event);
            if !collapsed {
                let callback = inner.callbacks.read().section_opened.clone();
                if let Some(callback) = callback {
                    callback();
                }
            }
        });

        collapsed
    }

    /// Start a reconciliation pass for `section` against `view`.
    ///
    /// Owner: read the child count. Worker: build the missing views.
    /// Owner: commit. The section reads as loading from now until the pass
    /// finishes or is dropped.
    fn reconcile(self: &Arc<Self>, section: S, view: SectionHandle<V>) {
        let (factory, rebinder) = {
            let callbacks = self.callbacks.read();
            (callbacks.view_factory.clone(), callbacks.view_rebinder.clone())
        };
        let (Some(factory), Some(rebinder)) = (factory, rebinder) else {
            tracing::trace!(
                target: targets::RECONCILE,
                %section,
                "view factory or rebinder unset, skipping"
            );
            return;
        };
        let Some(items) = self.store.items(&section) else {
            tracing::trace!(target: targets::RECONCILE, %section, "section has no item list");
            return;
        };

        let guard = self.store.begin_loading(section);
        let pass = Pass {
            guard,
            items,
            view,
            factory,
            rebinder,
        };

        self.post(move |inner| {
            let planned = pass.view.lock().child_count();
            let adapter = Arc::downgrade(inner);
            inner.scheduler.run_on_worker(Box::new(move || {
                let prepared = reconcile::prepare(&pass.items, planned, &pass.factory);
                if let Some(inner) = adapter.upgrade() {
                    inner.post(move |inner| inner.commit(pass, prepared));
                }
            }));
        });
    }

    fn commit(self: &Arc<Self>, pass: Pass<S, I, V>, prepared: PreparedViews<V::ItemView>) {
        let _span = PerfSpan::new("reconcile_section");
        let prepared_count = prepared.len();

        let report = {
            let mut view = pass.view.lock();
            reconcile::commit(
                &mut *view,
                &pass.items,
                prepared,
                &pass.factory,
                &pass.rebinder,
                |item| self.item_click_handler(item),
            )
        };

        let section = pass.guard.section();
        if report.aborted {
            tracing::warn!(
                target: targets::RECONCILE,
                %section,
                items = pass.items.len(),
                created = report.created,
                "view factory declined an item, section left partially bound"
            );
        } else {
            tracing::trace!(
                target: targets::RECONCILE,
                %section,
                prepared = prepared_count,
                removed = report.removed,
                rebound = report.rebound,
                created = report.created,
                noop = report.is_noop(),
                "section reconciled"
            );
        }
        // Dropping the pass releases the loading mark.
    }
}

/// One reconciliation pass in flight between contexts.
struct Pass<S: SectionKey, I: SectionItem, V: SectionView> {
    guard: LoadingGuard<S, I>,
    items: SectionItems<I>,
    view: SectionHandle<V>,
    factory: ViewFactory<I, V::ItemView>,
    rebinder: ViewRebinder<I, V::ItemView>,
}

impl<S, I, V> fmt::Debug for SectionAdapter<S, I, V>
where
    S: SectionKey + fmt::Debug,
    I: SectionItem,
    V: SectionView,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionAdapter")
            .field("store", &self.inner.store)
            .field("collapse_events", &self.inner.collapse_events)
            .finish_non_exhaustive()
    }
}
