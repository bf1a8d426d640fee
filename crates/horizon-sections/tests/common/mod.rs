//! Fake views shared by the adapter integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_sections::prelude::*;
use parking_lot::Mutex;

pub type Adapter = SectionAdapter<&'static str, u32, FakeSection>;

/// Counts collaborator calls across a test.
#[derive(Debug, Default)]
pub struct Counters {
    created: AtomicUsize,
    rebound: AtomicUsize,
    declined: AtomicUsize,
}

impl Counters {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn rebound(&self) -> usize {
        self.rebound.load(Ordering::SeqCst)
    }

    pub fn declined(&self) -> usize {
        self.declined.load(Ordering::SeqCst)
    }
}

pub struct FakeRow {
    pub item: u32,
    pub position: ItemPosition,
    click: Option<ClickHandler>,
}

impl FakeRow {
    pub fn new(item: u32, position: ItemPosition) -> Self {
        Self {
            item,
            position,
            click: None,
        }
    }
}

impl ItemView for FakeRow {
    fn set_click_handler(&mut self, handler: ClickHandler) {
        self.click = Some(handler);
    }
}

#[derive(Default)]
pub struct FakeSection {
    pub title: String,
    pub collapsed: Option<bool>,
    pub rows: Vec<FakeRow>,
    pub removed: usize,
    pub header: Option<ClickHandler>,
}

impl FakeSection {
    pub fn with_rows(count: u32) -> Self {
        Self {
            rows: (0..count)
                .map(|item| FakeRow::new(item + 100, ItemPosition::Middle))
                .collect(),
            ..Self::default()
        }
    }

    pub fn items(&self) -> Vec<u32> {
        self.rows.iter().map(|row| row.item).collect()
    }

    pub fn positions(&self) -> Vec<ItemPosition> {
        self.rows.iter().map(|row| row.position).collect()
    }
}

impl ViewContainer for FakeSection {
    type ItemView = FakeRow;

    fn child_count(&self) -> usize {
        self.rows.len()
    }

    fn child_at_mut(&mut self, index: usize) -> Option<&mut FakeRow> {
        self.rows.get_mut(index)
    }

    fn append_child(&mut self, view: FakeRow) {
        self.rows.push(view);
    }

    fn remove_child_at(&mut self, index: usize) {
        self.rows.remove(index);
        self.removed += 1;
    }
}

impl SectionView for FakeSection {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = Some(collapsed);
    }

    fn set_header_click_handler(&mut self, handler: ClickHandler) {
        self.header = Some(handler);
    }
}

pub fn section_view() -> SectionHandle<FakeSection> {
    Arc::new(Mutex::new(FakeSection::default()))
}

/// Click a section header. The view lock is released before the handler runs.
pub fn click_header(view: &SectionHandle<FakeSection>) {
    let handler = view.lock().header.clone();
    handler.expect("header click handler installed")();
}

/// Click the row at `index`. The view lock is released before the handler runs.
pub fn click_row(view: &SectionHandle<FakeSection>, index: usize) {
    let handler = view.lock().rows[index].click.clone();
    handler.expect("row click handler installed")();
}

pub fn data(sections: &[(&'static str, &[u32])]) -> SectionedData<&'static str, u32> {
    sections
        .iter()
        .map(|&(section, items)| (section, items.to_vec()))
        .collect()
}

/// Register a counting factory and rebinder.
pub fn install_views(adapter: &Adapter) -> Arc<Counters> {
    install_views_declining_after(adapter, usize::MAX)
}

/// Like [`install_views`], but the factory declines after `limit` views.
pub fn install_views_declining_after(adapter: &Adapter, limit: usize) -> Arc<Counters> {
    let counters = Arc::new(Counters::default());

    let factory_counters = counters.clone();
    adapter.set_view_factory(move |item, position| {
        if factory_counters.created() >= limit {
            factory_counters.declined.fetch_add(1, Ordering::SeqCst);
            return None;
        }
        factory_counters.created.fetch_add(1, Ordering::SeqCst);
        Some(FakeRow::new(*item, position))
    });

    let rebinder_counters = counters.clone();
    adapter.set_view_rebinder(move |row, item, position| {
        rebinder_counters.rebound.fetch_add(1, Ordering::SeqCst);
        row.item = *item;
        row.position = position;
    });

    counters
}

/// Record every call of a no-argument callback.
#[derive(Debug, Default, Clone)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn recorder(&self, name: &'static str) -> impl Fn() + Send + Sync + 'static {
        let log = self.0.clone();
        move || log.lock().push(name)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }

    pub fn count(&self, name: &'static str) -> usize {
        self.0.lock().iter().filter(|&&call| call == name).count()
    }
}
