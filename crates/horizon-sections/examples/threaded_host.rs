//! A console "list control" hosting a section adapter on a real worker pool.
//!
//! Run with `RUST_LOG=horizon_sections=trace cargo run --example threaded_host`
//! to watch revalidation and reconciliation.

use std::sync::Arc;
use std::time::Duration;

use horizon_sections::prelude::*;
use parking_lot::Mutex;

struct Row(String);

impl ItemView for Row {
    fn set_click_handler(&mut self, _handler: ClickHandler) {}
}

#[derive(Default)]
struct Panel {
    title: String,
    collapsed: bool,
    rows: Vec<Row>,
    header: Option<ClickHandler>,
}

impl ViewContainer for Panel {
    type ItemView = Row;

    fn child_count(&self) -> usize {
        self.rows.len()
    }

    fn child_at_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    fn append_child(&mut self, view: Row) {
        self.rows.push(view);
    }

    fn remove_child_at(&mut self, index: usize) {
        self.rows.remove(index);
    }
}

impl SectionView for Panel {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    fn set_header_click_handler(&mut self, handler: ClickHandler) {
        self.header = Some(handler);
    }
}

fn render(panels: &[SectionHandle<Panel>]) {
    for panel in panels {
        let panel = panel.lock();
        let marker = if panel.collapsed { "+" } else { "-" };
        println!("[{marker}] {}", panel.title);
        if !panel.collapsed {
            for row in &panel.rows {
                println!("      {}", row.0);
            }
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let scheduler = Arc::new(ThreadedScheduler::new(ThreadPoolConfig::default())?);
    let adapter: SectionAdapter<&'static str, String, Panel> = SectionAdapter::with_scheduler(
        AdapterConfig::new().exclude("drafts"),
        scheduler.clone(),
    );

    adapter.set_section_mapper(|section| section.to_uppercase());
    adapter.set_view_factory(|item, position| Some(Row(format!("{item} ({position:?})"))));
    adapter.set_view_rebinder(|row, item, position| row.0 = format!("{item} ({position:?})"));
    adapter.set_on_data_available(|| tracing::info!("sections available"));
    adapter.set_on_no_data_available(|| tracing::info!("nothing to show"));
    adapter.subscribe_collapse_events(|event| tracing::info!("{event}"));

    let mut data = SectionedData::new();
    data.insert("inbox", vec!["welcome".to_owned(), "invoice".to_owned()]);
    data.insert("drafts", vec!["unsent".to_owned()]);
    data.insert("archive", vec![]);
    data.insert("sent", vec!["reply".to_owned()]);
    adapter.bind(Some(data), None);
    scheduler.wait_idle(Duration::from_secs(5))?;

    let panels: Vec<SectionHandle<Panel>> = (0..adapter.section_count())
        .map(|_| Arc::new(Mutex::new(Panel::default())))
        .collect();
    for (position, panel) in panels.iter().enumerate() {
        adapter.bind_section(position, panel)?;
    }
    scheduler.wait_idle(Duration::from_secs(5))?;
    render(&panels);

    // Expand the first section the way a click on its header would.
    let header = panels[0].lock().header.clone();
    if let Some(header) = header {
        header();
    }
    scheduler.wait_idle(Duration::from_secs(5))?;
    render(&panels);

    Ok(())
}
