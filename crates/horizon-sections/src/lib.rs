//! Horizon Sections - collapsible, sectioned lists with incremental view
//! reconciliation.
//!
//! A [`SectionAdapter`] sits between a hosting list control and an ordered
//! map of sections to items. It decides which sections are visible, keeps
//! per-section collapsed state, and reconciles each section's child views
//! against its items by position, reusing the views it already has.
//!
//! The crate re-exports [`horizon_sections_core`], which provides the
//! [`Scheduler`] boundary every piece of background and owner-context work
//! goes through.
//!
//! # Modules
//!
//! - [`position`]: first / middle / last classification of items
//! - [`store`]: per-section state behind one lock
//! - [`validate`]: visible section computation
//! - [`reconcile`]: view reconciliation passes
//! - [`collapse`]: collapse toggling and its event stream
//! - [`adapter`]: the facade the host talks to
//! - [`view`]: the traits the host's views implement
//!
//! See [`SectionAdapter`] for a full example.

pub mod adapter;
pub mod collapse;
pub mod config;
mod error;
pub mod position;
pub mod prelude;
pub mod reconcile;
pub mod store;
pub mod validate;
pub mod view;

pub use horizon_sections_core::*;

pub use adapter::{AdapterSignals, SectionAdapter};
pub use collapse::{CollapseEvent, CollapseStream};
pub use config::AdapterConfig;
pub use error::{Result, SectionError};
pub use position::ItemPosition;
pub use reconcile::ReconcileReport;
pub use store::{CollapsedState, SectionItem, SectionKey, SectionStore, SectionedData};
pub use validate::Revalidation;
pub use view::{
    ClickHandler, ItemView, SectionHandle, SectionMapper, SectionView, ViewContainer, ViewFactory,
    ViewRebinder,
};
