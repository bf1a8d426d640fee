//! Prelude module for Horizon Sections.
//!
//! ```ignore
//! use horizon_sections::prelude::*;
//! ```
//!
//! This provides access to:
//! - The adapter and its configuration (`SectionAdapter`, `AdapterConfig`)
//! - Data types (`SectionedData`, `CollapsedState`, `ItemPosition`)
//! - View traits the host implements (`ItemView`, `ViewContainer`, `SectionView`)
//! - Schedulers (`Scheduler`, `ImmediateScheduler`, `ManualScheduler`, `ThreadedScheduler`)

// ============================================================================
// Adapter
// ============================================================================

pub use crate::adapter::SectionAdapter;
pub use crate::collapse::CollapseEvent;
pub use crate::config::AdapterConfig;
pub use crate::error::SectionError;

// ============================================================================
// Data
// ============================================================================

pub use crate::position::ItemPosition;
pub use crate::store::{CollapsedState, SectionedData};

// ============================================================================
// Views
// ============================================================================

pub use crate::view::{ClickHandler, ItemView, SectionHandle, SectionView, ViewContainer};

// ============================================================================
// Scheduling
// ============================================================================

pub use horizon_sections_core::{
    ConnectionId, ImmediateScheduler, ManualScheduler, Scheduler, ThreadPoolConfig,
    ThreadedScheduler,
};
