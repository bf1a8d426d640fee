//! Error types for Horizon Sections core plumbing.

use std::time::Duration;

/// Errors raised by the worker pool and the scheduler boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The underlying rayon pool could not be built.
    #[error("Failed to create worker pool: {0}")]
    PoolCreation(String),

    /// Background work did not settle within the allotted time.
    #[error("Scheduler did not become idle within {0:?}")]
    Timeout(Duration),
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
