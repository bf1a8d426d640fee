//! Logging facilities for Horizon Sections.
//!
//! Horizon Sections uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_sections=debug")
//!     .init();
//! ```
//!
//! Every event is tagged with one of the [`targets`] so that individual
//! subsystems can be filtered.

/// Target names for log filtering.
pub mod targets {
    /// Core plumbing target.
    pub const CORE: &str = "horizon_sections_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_sections::signal";
    /// Scheduler, worker pool and owner queue target.
    pub const SCHEDULER: &str = "horizon_sections::scheduler";
    /// Adapter facade target.
    pub const ADAPTER: &str = "horizon_sections::adapter";
    /// Section revalidation target.
    pub const VALIDATE: &str = "horizon_sections::validate";
    /// Item reconciliation target.
    pub const RECONCILE: &str = "horizon_sections::reconcile";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// Useful for tracking the duration of a reconciliation pass.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_sections::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Debug-level event on the core target.
#[macro_export]
macro_rules! sections_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Without a subscriber the span is disabled but must still be usable.
        let _span = PerfSpan::new("test_operation");
        crate::sections_debug!(value = 1, "inside span");
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::SIGNAL,
            targets::SCHEDULER,
            targets::ADAPTER,
            targets::VALIDATE,
            targets::RECONCILE,
        ] {
            assert!(target.starts_with("horizon_sections::"));
        }
    }
}
