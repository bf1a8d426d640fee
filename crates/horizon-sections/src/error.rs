//! Error types for the section adapter.

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, SectionError>;

/// Errors surfaced by the adapter's public operations.
///
/// Faults inside revalidation and reconciliation never appear here: they
/// are logged and absorbed, leaving the view stale until the next bind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// The hosting list asked for a slot that maps to no section.
    #[error("No section at position {position} (section count is {count})")]
    NoSectionAt { position: usize, count: usize },
}
