//! Adapter configuration.

use std::collections::HashSet;
use std::hash::Hash;

/// Configuration for a [`SectionAdapter`](crate::SectionAdapter).
///
/// # Example
///
/// ```
/// use horizon_sections::AdapterConfig;
///
/// let config = AdapterConfig::new()
///     .exclude("archived")
///     .default_collapsed(false);
///
/// assert!(config.is_excluded(&"archived"));
/// assert!(!config.default_collapsed);
/// ```
#[derive(Debug, Clone)]
pub struct AdapterConfig<S> {
    /// Sections stripped from every bound data set before anything else happens.
    pub excluded_sections: HashSet<S>,
    /// Collapsed state for sections with no stored flag.
    pub default_collapsed: bool,
}

impl<S> Default for AdapterConfig<S> {
    fn default() -> Self {
        Self {
            excluded_sections: HashSet::new(),
            default_collapsed: true,
        }
    }
}

impl<S: Eq + Hash> AdapterConfig<S> {
    /// Create a configuration with no exclusions and collapsed sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a single section.
    pub fn exclude(mut self, section: S) -> Self {
        self.excluded_sections.insert(section);
        self
    }

    /// Exclude every section in `sections`.
    pub fn excluding(mut self, sections: impl IntoIterator<Item = S>) -> Self {
        self.excluded_sections.extend(sections);
        self
    }

    /// Set the collapsed state used for sections with no stored flag.
    pub fn default_collapsed(mut self, collapsed: bool) -> Self {
        self.default_collapsed = collapsed;
        self
    }

    /// Check whether `section` is excluded.
    pub fn is_excluded(&self, section: &S) -> bool {
        self.excluded_sections.contains(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::<u32>::default();
        assert!(config.excluded_sections.is_empty());
        assert!(config.default_collapsed);
    }

    #[test]
    fn test_builder() {
        let config = AdapterConfig::new().exclude(1).excluding([2, 3]);
        assert!(config.is_excluded(&1));
        assert!(config.is_excluded(&3));
        assert!(!config.is_excluded(&4));
    }
}
