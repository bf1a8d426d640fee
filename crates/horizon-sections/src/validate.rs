//! Data validation.
//!
//! Revalidation turns the bound data set into the visible section list. It
//! runs off the owner context and is skipped entirely while any section is
//! mid-reconciliation, since replacing the loading state under an in-flight
//! pass would let the pass write into a section that no longer exists.

use std::collections::{HashMap, HashSet};

use crate::store::{SectionItem, SectionKey, SectionState, SectionStore};

/// Outcome of one revalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation<S> {
    /// No data set is bound. Nothing changed.
    NoData,
    /// A reconciliation pass was in flight. Nothing changed.
    Contended,
    /// The visible sections were recomputed.
    Completed {
        /// The new visible sections, in data order.
        visible: Vec<S>,
    },
}

impl<S> Revalidation<S> {
    /// Whether the visible section list was replaced.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether the recomputed list has at least one section.
    ///
    /// `None` unless the list was recomputed.
    pub fn has_sections(&self) -> Option<bool> {
        match self {
            Self::Completed { visible } => Some(!visible.is_empty()),
            _ => None,
        }
    }
}

/// Recompute visible sections under an already held lock.
///
/// The loading check and the writes happen under the same lock so no pass
/// can start in between.
pub(crate) fn revalidate_locked<S: SectionKey, I>(
    state: &mut SectionState<S, I>,
    excluded: &HashSet<S>,
) -> Revalidation<S> {
    if state.data.is_some() && state.any_loading() {
        return Revalidation::Contended;
    }
    let Some(data) = state.data.as_mut() else {
        state.visible.clear();
        return Revalidation::NoData;
    };
    if !excluded.is_empty() {
        data.retain(|section, _| !excluded.contains(section));
    }

    let visible: Vec<S> = data
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(section, _)| section.clone())
        .collect();

    state.loading = visible
        .iter()
        .map(|section| (section.clone(), 0))
        .collect::<HashMap<_, _>>();
    state.visible = visible.clone();

    Revalidation::Completed { visible }
}

impl<S: SectionKey, I: SectionItem> SectionStore<S, I> {
    /// Strip `excluded` sections and recompute the visible section list.
    ///
    /// Reads whatever data is bound when it runs, so a revalidation queued
    /// behind a newer bind works on the newer data.
    pub fn revalidate(&self, excluded: &HashSet<S>) -> Revalidation<S> {
        let mut state = self.lock();
        revalidate_locked(&mut state, excluded)
    }
}
