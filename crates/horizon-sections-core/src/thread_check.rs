//! Owner-thread verification utilities.
//!
//! View mutation and user callbacks must happen on the single owner context.
//! [`ThreadAffinity`] records that context's thread and lets owner-only code
//! verify it is running in the right place.
//!
//! Two levels of checking are provided:
//!
//! - [`ThreadAffinity::debug_assert_same_thread`]: only active in debug builds.
//! - [`ThreadAffinity::assert_same_thread`]: always active.

use std::thread::ThreadId;

/// Thread affinity tracker for owner-context state.
///
/// # Example
///
/// ```
/// use horizon_sections_core::thread_check::ThreadAffinity;
///
/// let owner = ThreadAffinity::current();
/// assert!(owner.is_same_thread());
///
/// let elsewhere = std::thread::spawn(move || owner.is_same_thread())
///     .join()
///     .unwrap();
/// assert!(!elsewhere);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics if the current thread is not the owner thread.
    #[track_caller]
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            panic_not_owner_thread(self.thread_id);
        }
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn panic_not_owner_thread(owner: ThreadId) -> ! {
    let current = std::thread::current();
    let current_name = current.name().unwrap_or("<unnamed>");
    let location = std::panic::Location::caller();

    panic!(
        "owner-context violation at {location}: running on thread \"{current_name}\" \
         ({:?}) but the owner thread is {owner:?}. View mutation and callbacks must be \
         routed through Scheduler::run_on_owner.",
        current.id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread();
        assert_eq!(affinity.thread_id(), std::thread::current().id());
    }

    #[test]
    fn test_affinity_other_thread() {
        let affinity = ThreadAffinity::current();
        let same = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!same);
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_assert_panics_off_thread() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || affinity.assert_same_thread()).join();
        assert!(result.is_err());
    }
}
