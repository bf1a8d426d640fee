//! Queued invocations for owner-context delivery.
//!
//! Work that touches the view tree or calls a user callback must run on the
//! single owner context. Worker threads wrap that work in a
//! [`QueuedInvocation`] and post it to an [`OwnerQueue`]; the owner thread
//! drains the queue in FIFO order.
//!
//! # How It Works
//!
//! 1. Any thread calls [`OwnerQueue::post`] with a closure.
//! 2. The closure is boxed and sent over an unbounded crossbeam channel.
//! 3. The owner thread calls [`OwnerQueue::process_pending`] (typically from
//!    its event loop) and every queued invocation runs in submission order.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::logging::targets;

/// Global invocation counter for unique IDs.
static NEXT_INVOCATION_ID: AtomicU64 = AtomicU64::new(1);

/// A type-erased queued invocation that can be executed later.
pub struct QueuedInvocation {
    id: u64,
    invoke: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Create a new queued invocation.
    pub fn new<F>(invoke: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id: NEXT_INVOCATION_ID.fetch_add(1, Ordering::Relaxed),
            invoke: Box::new(invoke),
        }
    }

    /// Get the unique invocation ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Execute the invocation.
    pub fn execute(self) {
        (self.invoke)();
    }
}

impl std::fmt::Debug for QueuedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInvocation").field("id", &self.id).finish()
    }
}

/// FIFO mailbox of invocations destined for the owner context.
///
/// Cloning an `OwnerQueue` yields another handle onto the same mailbox.
#[derive(Debug, Clone)]
pub struct OwnerQueue {
    sender: Sender<QueuedInvocation>,
    receiver: Receiver<QueuedInvocation>,
}

impl Default for OwnerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Queue a closure for the owner context. Returns the invocation ID.
    pub fn post<F>(&self, invoke: F) -> u64
    where
        F: FnOnce() + Send + 'static,
    {
        let invocation = QueuedInvocation::new(invoke);
        let id = invocation.id();
        // Both ends live in `self`, so the channel cannot be disconnected here.
        if self.sender.send(invocation).is_err() {
            tracing::warn!(target: targets::SCHEDULER, invocation_id = id, "owner queue closed, dropping invocation");
        }
        id
    }

    /// Get the number of invocations waiting to run.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Check whether any invocation is waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Run up to `max` queued invocations. Returns how many ran.
    pub fn process_batch(&self, max: usize) -> usize {
        let mut count = 0;
        while count < max {
            match self.receiver.try_recv() {
                Ok(invocation) => {
                    invocation.execute();
                    count += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    /// Run every queued invocation, including ones posted while draining.
    ///
    /// Returns the number of invocations processed.
    pub fn process_pending(&self) -> usize {
        let processed = self.process_batch(usize::MAX);
        if processed > 0 {
            tracing::trace!(target: targets::SCHEDULER, processed, "processed owner invocations");
        }
        processed
    }
}
