//! Core plumbing for Horizon Sections.
//!
//! This crate provides the runtime pieces the section synchronization engine
//! is built on:
//!
//! - **Signal/Slot System**: Multicast notification ([`Signal`])
//! - **Scheduler Boundary**: The [`Scheduler`] capability separating background
//!   work from owner-context work, with immediate, manual and threaded
//!   implementations
//! - **Worker Pool**: A rayon-backed pool for fire-and-forget background jobs
//! - **Owner Queue**: FIFO delivery of invocations to the owner thread
//! - **Thread Checks**: Owner-thread affinity assertions
//! - **Logging**: `tracing` targets and perf spans
//!
//! # Scheduler Example
//!
//! ```
//! use horizon_sections_core::{ManualScheduler, Scheduler};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let scheduler = ManualScheduler::new();
//! let ran = Arc::new(AtomicBool::new(false));
//!
//! let flag = ran.clone();
//! scheduler.run_on_owner(Box::new(move || flag.store(true, Ordering::SeqCst)));
//! assert!(!ran.load(Ordering::SeqCst));
//!
//! scheduler.run_until_idle();
//! assert!(ran.load(Ordering::SeqCst));
//! ```

mod error;
pub mod invocation;
pub mod logging;
pub mod scheduler;
pub mod signal;
pub mod thread_check;
pub mod threadpool;

pub use error::{Result, SchedulerError};
pub use invocation::{OwnerQueue, QueuedInvocation};
pub use logging::PerfSpan;
pub use scheduler::{ImmediateScheduler, Job, ManualScheduler, Scheduler, ThreadedScheduler};
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use threadpool::{ThreadPoolConfig, WorkerPool};
