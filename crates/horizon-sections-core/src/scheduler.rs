//! The scheduler boundary between background work and the owner context.
//!
//! The engine never spawns threads or posts to an event loop on its own. It
//! is handed a [`Scheduler`] and routes every job through one of two entry
//! points:
//!
//! - [`Scheduler::run_on_worker`] for background computation (revalidation,
//!   view construction). Worker jobs are unordered.
//! - [`Scheduler::run_on_owner`] for anything that reads or mutates the view
//!   tree or invokes a user callback. Owner jobs run in FIFO submission order.
//!
//! Three implementations are provided:
//!
//! | Scheduler | Worker jobs | Owner jobs | Use |
//! |-----------|-------------|------------|-----|
//! | [`ImmediateScheduler`] | inline | inline | default, simple hosts, tests |
//! | [`ManualScheduler`] | queued, stepped by hand | queued, stepped by hand | race tests |
//! | [`ThreadedScheduler`] | rayon [`WorkerPool`] | [`OwnerQueue`] pumped by the owner thread | production |

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{Result, SchedulerError};
use crate::invocation::OwnerQueue;
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;
use crate::threadpool::{ThreadPoolConfig, WorkerPool};

/// A boxed job closure.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Capability for dispatching work to the two execution contexts.
pub trait Scheduler: Send + Sync {
    /// Run `job` on the owner context, after every owner job submitted before it.
    fn run_on_owner(&self, job: Job);

    /// Run `job` on some background worker.
    fn run_on_worker(&self, job: Job);
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn run_on_owner(&self, job: Job) {
        (**self).run_on_owner(job);
    }

    fn run_on_worker(&self, job: Job) {
        (**self).run_on_worker(job);
    }
}

// -------------------------------------------------------------------------
// ImmediateScheduler
// -------------------------------------------------------------------------

/// Runs every job inline on the calling thread.
///
/// The caller's thread is treated as both the owner context and the worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn run_on_owner(&self, job: Job) {
        job();
    }

    fn run_on_worker(&self, job: Job) {
        job();
    }
}

// -------------------------------------------------------------------------
// ManualScheduler
// -------------------------------------------------------------------------

/// Queues both kinds of job until the test steps them explicitly.
///
/// Worker jobs are stepped in submission order too, which keeps tests
/// deterministic; use [`run_worker_job_at`](Self::run_worker_job_at) to
/// simulate a worker overtaking an earlier one.
#[derive(Default)]
pub struct ManualScheduler {
    owner_jobs: Mutex<VecDeque<Job>>,
    worker_jobs: Mutex<VecDeque<Job>>,
}

impl ManualScheduler {
    /// Create a scheduler with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owner jobs waiting.
    pub fn pending_owner_jobs(&self) -> usize {
        self.owner_jobs.lock().len()
    }

    /// Number of worker jobs waiting.
    pub fn pending_worker_jobs(&self) -> usize {
        self.worker_jobs.lock().len()
    }

    /// Run the oldest worker job. Returns `false` if none was queued.
    pub fn run_next_worker_job(&self) -> bool {
        self.run_worker_job_at(0)
    }

    /// Run the worker job at `index` in the queue, out of order.
    pub fn run_worker_job_at(&self, index: usize) -> bool {
        // Release the lock before running: the job may queue more work.
        let job = self.worker_jobs.lock().remove(index);
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run queued worker jobs, including ones they enqueue. Returns how many ran.
    pub fn run_worker_jobs(&self) -> usize {
        let mut count = 0;
        while self.run_next_worker_job() {
            count += 1;
        }
        count
    }

    /// Run queued owner jobs, including ones they enqueue. Returns how many ran.
    pub fn run_owner_jobs(&self) -> usize {
        let mut count = 0;
        loop {
            let job = self.owner_jobs.lock().pop_front();
            match job {
                Some(job) => {
                    job();
                    count += 1;
                }
                None => return count,
            }
        }
    }

    /// Alternate worker and owner queues until both are empty.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_worker_jobs() + self.run_owner_jobs();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn run_on_owner(&self, job: Job) {
        self.owner_jobs.lock().push_back(job);
    }

    fn run_on_worker(&self, job: Job) {
        self.worker_jobs.lock().push_back(job);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending_owner_jobs", &self.pending_owner_jobs())
            .field("pending_worker_jobs", &self.pending_worker_jobs())
            .finish()
    }
}

// -------------------------------------------------------------------------
// ThreadedScheduler
// -------------------------------------------------------------------------

/// Worker jobs on a rayon pool, owner jobs on a FIFO queue.
///
/// The thread that creates the scheduler is the owner. It must call
/// [`process_owner_jobs`](Self::process_owner_jobs) regularly, typically
/// once per turn of its event loop.
#[derive(Debug)]
pub struct ThreadedScheduler {
    pool: WorkerPool,
    owner: OwnerQueue,
    affinity: ThreadAffinity,
}

impl ThreadedScheduler {
    /// Create a scheduler owned by the current thread.
    pub fn new(config: ThreadPoolConfig) -> Result<Self> {
        let pool = WorkerPool::new(config)?;
        crate::sections_debug!(owner = ?std::thread::current().id(), "threaded scheduler created");
        Ok(Self {
            pool,
            owner: OwnerQueue::new(),
            affinity: ThreadAffinity::current(),
        })
    }

    /// The owner thread's affinity.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Number of worker jobs queued or running.
    pub fn active_worker_jobs(&self) -> usize {
        self.pool.active_tasks()
    }

    /// Number of owner jobs waiting.
    pub fn pending_owner_jobs(&self) -> usize {
        self.owner.pending_count()
    }

    /// Drain the owner queue. Must be called on the owner thread.
    pub fn process_owner_jobs(&self) -> usize {
        self.affinity.debug_assert_same_thread();
        self.owner.process_pending()
    }

    /// Pump owner jobs until no worker job is active and the owner queue is
    /// empty, or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            self.process_owner_jobs();
            if self.pool.active_tasks() == 0 && !self.owner.has_pending() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    target: targets::SCHEDULER,
                    active = self.pool.active_tasks(),
                    pending = self.owner.pending_count(),
                    "scheduler did not settle"
                );
                return Err(SchedulerError::Timeout(timeout));
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

impl Scheduler for ThreadedScheduler {
    fn run_on_owner(&self, job: Job) {
        let affinity = self.affinity;
        self.owner.post(move || {
            affinity.debug_assert_same_thread();
            job();
        });
    }

    fn run_on_worker(&self, job: Job) {
        self.pool.spawn(job);
    }
}

static_assertions::assert_impl_all!(ImmediateScheduler: Send, Sync);
static_assertions::assert_impl_all!(ManualScheduler: Send, Sync);
static_assertions::assert_impl_all!(ThreadedScheduler: Send, Sync);
