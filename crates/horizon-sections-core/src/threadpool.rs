//! Worker pool for background reconciliation and revalidation.
//!
//! A thin wrapper over a rayon thread pool with work-stealing scheduling.
//! Jobs are fire-and-forget: there is no handle and no cancellation. A job
//! that panics is logged and counted as finished.
//!
//! # Example
//!
//! ```no_run
//! use horizon_sections_core::threadpool::{ThreadPoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(ThreadPoolConfig::with_threads(2)).unwrap();
//! pool.spawn(|| {
//!     // Expensive view construction
//! });
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SchedulerError};
use crate::logging::targets;

/// Configuration for creating a worker pool.
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Number of worker threads. `None` means use the number of CPU cores.
    pub num_threads: Option<usize>,
    /// Name prefix for worker threads.
    pub thread_name: String,
    /// Stack size for worker threads in bytes.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "sections-worker".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with custom thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Default::default()
        }
    }

    /// Set the thread name prefix.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the worker stack size in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// An unordered pool of background workers.
pub struct WorkerPool {
    pool: RayonThreadPool,
    active_tasks: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Create a new worker pool with the given configuration.
    pub fn new(config: ThreadPoolConfig) -> Result<Self> {
        let thread_name = config.thread_name.clone();
        let mut builder = ThreadPoolBuilder::new()
            .thread_name(move |index| format!("{thread_name}-{index}"))
            .panic_handler(|_| {
                tracing::error!(target: targets::SCHEDULER, "worker job panicked");
            });

        if let Some(num_threads) = config.num_threads {
            builder = builder.num_threads(num_threads);
        }

        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pool = builder
            .build()
            .map_err(|e| SchedulerError::PoolCreation(e.to_string()))?;

        tracing::debug!(
            target: targets::SCHEDULER,
            threads = pool.current_num_threads(),
            name = %config.thread_name,
            "worker pool created"
        );

        Ok(Self {
            pool,
            active_tasks: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Get the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Get the number of queued or running jobs.
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Spawn a fire-and-forget job on the pool.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.active_tasks.fetch_add(1, Ordering::AcqRel);
        let active_tasks = self.active_tasks.clone();

        self.pool.spawn(move || {
            let _guard = ActiveTaskGuard(active_tasks);
            job();
        });
    }
}

struct ActiveTaskGuard(Arc<AtomicUsize>);

impl Drop for ActiveTaskGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}
