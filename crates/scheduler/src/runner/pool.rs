use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use costq_core::{CostqError, SchedulerConfig, Task, WorkerId};

use crate::scheduler::TaskScheduler;

use super::report::BatchReport;

/// A fixed-size pool of worker threads that drains a scheduler.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
    idle_backoff: Duration,
}

/// Shared counters for one batch.
struct BatchState {
    /// Workers between calling `pop` and reporting `finished`.
    in_flight: AtomicUsize,
    executed: AtomicUsize,
    failed: AtomicUsize,
    per_worker: Vec<AtomicUsize>,
}

impl WorkerPool {
    /// Build the thread pool described by `config`.
    pub fn new(config: &SchedulerConfig) -> Result<Self, CostqError> {
        let workers = config.resolved_worker_threads();
        let prefix = config.thread_name_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| CostqError::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            workers,
            idle_backoff: config.idle_backoff(),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every queued task, plus anything the executor pushes while the
    /// batch is running, and return once the scheduler is drained.
    ///
    /// Each worker pops a task, runs `executor` on it and reports it
    /// finished, whether the executor succeeded or not.
    pub fn run_batch<T, S, F, E>(&self, scheduler: &S, executor: F) -> BatchReport
    where
        T: Task,
        S: TaskScheduler<T>,
        F: Fn(WorkerId, &T) -> Result<(), E> + Sync,
        E: Display,
    {
        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %batch_id,
            workers = self.workers,
            queued = scheduler.size(),
            "batch starting"
        );

        let state = BatchState {
            in_flight: AtomicUsize::new(0),
            executed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            per_worker: (0..self.workers).map(|_| AtomicUsize::new(0)).collect(),
        };

        self.pool.scope(|s| {
            for index in 0..self.workers {
                let state = &state;
                let executor = &executor;
                let backoff = self.idle_backoff;
                s.spawn(move |_| {
                    worker_loop::<T, S, F, E>(WorkerId(index), scheduler, executor, state, backoff);
                });
            }
        });

        let report = BatchReport {
            batch_id,
            executed: state.executed.load(Ordering::Relaxed),
            failed: state.failed.load(Ordering::Relaxed),
            per_worker: state
                .per_worker
                .iter()
                .map(|n| n.load(Ordering::Relaxed))
                .collect(),
            elapsed: started.elapsed(),
        };

        info!(
            %batch_id,
            executed = report.executed,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch complete"
        );
        report
    }
}

fn worker_loop<T, S, F, E>(
    worker: WorkerId,
    scheduler: &S,
    executor: &F,
    state: &BatchState,
    backoff: Duration,
) where
    T: Task,
    S: TaskScheduler<T>,
    F: Fn(WorkerId, &T) -> Result<(), E>,
    E: Display,
{
    debug!(%worker, "worker started");
    loop {
        // Counted before `pop` so an idle peer never sees zero in flight
        // while this worker holds a task it has not reported yet.
        state.in_flight.fetch_add(1, Ordering::SeqCst);

        let Some(task) = scheduler.pop(worker) else {
            let remaining = state.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 && scheduler.empty() {
                break;
            }
            std::thread::sleep(backoff);
            continue;
        };

        match executor(worker, &task) {
            Ok(()) => {
                state.executed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                warn!(%worker, cost = task.cost(), error = %e, "task failed");
                state.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        scheduler.finished(&task, worker);
        state.per_worker[worker.0].fetch_add(1, Ordering::Relaxed);
        state.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
    debug!(%worker, "worker idle, exiting");
}
