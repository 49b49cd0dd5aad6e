use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

/// Outcome of draining one batch through a [`WorkerPool`](super::WorkerPool).
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    /// Tasks whose executor returned `Ok`.
    pub executed: usize,
    /// Tasks whose executor returned an error. They were still reported finished.
    pub failed: usize,
    /// Tasks handled by each worker, indexed by worker id.
    pub per_worker: Vec<usize>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Every task the pool took off the scheduler.
    pub fn total(&self) -> usize {
        self.executed + self.failed
    }

    /// Tasks per second over the batch wall-clock time.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total() as f64 / secs
        }
    }
}
