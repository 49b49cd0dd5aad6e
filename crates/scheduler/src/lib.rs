pub mod runner;
pub mod scheduler;

pub use costq_core::{CostqError, ResourceHandle, SchedulerConfig, Task, WorkerId};
pub use runner::{BatchReport, WorkerPool};
pub use scheduler::{CostScheduler, SchedulerMetrics, SchedulerStats, TaskScheduler};
