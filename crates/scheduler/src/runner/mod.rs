//! Batch driver that feeds a [`TaskScheduler`](crate::TaskScheduler) to a
//! pool of worker threads.
//!
//! - `pool`: WorkerPool construction and the per-worker pop/run/finish loop
//! - `report`: BatchReport returned after a batch drains

mod pool;
mod report;

pub use self::pool::WorkerPool;
pub use self::report::BatchReport;
