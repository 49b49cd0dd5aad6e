//! Cost-weighted, resource-exclusive task scheduler.
//!
//! Split into focused submodules:
//! - `queue`: pending tasks grouped by resource, cost-ordered per group
//! - `busy`: resources held by dispatched, unfinished tasks
//! - `core`: [`CostScheduler`] and its selection policy
//! - `traits`: the [`TaskScheduler`] seam consumed by worker pools

mod busy;
mod core;
pub mod metrics;
mod queue;
pub mod traits;

pub use self::core::{CostScheduler, SchedulerStats};
pub use metrics::SchedulerMetrics;
pub use traits::TaskScheduler;
