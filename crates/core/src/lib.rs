pub mod config;
pub mod error;
pub mod resource;
pub mod task;

pub use config::SchedulerConfig;
pub use error::*;
pub use resource::ResourceHandle;
pub use task::{Task, WorkerId};
