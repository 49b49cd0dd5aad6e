use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::resource::ResourceHandle;

/// A schedulable unit of work, as seen by the scheduler.
///
/// The scheduler never executes a task. It only reads the cost (larger
/// runs sooner) and the resource the task needs exclusively, if any.
pub trait Task: Send {
    /// Relative expense of the task. Must be finite and non-negative.
    fn cost(&self) -> f64;

    /// Resource that must not be shared with another running task.
    /// `None` means no exclusivity is required.
    fn resource(&self) -> Option<&ResourceHandle>;
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn cost(&self) -> f64 {
        (**self).cost()
    }

    fn resource(&self) -> Option<&ResourceHandle> {
        (**self).resource()
    }
}

impl<T: Task + Sync + ?Sized> Task for Arc<T> {
    fn cost(&self) -> f64 {
        (**self).cost()
    }

    fn resource(&self) -> Option<&ResourceHandle> {
        (**self).resource()
    }
}

/// Opaque identity of the worker calling into a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}
