//! Busy-Resource Tracker.

use std::collections::HashSet;

use costq_core::ResourceHandle;

/// Resources held by tasks that were dispatched and not yet finished.
#[derive(Debug, Default)]
pub(crate) struct BusySet {
    held: HashSet<ResourceHandle>,
}

impl BusySet {
    pub(crate) fn acquire(&mut self, handle: &ResourceHandle) {
        self.held.insert(handle.clone());
    }

    /// Returns whether the handle was held. Releasing a free handle is a no-op.
    pub(crate) fn release(&mut self, handle: &ResourceHandle) -> bool {
        self.held.remove(handle)
    }

    pub(crate) fn contains(&self, handle: &ResourceHandle) -> bool {
        self.held.contains(handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.held.len()
    }
}
