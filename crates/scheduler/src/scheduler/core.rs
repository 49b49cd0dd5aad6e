use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, trace};

use costq_core::{CostqError, ResourceHandle, Task, WorkerId};

use super::busy::BusySet;
use super::metrics::SchedulerMetrics;
use super::queue::{QueueStore, Take};
use super::traits::TaskScheduler;

/// Point-in-time view of scheduler occupancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStats {
    pub queued: usize,
    pub busy_resources: usize,
    pub groups: usize,
    pub total_accepted_cost: f64,
}

struct Inner<T> {
    store: QueueStore<T>,
    busy: BusySet,
    total_accepted_cost: f64,
    metrics: SchedulerMetrics,
}

/// Cost-weighted scheduler that keeps tasks sharing a resource apart.
///
/// Pending tasks are grouped by the resource they need. `pop` walks the
/// groups in storage order (resource groups by handle issue order, the
/// unbound group last) and takes the most expensive task from the first
/// group whose resource is free. When every queued resource is busy it
/// falls back to the cheapest task of the first group anyway, so workers
/// are never starved at the cost of running two tasks on one resource.
///
/// All operations serialize on one lock and none of them block waiting
/// for work.
pub struct CostScheduler<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Task> Default for CostScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Task> CostScheduler<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: QueueStore::default(),
                busy: BusySet::default(),
                total_accepted_cost: 0.0,
                metrics: SchedulerMetrics::default(),
            }),
        }
    }

    // No critical section can panic halfway through an update, so a
    // poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a task under its resource group.
    ///
    /// Rejects a cost that is negative, NaN or infinite; nothing is queued
    /// or accounted in that case.
    pub fn push(&self, task: T) -> Result<(), CostqError> {
        let cost = task.cost();
        if !cost.is_finite() || cost < 0.0 {
            return Err(CostqError::InvalidCost(cost));
        }

        let mut inner = self.lock();
        debug!(
            cost,
            resource = %display_resource(task.resource()),
            "queued task"
        );
        inner.total_accepted_cost += cost;
        inner.store.insert(cost, task);
        inner.metrics.record_push();
        Ok(())
    }

    /// Select the next task for `worker`.
    ///
    /// Returns `None` only when nothing is queued. The chosen task's
    /// resource, if any, is marked busy until [`finished`](Self::finished).
    pub fn pop(&self, worker: WorkerId) -> Option<T> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let eligible = inner
            .store
            .groups()
            .find(|(_, group)| {
                !group.is_empty()
                    && group
                        .resource
                        .as_ref()
                        .map_or(true, |handle| !inner.busy.contains(handle))
            })
            .map(|(key, _)| key.clone());

        let (key, take, fallback) = match eligible {
            Some(key) => (key, Take::Highest, false),
            None => {
                let key = inner
                    .store
                    .groups()
                    .find(|(_, group)| !group.is_empty())
                    .map(|(key, _)| key.clone())?;
                (key, Take::Lowest, true)
            }
        };

        let entry = inner.store.take(&key, take)?;
        if let Some(handle) = entry.task.resource() {
            inner.busy.acquire(handle);
        }
        inner.metrics.record_dispatch(fallback);

        if fallback {
            debug!(
                %worker,
                cost = entry.cost,
                resource = %display_resource(entry.task.resource()),
                "all queued resources busy, dispatching cheapest task of first group"
            );
        } else {
            trace!(
                %worker,
                cost = entry.cost,
                resource = %display_resource(entry.task.resource()),
                "dispatched task"
            );
        }

        Some(entry.task)
    }

    /// Release the resource held by `task`. A no-op if it is not busy.
    pub fn finished(&self, task: &T, worker: WorkerId) {
        let Some(handle) = task.resource() else {
            return;
        };
        let mut inner = self.lock();
        if inner.busy.release(handle) {
            inner.metrics.record_release();
            trace!(%worker, resource = %handle, "released resource");
        }
    }

    /// Number of queued tasks across all groups.
    pub fn size(&self) -> usize {
        self.lock().store.len()
    }

    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Discard every queued task and reset the accepted-cost total.
    ///
    /// Busy resources stay busy until their tasks report `finished`.
    pub fn clear(&self) {
        let mut inner = self.lock();
        let discarded = inner.store.clear();
        inner.total_accepted_cost = 0.0;
        inner.metrics.record_clear(discarded);
        debug!(discarded, "cleared scheduler queue");
    }

    /// Sum of costs of every task pushed since creation or the last `clear`.
    pub fn total_accepted_cost(&self) -> f64 {
        self.lock().total_accepted_cost
    }

    /// Number of resources currently held by dispatched tasks.
    pub fn busy_count(&self) -> usize {
        self.lock().busy.len()
    }

    pub fn is_busy(&self, handle: &ResourceHandle) -> bool {
        self.lock().busy.contains(handle)
    }

    /// Number of non-empty resource groups, the unbound group included.
    pub fn group_count(&self) -> usize {
        self.lock().store.group_count()
    }

    pub fn stats(&self) -> SchedulerStats {
        let inner = self.lock();
        SchedulerStats {
            queued: inner.store.len(),
            busy_resources: inner.busy.len(),
            groups: inner.store.group_count(),
            total_accepted_cost: inner.total_accepted_cost,
        }
    }

    /// Get a snapshot of the current scheduler metrics.
    pub fn metrics(&self) -> SchedulerMetrics {
        self.lock().metrics.clone()
    }
}

impl<T: Task> TaskScheduler<T> for CostScheduler<T> {
    fn push(&self, task: T) -> Result<(), CostqError> {
        CostScheduler::push(self, task)
    }

    fn pop(&self, worker: WorkerId) -> Option<T> {
        CostScheduler::pop(self, worker)
    }

    fn finished(&self, task: &T, worker: WorkerId) {
        CostScheduler::finished(self, task, worker)
    }

    fn size(&self) -> usize {
        CostScheduler::size(self)
    }

    fn empty(&self) -> bool {
        CostScheduler::empty(self)
    }

    fn clear(&self) {
        CostScheduler::clear(self)
    }
}

fn display_resource(resource: Option<&ResourceHandle>) -> String {
    match resource {
        Some(handle) => handle.to_string(),
        None => "-".to_string(),
    }
}
