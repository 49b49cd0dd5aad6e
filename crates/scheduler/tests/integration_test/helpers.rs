use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use costq_scheduler::{ResourceHandle, SchedulerConfig, Task};

#[derive(Debug)]
pub struct Job {
    pub id: usize,
    pub cost: f64,
    pub resource: Option<ResourceHandle>,
}

impl Task for Job {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn resource(&self) -> Option<&ResourceHandle> {
        self.resource.as_ref()
    }
}

pub fn config(workers: usize) -> SchedulerConfig {
    SchedulerConfig {
        worker_threads: workers,
        idle_backoff_ms: 0,
        ..SchedulerConfig::default()
    }
}

/// Build `n` jobs: every third is unbound, the rest cycle over `resources`.
pub fn mixed_jobs(n: usize, resources: &[ResourceHandle]) -> Vec<Job> {
    (0..n)
        .map(|id| Job {
            id,
            cost: ((id * 37) % 101) as f64,
            resource: if id % 3 == 0 || resources.is_empty() {
                None
            } else {
                Some(resources[id % resources.len()].clone())
            },
        })
        .collect()
}

/// Counts concurrent holders per resource.
pub struct OverlapProbe {
    active: HashMap<u64, AtomicUsize>,
    pub overlaps: AtomicUsize,
}

impl OverlapProbe {
    pub fn new(resources: &[ResourceHandle]) -> Self {
        Self {
            active: resources
                .iter()
                .map(|r| (r.id(), AtomicUsize::new(0)))
                .collect(),
            overlaps: AtomicUsize::new(0),
        }
    }

    pub fn enter(&self, resource: Option<&ResourceHandle>) {
        if let Some(active) = resource.and_then(|r| self.active.get(&r.id())) {
            if active.fetch_add(1, Ordering::SeqCst) > 0 {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    pub fn exit(&self, resource: Option<&ResourceHandle>) {
        if let Some(active) = resource.and_then(|r| self.active.get(&r.id())) {
            active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }
}
