use std::collections::HashSet;
use std::sync::Mutex;

use costq_scheduler::{CostScheduler, ResourceHandle, WorkerPool};

use crate::helpers::{config, mixed_jobs, Job};

#[test]
fn every_task_runs_exactly_once() {
    let resources: Vec<ResourceHandle> =
        (0..5).map(|i| ResourceHandle::new(format!("disk-{i}"))).collect();
    let scheduler = CostScheduler::new();
    for job in mixed_jobs(2000, &resources) {
        scheduler.push(job).unwrap();
    }

    let seen = Mutex::new(HashSet::new());
    let duplicates = Mutex::new(Vec::new());
    let pool = WorkerPool::new(&config(8)).unwrap();
    let report = pool.run_batch(&scheduler, |_, job: &Job| {
        if !seen.lock().unwrap().insert(job.id) {
            duplicates.lock().unwrap().push(job.id);
        }
        Ok::<(), String>(())
    });

    assert!(duplicates.lock().unwrap().is_empty(), "tasks dispatched twice");
    assert_eq!(seen.lock().unwrap().len(), 2000);
    assert_eq!(report.executed, 2000);
    assert_eq!(report.per_worker.len(), 8);
    assert_eq!(report.per_worker.iter().sum::<usize>(), 2000);

    assert!(scheduler.empty());
    assert_eq!(scheduler.busy_count(), 0, "all resources released after the batch");
    let metrics = scheduler.metrics();
    assert_eq!(metrics.tasks_pushed, 2000);
    assert_eq!(metrics.tasks_dispatched, 2000);
}

#[test]
fn pool_can_run_consecutive_batches() {
    let scheduler = CostScheduler::new();
    let pool = WorkerPool::new(&config(4)).unwrap();

    for round in 0..3 {
        for job in mixed_jobs(100, &[]) {
            scheduler.push(job).unwrap();
        }
        let report = pool.run_batch(&scheduler, |_, _: &Job| Ok::<(), String>(()));
        assert_eq!(report.executed, 100, "round {round}");
        scheduler.clear();
    }

    assert_eq!(scheduler.metrics().tasks_dispatched, 300);
    assert_eq!(scheduler.metrics().clears, 3);
}
