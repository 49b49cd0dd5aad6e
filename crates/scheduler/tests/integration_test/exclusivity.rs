use std::time::Duration;

use costq_scheduler::{CostScheduler, ResourceHandle, SchedulerMetrics, WorkerPool};

use crate::helpers::{config, mixed_jobs, Job, OverlapProbe};

struct Outcome {
    executed: usize,
    overlaps: usize,
    busy_after: usize,
    metrics: SchedulerMetrics,
}

fn run_with_probe(workers: usize, jobs: Vec<Job>, resources: &[ResourceHandle]) -> Outcome {
    let scheduler = CostScheduler::new();
    for job in jobs {
        scheduler.push(job).unwrap();
    }

    let probe = OverlapProbe::new(resources);
    let pool = WorkerPool::new(&config(workers)).unwrap();
    let report = pool.run_batch(&scheduler, |_, job: &Job| {
        probe.enter(job.resource.as_ref());
        std::thread::sleep(Duration::from_micros(50));
        probe.exit(job.resource.as_ref());
        Ok::<(), String>(())
    });

    Outcome {
        executed: report.executed,
        overlaps: probe.overlaps(),
        busy_after: scheduler.busy_count(),
        metrics: scheduler.metrics(),
    }
}

fn channels(n: usize) -> Vec<ResourceHandle> {
    (0..n).map(|i| ResourceHandle::new(format!("chan-{i}"))).collect()
}

#[test]
fn single_worker_never_falls_back() {
    let resources = channels(3);
    let outcome = run_with_probe(1, mixed_jobs(300, &resources), &resources);

    assert_eq!(outcome.executed, 300);
    assert_eq!(outcome.overlaps, 0);
    assert_eq!(outcome.metrics.fallback_dispatches, 0);
}

#[test]
fn one_task_per_resource_never_overlaps() {
    let resources = channels(64);
    let jobs = resources
        .iter()
        .enumerate()
        .map(|(id, r)| Job { id, cost: id as f64, resource: Some(r.clone()) })
        .collect();

    let outcome = run_with_probe(4, jobs, &resources);

    // A popped resource's group is gone, so some queued group is always free.
    assert_eq!(outcome.executed, 64);
    assert_eq!(outcome.overlaps, 0);
    assert_eq!(outcome.metrics.fallback_dispatches, 0);
}

#[test]
fn overlaps_only_follow_fallback_dispatches() {
    let resources = channels(6);
    let outcome = run_with_probe(4, mixed_jobs(600, &resources), &resources);

    assert_eq!(outcome.executed, 600);
    if outcome.metrics.fallback_dispatches == 0 {
        assert_eq!(outcome.overlaps, 0, "overlap without any fallback dispatch");
    }
    assert_eq!(outcome.busy_after, 0);
}

#[test]
fn full_contention_still_drains() {
    let disk = ResourceHandle::new("only-disk");
    let jobs = (0..50)
        .map(|id| Job { id, cost: id as f64, resource: Some(disk.clone()) })
        .collect();

    let outcome = run_with_probe(4, jobs, std::slice::from_ref(&disk));

    assert_eq!(outcome.executed, 50);
    assert_eq!(outcome.metrics.tasks_dispatched, 50);
    assert_eq!(outcome.busy_after, 0);
}
