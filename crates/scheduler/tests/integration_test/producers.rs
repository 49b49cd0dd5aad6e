use std::thread;

use costq_scheduler::{CostScheduler, ResourceHandle, WorkerId};

use crate::helpers::Job;

#[test]
fn concurrent_producers_are_all_accounted() {
    let scheduler = CostScheduler::new();
    let disk = ResourceHandle::new("disk");

    thread::scope(|s| {
        for producer in 0..4 {
            let scheduler = &scheduler;
            let disk = disk.clone();
            s.spawn(move || {
                for i in 0..250 {
                    let id = producer * 250 + i;
                    let resource = (i % 2 == 0).then(|| disk.clone());
                    scheduler.push(Job { id, cost: 2.0, resource }).unwrap();
                }
            });
        }
    });

    assert_eq!(scheduler.size(), 1000);
    assert_eq!(scheduler.total_accepted_cost(), 2000.0);
    assert_eq!(scheduler.group_count(), 2);
}

#[test]
fn producers_and_consumers_interleave() {
    let scheduler = CostScheduler::new();
    let popped = std::sync::atomic::AtomicUsize::new(0);

    thread::scope(|s| {
        for producer in 0..2 {
            let scheduler = &scheduler;
            s.spawn(move || {
                for i in 0..500 {
                    scheduler
                        .push(Job { id: producer * 500 + i, cost: i as f64, resource: None })
                        .unwrap();
                }
            });
        }
        for worker in 0..2 {
            let scheduler = &scheduler;
            let popped = &popped;
            s.spawn(move || {
                for _ in 0..300 {
                    if let Some(job) = scheduler.pop(WorkerId(worker)) {
                        scheduler.finished(&job, WorkerId(worker));
                        popped.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                }
            });
        }
    });

    let popped = popped.load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(scheduler.size() + popped, 1000);
}
