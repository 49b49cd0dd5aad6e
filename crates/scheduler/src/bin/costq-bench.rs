//! costq-bench — drive a synthetic batch through the cost scheduler.
//!
//! Generates tasks with random costs, binds a share of them to a small set
//! of exclusive resources, drains them through a [`WorkerPool`] and reports
//! throughput, fallback dispatches and observed resource overlaps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use costq_scheduler::{
    BatchReport, CostScheduler, ResourceHandle, SchedulerConfig, SchedulerMetrics, Task,
    WorkerId, WorkerPool,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Synthetic load generator for the cost-weighted scheduler.
#[derive(Parser, Debug)]
#[command(name = "costq-bench", version, about)]
struct Cli {
    /// Path to a scheduler TOML config file.
    #[arg(long, env = "COSTQ_CONFIG")]
    config: Option<String>,

    /// Number of tasks to generate.
    #[arg(long, default_value_t = 1000)]
    tasks: usize,

    /// Number of exclusive resources tasks are spread over.
    #[arg(long, default_value_t = 4)]
    resources: usize,

    /// Share of tasks (0.0 - 1.0) bound to a resource.
    #[arg(long, default_value_t = 0.75)]
    bound_ratio: f64,

    /// Worker threads (overrides the config file).
    #[arg(long)]
    workers: Option<usize>,

    /// Upper bound for generated task costs.
    #[arg(long, default_value_t = 100.0)]
    max_cost: f64,

    /// Simulated work per task, in microseconds.
    #[arg(long, default_value_t = 200)]
    work_us: u64,

    /// RNG seed for reproducible batches.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

// ── Synthetic tasks ─────────────────────────────────────────────────

struct BenchTask {
    cost: f64,
    resource: Option<ResourceHandle>,
}

impl Task for BenchTask {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn resource(&self) -> Option<&ResourceHandle> {
        self.resource.as_ref()
    }
}

fn generate(cli: &Cli, resources: &[ResourceHandle]) -> Vec<BenchTask> {
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let max_cost = cli.max_cost.max(f64::MIN_POSITIVE);
    (0..cli.tasks)
        .map(|_| {
            let resource = if !resources.is_empty() && rng.gen_bool(cli.bound_ratio.clamp(0.0, 1.0)) {
                Some(resources[rng.gen_range(0..resources.len())].clone())
            } else {
                None
            };
            BenchTask {
                cost: rng.gen_range(0.0..max_cost),
                resource,
            }
        })
        .collect()
}

/// Tracks how many tasks are running on each resource at once.
struct OverlapProbe {
    active: HashMap<u64, AtomicUsize>,
    overlaps: AtomicUsize,
}

impl OverlapProbe {
    fn new(resources: &[ResourceHandle]) -> Self {
        Self {
            active: resources
                .iter()
                .map(|r| (r.id(), AtomicUsize::new(0)))
                .collect(),
            overlaps: AtomicUsize::new(0),
        }
    }

    fn enter(&self, resource: &ResourceHandle) {
        if let Some(active) = self.active.get(&resource.id()) {
            if active.fetch_add(1, Ordering::SeqCst) > 0 {
                self.overlaps.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn exit(&self, resource: &ResourceHandle) {
        if let Some(active) = self.active.get(&resource.id()) {
            active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[derive(Serialize)]
struct Summary {
    report: BatchReport,
    metrics: SchedulerMetrics,
    throughput_per_sec: f64,
    resource_overlaps: usize,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match SchedulerConfig::from_file(path) {
            Ok(cfg) => {
                info!(path = %path, "loaded scheduler config");
                cfg
            }
            Err(e) => {
                warn!(error = %e, path = %path, "failed to load config, using environment defaults");
                SchedulerConfig::from_env()?
            }
        },
        None => SchedulerConfig::from_env()?,
    };
    if let Some(workers) = cli.workers {
        config.worker_threads = workers;
    }
    config.log_summary();

    let resources: Vec<ResourceHandle> = (0..cli.resources)
        .map(|i| ResourceHandle::new(format!("channel-{i}")))
        .collect();

    let scheduler = CostScheduler::new();
    for task in generate(&cli, &resources) {
        scheduler.push(task)?;
    }
    info!(
        tasks = scheduler.size(),
        groups = scheduler.group_count(),
        total_cost = scheduler.total_accepted_cost(),
        "batch generated"
    );

    let probe = OverlapProbe::new(&resources);
    let work = Duration::from_micros(cli.work_us);
    let pool = WorkerPool::new(&config)?;

    let report = pool.run_batch(&scheduler, |_: WorkerId, task: &BenchTask| {
        if let Some(resource) = &task.resource {
            probe.enter(resource);
        }
        let started = Instant::now();
        while started.elapsed() < work {
            std::hint::spin_loop();
        }
        if let Some(resource) = &task.resource {
            probe.exit(resource);
        }
        Ok::<(), anyhow::Error>(())
    });

    let summary = Summary {
        throughput_per_sec: report.throughput(),
        metrics: scheduler.metrics(),
        resource_overlaps: probe.overlaps.load(Ordering::Relaxed),
        report,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("batch {}", summary.report.batch_id);
        println!("  executed:        {}", summary.report.executed);
        println!("  failed:          {}", summary.report.failed);
        println!("  per worker:      {:?}", summary.report.per_worker);
        println!("  elapsed:         {:?}", summary.report.elapsed);
        println!("  throughput:      {:.1} tasks/s", summary.throughput_per_sec);
        println!("  fallbacks:       {}", summary.metrics.fallback_dispatches);
        println!("  overlaps:        {}", summary.resource_overlaps);
    }

    Ok(())
}
