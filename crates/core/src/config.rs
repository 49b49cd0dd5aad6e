use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CostqError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_opt(key).and_then(|v| v.parse().ok())
}

/// Worker pool and scheduling configuration, typically parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of worker threads. 0 = available parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Sleep between retries when `pop` comes back empty but work is still in flight.
    #[serde(default = "default_idle_backoff")]
    pub idle_backoff_ms: u64,
    /// Prefix for worker thread names.
    #[serde(default = "default_thread_prefix")]
    pub thread_name_prefix: String,
}

fn default_worker_threads() -> usize { 0 }
fn default_idle_backoff() -> u64 { 1 }
fn default_thread_prefix() -> String { "costq-worker".to_string() }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            idle_backoff_ms: default_idle_backoff(),
            thread_name_prefix: default_thread_prefix(),
        }
    }
}

impl SchedulerConfig {
    /// Build config from defaults plus `COSTQ_*` environment variables.
    /// Reads `.env` first when present.
    pub fn from_env() -> Result<Self, CostqError> {
        load_dotenv();
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string. Environment overrides win.
    pub fn from_toml(toml_str: &str) -> Result<Self, CostqError> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CostqError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }

    /// Idle backoff as a [`std::time::Duration`].
    pub fn idle_backoff(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.idle_backoff_ms)
    }

    pub(crate) fn apply_env_overrides(&mut self) {
        if let Some(n) = env_parsed::<usize>("COSTQ_WORKER_THREADS") {
            self.worker_threads = n;
        }
        if let Some(ms) = env_parsed::<u64>("COSTQ_IDLE_BACKOFF_MS") {
            self.idle_backoff_ms = ms;
        }
        if let Some(prefix) = env_opt("COSTQ_THREAD_PREFIX") {
            self.thread_name_prefix = prefix;
        }
    }

    fn validate(&self) -> Result<(), CostqError> {
        if self.thread_name_prefix.trim().is_empty() {
            return Err(CostqError::Config(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            "Scheduler config: workers={} (resolved {}), idle_backoff={}ms, thread_prefix={}",
            self.worker_threads,
            self.resolved_worker_threads(),
            self.idle_backoff_ms,
            self.thread_name_prefix
        );
    }
}
