use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduler operational counters.
///
/// Lives inside the scheduler's locked state, so every update happens under
/// the same lock as the operation it counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerMetrics {
    /// Tasks accepted by `push`.
    pub tasks_pushed: u64,
    /// Tasks handed out by `pop`, fallback included.
    pub tasks_dispatched: u64,
    /// Pops served by the fallback path while every queued resource was busy.
    pub fallback_dispatches: u64,
    /// `finished` calls that released a busy resource.
    pub resources_released: u64,
    /// Number of `clear` calls.
    pub clears: u64,
    /// Tasks dropped by `clear`.
    pub tasks_discarded: u64,
    /// Time of the most recent dispatch.
    pub last_dispatch: Option<DateTime<Utc>>,
}

impl SchedulerMetrics {
    pub(crate) fn record_push(&mut self) {
        self.tasks_pushed += 1;
    }

    pub(crate) fn record_dispatch(&mut self, fallback: bool) {
        self.tasks_dispatched += 1;
        if fallback {
            self.fallback_dispatches += 1;
        }
        self.last_dispatch = Some(Utc::now());
    }

    pub(crate) fn record_release(&mut self) {
        self.resources_released += 1;
    }

    pub(crate) fn record_clear(&mut self, discarded: usize) {
        self.clears += 1;
        self.tasks_discarded += discarded as u64;
    }

    /// Share of dispatches that broke exclusivity (0.0 - 1.0).
    pub fn fallback_ratio(&self) -> f64 {
        if self.tasks_dispatched == 0 {
            0.0
        } else {
            self.fallback_dispatches as f64 / self.tasks_dispatched as f64
        }
    }
}
