//! Replan timing statistics and per-cycle metrics.
//!
//! [`PlanTimeHistogram`] accumulates replan durations over a whole run
//! into five exclusive buckets. [`CycleMetrics`] captures timing and
//! change volume for the most recent cycle only.

use std::fmt;
use std::time::Duration;

/// Replan durations bucketed by wall-clock time.
///
/// Each recorded duration lands in exactly one bucket; counters only
/// ever increase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanTimeHistogram {
    /// Replans taking more than 1 s.
    pub over_1s: u64,
    /// Replans taking more than 0.5 s and at most 1 s.
    pub over_500ms: u64,
    /// Replans taking more than 0.1 s and at most 0.5 s.
    pub over_100ms: u64,
    /// Replans taking more than 0.05 s and at most 0.1 s.
    pub over_50ms: u64,
    /// Replans taking at most 0.05 s.
    pub below_50ms: u64,
}

impl PlanTimeHistogram {
    /// Count one replan of duration `elapsed`.
    pub fn record(&mut self, elapsed: Duration) {
        let bucket = if elapsed > Duration::from_secs(1) {
            &mut self.over_1s
        } else if elapsed > Duration::from_millis(500) {
            &mut self.over_500ms
        } else if elapsed > Duration::from_millis(100) {
            &mut self.over_100ms
        } else if elapsed > Duration::from_millis(50) {
            &mut self.over_50ms
        } else {
            &mut self.below_50ms
        };
        *bucket += 1;
    }

    /// Total number of replans recorded.
    pub fn total(&self) -> u64 {
        self.over_1s + self.over_500ms + self.over_100ms + self.over_50ms + self.below_50ms
    }
}

/// Renders the closing summary line of a solution trace.
impl fmt::Display for PlanTimeHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stats: plantimes over 1 secs={}; over 0.5 secs={}; over 0.1 secs={}; \
             over 0.05 secs={}; below 0.05 secs={}",
            self.over_1s, self.over_500ms, self.over_100ms, self.over_50ms, self.below_50ms
        )
    }
}

/// Timing and volume metrics for a single cycle.
///
/// All durations are in microseconds. The loop overwrites these after
/// every completed cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleMetrics {
    /// Wall-clock time for the whole cycle.
    pub total_us: u64,
    /// Time spent comparing belief against ground truth.
    pub sense_us: u64,
    /// Time spent updating the belief and notifying the planner.
    pub notify_us: u64,
    /// Time spent inside the planner's replan call.
    pub replan_us: u64,
    /// Number of cells whose belief changed this cycle.
    pub changed_cells: usize,
    /// Number of states named in a targeted invalidation.
    pub invalidated_states: usize,
    /// Length of the returned path, including the current start.
    pub path_len: usize,
}

pub(crate) fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
