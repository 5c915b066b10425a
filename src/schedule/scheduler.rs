//! Scheduler driving repeated scrape cycles
//!
//! This module handles:
//! - Picking delay bounds from the time-of-day windows
//! - Drawing the randomized delay between cycles
//! - Running cycles strictly one after another until cancelled

use crate::config::ScheduleConfig;
use crate::schedule::window::{JitterRange, ScheduleWindow};
use crate::scrape::ScrapeCycle;
use crate::ConfigError;
use chrono::{DateTime, Local, NaiveTime};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Computes jittered delays and runs cycles
///
/// The next delay is only computed after the previous cycle has fully
/// completed, so cycles never overlap.
pub struct Scheduler {
    /// Windows in priority order, first match wins
    windows: Vec<ScheduleWindow>,

    /// Bounds used when no window matches
    fallback: JitterRange,

    rng: fastrand::Rng,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `windows` - Time-of-day windows, evaluated in order
    /// * `fallback` - Delay bounds outside every window
    pub fn new(windows: Vec<ScheduleWindow>, fallback: JitterRange) -> Self {
        Self {
            windows,
            fallback,
            rng: fastrand::Rng::new(),
        }
    }

    /// Builds a scheduler from the schedule configuration
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        let windows = config
            .windows
            .iter()
            .map(ScheduleWindow::from_entry)
            .collect::<Result<Vec<_>, _>>()?;
        let fallback = JitterRange::new(config.fallback_min_secs, config.fallback_max_secs)?;
        Ok(Self::new(windows, fallback))
    }

    /// Replaces the random source with a seeded one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Returns the delay bounds in effect at `now`
    pub fn range_at(&self, now: NaiveTime) -> JitterRange {
        self.windows
            .iter()
            .find(|window| window.contains(now))
            .map(|window| window.range)
            .unwrap_or(self.fallback)
    }

    /// Draws the delay in seconds before the next cycle
    pub fn next_delay_seconds(&mut self, now: NaiveTime) -> u64 {
        let range = self.range_at(now);
        range.sample(&mut self.rng)
    }

    /// Runs cycles until `cancel` fires
    ///
    /// Each iteration waits a freshly drawn delay, then runs one cycle to
    /// completion. Cancellation is observed while waiting; a cycle that has
    /// already started is allowed to finish.
    ///
    /// # Returns
    ///
    /// The number of cycles run
    pub async fn run(&mut self, cycle: &ScrapeCycle, cancel: CancellationToken) -> u64 {
        let mut cycles = 0;

        loop {
            let now = Local::now();
            let delay = self.next_delay_seconds(now.time());
            tracing::info!(
                "Job scheduled to run in {} seconds (next run at {})",
                delay,
                next_run_label(now, delay)
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler cancelled after {} cycles", cycles);
                    break;
                }
                _ = tokio::time::sleep(Duration::from_secs(delay)) => {}
            }

            tracing::info!("Starting cycle at {}", Local::now().format("%H:%M:%S"));
            let report = cycle.run().await;
            cycles += 1;
            tracing::info!("Cycle {} complete: {}", cycles, report);
        }

        cycles
    }
}

/// Wall-clock time of the next run, `"unknown"` if it is not representable
fn next_run_label(now: DateTime<Local>, delay: u64) -> String {
    i64::try_from(delay)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|offset| now.checked_add_signed(offset))
        .map(|next_run| next_run.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
