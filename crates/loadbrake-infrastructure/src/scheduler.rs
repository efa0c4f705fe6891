//! Periodic cycle driver
//!
//! Runs [`PerformanceMonitor::run_cycle`] on a fixed interval until the
//! cancellation token fires. Ticks missed while a cycle overruns are
//! skipped, not replayed. The token handed to the collectors and the
//! threshold client cuts short the cycle in flight, whose engine action still
//! runs to completion. On shutdown a stopped engine is resumed so a
//! suspended process is never left frozen.

use loadbrake_application::{CycleOutcome, PerformanceMonitor};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives a monitor on a fixed cadence
pub struct MonitorScheduler {
    monitor: Arc<PerformanceMonitor>,
    interval: Duration,
    cancel: CancellationToken,
}

impl MonitorScheduler {
    pub fn new(
        monitor: Arc<PerformanceMonitor>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            monitor,
            interval,
            cancel,
        }
    }

    /// Run cycles until cancelled, returning the number of completed cycles
    pub async fn run(self) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut completed = 0_u64;

        info!(interval_secs = self.interval.as_secs(), "Monitor scheduler started");
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if self.cancel.is_cancelled() {
                break;
            }

            match self.monitor.run_cycle().await {
                CycleOutcome::Completed(_) => {
                    completed += 1;
                    log_report(&self.monitor);
                }
                CycleOutcome::Skipped => debug!("Cycle skipped, previous one still running"),
            }
        }

        self.monitor.resume_engine().await;
        info!(cycles = completed, "Monitor scheduler stopped");
        completed
    }

    /// Run on a background task
    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }
}

fn log_report(monitor: &PerformanceMonitor) {
    match serde_json::to_string(&monitor.report()) {
        Ok(report) => debug!(report = %report, "Performance report"),
        Err(e) => warn!(error = %e, "Failed to serialize performance report"),
    }
}
