//! System-wide CPU usage
//!
//! Samples the aggregated tick counters, waits one sampling window and
//! samples again. Usage is the non-idle share of the tick delta.

use crate::constants::PROC_STAT_PATH;
use crate::error_ext::ErrorContext;
use async_trait::async_trait;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{CpuInfo, MetricKey, PerformanceMetric};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cumulative CPU time per category, in clock ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTicks {
    /// Sum of every category
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }
}

/// Usage percentage between two samples
///
/// `100 × (1 − idleDelta / totalDelta)`, or 0 when no ticks elapsed.
pub fn cpu_usage_percent(prev: &CpuTicks, curr: &CpuTicks) -> f64 {
    let total = curr.total().saturating_sub(prev.total());
    if total == 0 {
        return 0.0;
    }
    let idle = curr.idle.saturating_sub(prev.idle).min(total);
    100.0 * (total - idle) as f64 / total as f64
}

/// Parse the aggregated `cpu` line of `/proc/stat`
pub fn parse_proc_stat(content: &str) -> Result<CpuTicks> {
    let line = content
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| Error::collector(MetricKey::CpuUsage, "no aggregated cpu line"))?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(str::parse::<u64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::collector(MetricKey::CpuUsage, format!("bad tick counter: {e}")))?;

    if fields.len() < 4 {
        return Err(Error::collector(
            MetricKey::CpuUsage,
            format!("expected at least 4 tick counters, found {}", fields.len()),
        ));
    }

    let field = |i: usize| fields.get(i).copied().unwrap_or(0);
    Ok(CpuTicks {
        user: field(0),
        nice: field(1),
        system: field(2),
        idle: field(3),
        iowait: field(4),
        irq: field(5),
        softirq: field(6),
        steal: field(7),
    })
}

/// Source of cumulative CPU tick counters
pub trait TickSource: Send + Sync {
    /// Read the current counters
    fn read_ticks(&self) -> Result<CpuTicks>;
}

/// Linux `/proc/stat` reader
pub struct ProcStatTickSource {
    path: PathBuf,
}

impl ProcStatTickSource {
    /// Reader for the system `/proc/stat`
    pub fn new() -> Self {
        Self::with_path(PROC_STAT_PATH)
    }

    /// Reader for a stat file at `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStatTickSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ProcStatTickSource {
    fn read_ticks(&self) -> Result<CpuTicks> {
        let content = std::fs::read_to_string(&self.path)
            .io_context(format!("Failed to read {}", self.path.display()))?;
        parse_proc_stat(&content)
    }
}

/// `CPU_USAGE` collector
pub struct CpuUsageCollector {
    source: Arc<dyn TickSource>,
    window: Duration,
    cancel: CancellationToken,
}

impl CpuUsageCollector {
    /// Sample `source` across `window`; `cancel` aborts a pending window
    pub fn new(source: Arc<dyn TickSource>, window: Duration, cancel: CancellationToken) -> Self {
        Self {
            source,
            window,
            cancel,
        }
    }
}

#[async_trait]
impl MetricCollector for CpuUsageCollector {
    fn key(&self) -> MetricKey {
        MetricKey::CpuUsage
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let prev = self.source.read_ticks()?;
        tokio::select! {
            () = self.cancel.cancelled() => return Err(Error::cancelled("CPU sampling window")),
            () = tokio::time::sleep(self.window) => {}
        }
        let curr = self.source.read_ticks()?;

        Ok(PerformanceMetric::CpuUsage(CpuInfo {
            cpu_usage_percentage: cpu_usage_percent(&prev, &curr),
        }))
    }
}
