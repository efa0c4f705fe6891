//! Metrics snapshot
//!
//! The set of measurements produced by one collection cycle. A snapshot is
//! immutable once built and replaces its predecessor wholesale.

use super::metric::{MetricKey, PerformanceMetric};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered measurements from a single cycle, one per successfully collected key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    metrics: Vec<PerformanceMetric>,
    collected_at: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Build a snapshot stamped with the current time
    pub fn new(metrics: Vec<PerformanceMetric>) -> Self {
        Self {
            metrics,
            collected_at: Some(Utc::now()),
        }
    }

    /// The empty snapshot held before the first cycle completes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Measurements in collection order
    pub fn metrics(&self) -> &[PerformanceMetric] {
        &self.metrics
    }

    /// When the snapshot was built, `None` for the initial empty snapshot
    pub fn collected_at(&self) -> Option<DateTime<Utc>> {
        self.collected_at
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no measurement is present
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Measurement for `key`, if its collector succeeded
    pub fn get(&self, key: MetricKey) -> Option<&PerformanceMetric> {
        self.metrics.iter().find(|metric| metric.key() == key)
    }

    /// Keys present in this snapshot, in collection order
    pub fn keys(&self) -> Vec<MetricKey> {
        self.metrics.iter().map(PerformanceMetric::key).collect()
    }

    /// Whole-percent CPU usage, if `CPU_USAGE` was collected
    pub fn cpu_usage_percent(&self) -> Option<u8> {
        self.get(MetricKey::CpuUsage)
            .and_then(PerformanceMetric::as_cpu)
            .map(|cpu| cpu.usage_percent())
    }

    /// Serialize the measurement list as JSON for external consumers
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.metrics)?)
    }
}

impl From<Vec<PerformanceMetric>> for MetricsSnapshot {
    fn from(metrics: Vec<PerformanceMetric>) -> Self {
        Self::new(metrics)
    }
}
