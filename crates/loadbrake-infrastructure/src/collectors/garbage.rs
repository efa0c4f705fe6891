//! Garbage collection statistics
//!
//! Native hosts have no collector to report on. A host embedding a managed
//! runtime supplies a [`GcStatsSource`].

use async_trait::async_trait;
use loadbrake_domain::error::Result;
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{GarbageCollectorInfo, GarbageInfo, MetricKey, PerformanceMetric};
use std::sync::Arc;

/// Host-provided garbage collector statistics
#[async_trait]
pub trait GcStatsSource: Send + Sync {
    /// Cumulative statistics per collector
    async fn gc_stats(&self) -> Result<Vec<GarbageCollectorInfo>>;
}

/// `GARBAGE_INFO` collector
#[derive(Default)]
pub struct GarbageInfoCollector {
    source: Option<Arc<dyn GcStatsSource>>,
}

impl GarbageInfoCollector {
    /// Collector reporting from `source`, or an empty list for `None`
    pub fn new(source: Option<Arc<dyn GcStatsSource>>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl MetricCollector for GarbageInfoCollector {
    fn key(&self) -> MetricKey {
        MetricKey::GarbageInfo
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let collectors = match &self.source {
            Some(source) => source.gc_stats().await?,
            None => Vec::new(),
        };
        Ok(PerformanceMetric::GarbageInfo(GarbageInfo { collectors }))
    }
}
