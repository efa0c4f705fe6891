//! Metric Collector Port

use crate::error::Result;
use crate::value_objects::{MetricKey, PerformanceMetric};
use async_trait::async_trait;

/// Produces the current measurement for a single metric key
///
/// Implementations may block for a bounded time (the CPU collector waits out
/// its sampling window) but must honour cancellation where they do.
#[async_trait]
pub trait MetricCollector: Send + Sync {
    /// Key this collector is registered under
    fn key(&self) -> MetricKey;

    /// Take a measurement; the returned metric's key must equal [`Self::key`]
    async fn collect(&self) -> Result<PerformanceMetric>;
}
