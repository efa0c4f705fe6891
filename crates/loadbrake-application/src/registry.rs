//! Collector Registry
//!
//! Registration table mapping each [`MetricKey`] to the collector that
//! measures it, built once at startup. Collection walks the configured key
//! order and isolates every collector: a failure, timeout, panic or a metric
//! of the wrong kind drops that key from the snapshot and nothing else.

use crate::isolation::catch_panic;
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{Error, MetricKey, MetricsSnapshot, PerformanceMetric};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Maps metric keys to collectors and produces per-cycle snapshots
pub struct CollectorRegistry {
    keys: Vec<MetricKey>,
    collectors: HashMap<MetricKey, Arc<dyn MetricCollector>>,
    timeout: Option<Duration>,
}

impl CollectorRegistry {
    /// Create an empty registry that will collect `keys` in the given order
    ///
    /// Duplicate keys are ignored after their first occurrence.
    pub fn new(keys: impl IntoIterator<Item = MetricKey>) -> Self {
        let mut ordered = Vec::new();
        for key in keys {
            if !ordered.contains(&key) {
                ordered.push(key);
            }
        }
        Self {
            keys: ordered,
            collectors: HashMap::new(),
            timeout: None,
        }
    }

    /// Bound each collector call; an elapsed call counts as a collector failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a collector, builder style
    pub fn with_collector(mut self, collector: Arc<dyn MetricCollector>) -> Self {
        self.register(collector);
        self
    }

    /// Register a collector under its own key, returning any collector it replaced
    pub fn register(
        &mut self,
        collector: Arc<dyn MetricCollector>,
    ) -> Option<Arc<dyn MetricCollector>> {
        self.collectors.insert(collector.key(), collector)
    }

    /// Keys to collect, in collection order
    pub fn configured_keys(&self) -> &[MetricKey] {
        &self.keys
    }

    /// Whether a collector is registered for `key`
    pub fn is_registered(&self, key: MetricKey) -> bool {
        self.collectors.contains_key(&key)
    }

    /// Collect every configured key, omitting those whose collector failed
    pub async fn collect(&self) -> MetricsSnapshot {
        let mut metrics = Vec::with_capacity(self.keys.len());

        for &key in &self.keys {
            let Some(collector) = self.collectors.get(&key) else {
                warn!(metric_key = %key, "No collector registered, skipping metric");
                continue;
            };

            match self.collect_one(key, collector.as_ref()).await {
                Ok(metric) => metrics.push(metric),
                Err(e) => error!(metric_key = %key, error = %e, "Metric collection failed"),
            }
        }

        debug!(
            collected = metrics.len(),
            configured = self.keys.len(),
            "Metrics collected"
        );
        MetricsSnapshot::new(metrics)
    }

    async fn collect_one(
        &self,
        key: MetricKey,
        collector: &dyn MetricCollector,
    ) -> loadbrake_domain::Result<PerformanceMetric> {
        let call = catch_panic(collector.collect());
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::collector(key, format!("timed out after {limit:?}")))?,
            None => call.await,
        };

        let metric =
            outcome.map_err(|panic| Error::collector(key, format!("panicked: {panic}")))??;
        if metric.key() != key {
            return Err(Error::collector(
                key,
                format!("collector returned a {} measurement", metric.key()),
            ));
        }
        Ok(metric)
    }
}
