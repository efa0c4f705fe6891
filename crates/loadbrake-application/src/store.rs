//! Metrics Snapshot Store
//!
//! Holds the most recently published snapshot and the CPU usage derived from
//! it. Both are swapped together through one [`ArcSwap`], so a reader never
//! pairs a snapshot with the CPU usage of another one. Readers on reporting
//! threads never wait for the cycle that is publishing.

use arc_swap::ArcSwap;
use loadbrake_domain::MetricsSnapshot;
use std::sync::Arc;

/// One published state: a snapshot and the CPU usage in effect with it
#[derive(Debug, Clone)]
pub struct PublishedMetrics {
    /// Latest snapshot
    pub snapshot: Arc<MetricsSnapshot>,
    /// CPU usage from this snapshot, or carried over when it has none
    pub cpu_usage: u8,
}

/// Latest snapshot plus cached CPU usage
pub struct MetricsStore {
    current: ArcSwap<PublishedMetrics>,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsStore {
    /// Create a store holding the empty snapshot and 0% CPU usage
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(PublishedMetrics {
                snapshot: Arc::new(MetricsSnapshot::empty()),
                cpu_usage: 0,
            }),
        }
    }

    /// Replace the stored snapshot
    ///
    /// The cached CPU usage is updated only when the snapshot carries a
    /// `CPU_USAGE` measurement; otherwise the previous value is kept.
    pub fn publish(&self, snapshot: MetricsSnapshot) -> Arc<MetricsSnapshot> {
        let cpu_usage = snapshot.cpu_usage_percent();
        let published = Arc::new(snapshot);
        self.current.rcu(|current| PublishedMetrics {
            snapshot: Arc::clone(&published),
            cpu_usage: cpu_usage.unwrap_or(current.cpu_usage),
        });
        published
    }

    /// Snapshot and CPU usage as one consistent pair
    pub fn current(&self) -> Arc<PublishedMetrics> {
        self.current.load_full()
    }

    /// Most recently published snapshot
    pub fn current_snapshot(&self) -> Arc<MetricsSnapshot> {
        Arc::clone(&self.current.load().snapshot)
    }

    /// Most recently observed CPU usage percentage
    pub fn current_cpu_usage(&self) -> u8 {
        self.current.load().cpu_usage
    }
}
