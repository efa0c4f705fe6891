//! Threshold Synchronizer
//!
//! Keeps the throttling threshold in sync with the remote control service.
//! A refresh never fails: any fetch error or panic is logged and the last
//! known value (initially [`Threshold::DEFAULT`]) is kept.

use crate::isolation::catch_panic;
use loadbrake_domain::Threshold;
use loadbrake_domain::ports::ThresholdSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{error, info};

/// Last-known-good threshold with a remote refresh
pub struct ThresholdSynchronizer {
    source: Option<Arc<dyn ThresholdSource>>,
    current: AtomicU8,
}

impl ThresholdSynchronizer {
    /// Synchronize against `source`, starting from the default threshold
    pub fn new(source: Arc<dyn ThresholdSource>) -> Self {
        Self {
            source: Some(source),
            current: AtomicU8::new(Threshold::DEFAULT.value()),
        }
    }

    /// A synchronizer that holds `threshold` and never contacts a remote
    pub fn fixed(threshold: Threshold) -> Self {
        Self {
            source: None,
            current: AtomicU8::new(threshold.value()),
        }
    }

    /// Threshold currently in effect
    pub fn current(&self) -> Threshold {
        // Only validated thresholds are ever stored.
        Threshold::new(self.current.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Fetch the remote threshold and return the best known value
    pub async fn refresh(&self) -> Threshold {
        let Some(source) = &self.source else {
            return self.current();
        };

        let fetched = match catch_panic(source.fetch_threshold()).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => Err(format!("threshold source panicked: {panic}")),
        };

        match fetched {
            Ok(threshold) => {
                let previous = self.current.swap(threshold.value(), Ordering::AcqRel);
                if previous != threshold.value() {
                    info!(
                        previous = previous,
                        threshold = threshold.value(),
                        "Throttling threshold updated"
                    );
                }
                threshold
            }
            Err(e) => {
                let kept = self.current();
                error!(error = %e, threshold = kept.value(), "Threshold refresh failed, keeping last known value");
                kept
            }
        }
    }
}
