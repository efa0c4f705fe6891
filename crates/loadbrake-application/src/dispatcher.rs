//! Breaker Dispatcher
//!
//! Best-effort forwarding of each snapshot to the optional breaker
//! extension. The extension is injected once at construction; when absent,
//! dispatch is a no-op.

use crate::isolation::catch_panic;
use loadbrake_domain::MetricsSnapshot;
use loadbrake_domain::ports::BreakerExtension;
use std::sync::Arc;
use tracing::{debug, error};

/// Result of one dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No extension configured
    NotConfigured,
    /// The extension accepted the snapshot
    Delivered,
    /// Serialization or the extension failed; the failure was logged
    Failed,
}

/// Forwards snapshots to an optional [`BreakerExtension`]
#[derive(Default)]
pub struct BreakerDispatcher {
    extension: Option<Arc<dyn BreakerExtension>>,
}

impl BreakerDispatcher {
    /// Dispatcher with the given extension, or a no-op one for `None`
    pub fn new(extension: Option<Arc<dyn BreakerExtension>>) -> Self {
        Self { extension }
    }

    /// Whether an extension is configured
    pub fn is_configured(&self) -> bool {
        self.extension.is_some()
    }

    /// Serialize `snapshot` and hand it to the extension
    pub async fn dispatch(&self, snapshot: &MetricsSnapshot) -> DispatchOutcome {
        let Some(extension) = &self.extension else {
            return DispatchOutcome::NotConfigured;
        };

        let payload = match snapshot.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!(extension = extension.name(), error = %e, "Failed to serialize metrics for extension");
                return DispatchOutcome::Failed;
            }
        };

        match catch_panic(extension.check_performance(&payload)).await {
            Ok(Ok(())) => {
                debug!(extension = extension.name(), "Metrics dispatched to extension");
                DispatchOutcome::Delivered
            }
            Ok(Err(e)) => {
                error!(extension = extension.name(), error = %e, "Extension performance check failed");
                DispatchOutcome::Failed
            }
            Err(panic) => {
                error!(extension = extension.name(), panic = %panic, "Extension panicked during performance check");
                DispatchOutcome::Failed
            }
        }
    }
}
