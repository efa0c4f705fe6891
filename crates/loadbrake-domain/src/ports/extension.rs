//! Breaker Extension Port

use crate::error::Result;
use async_trait::async_trait;

/// External policy component that inspects raw metrics each cycle
///
/// The extension is outside the controller's critical path: its failures are
/// logged and never influence the start/stop decision.
#[async_trait]
pub trait BreakerExtension: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Inspect the JSON-serialized measurement list of the latest snapshot
    async fn check_performance(&self, serialized_metrics: &str) -> Result<()>;
}
