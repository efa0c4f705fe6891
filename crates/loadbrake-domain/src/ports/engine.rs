//! Engine Control Port

use crate::error::Result;
use crate::value_objects::ControllerState;
use async_trait::async_trait;

/// Control surface of the supervised detection engine
#[async_trait]
pub trait EngineControl: Send + Sync {
    /// Resume the engine
    async fn start(&self) -> Result<()>;

    /// Suspend the engine
    async fn stop(&self) -> Result<()>;

    /// Status last recorded on the engine
    fn running_status(&self) -> ControllerState;

    /// Record a new status on the engine
    fn set_running_status(&self, state: ControllerState);
}
