//! Threshold Source Port

use crate::error::Result;
use crate::value_objects::Threshold;
use async_trait::async_trait;

/// Remote authority for the throttling threshold
#[async_trait]
pub trait ThresholdSource: Send + Sync {
    /// Fetch the current threshold; any failure is reported as an error
    async fn fetch_threshold(&self) -> Result<Threshold>;
}
