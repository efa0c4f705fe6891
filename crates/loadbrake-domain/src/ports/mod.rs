//! Domain Port Interfaces
//!
//! Contracts between the breaker core and its collaborators. The
//! application layer depends only on these traits; infrastructure and the
//! host process supply the implementations.
//!
//! - **collector** - produce a measurement for one metric key
//! - **engine** - start/stop the supervised detection engine
//! - **extension** - optional external breaker policy
//! - **threshold** - remote source of the throttling threshold

/// Metric collector port
pub mod collector;
/// Engine control port
pub mod engine;
/// Breaker extension port
pub mod extension;
/// Threshold source port
pub mod threshold;

pub use collector::MetricCollector;
pub use engine::EngineControl;
pub use extension::BreakerExtension;
pub use threshold::ThresholdSource;
