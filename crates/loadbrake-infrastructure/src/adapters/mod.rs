//! Port adapters
//!
//! - [`threshold`]: HTTP client for the remote throttling limit
//! - [`engine`]: detection engine control (in-process flag, process signals)
//! - [`extension`]: webhook breaker extension

pub mod engine;
pub mod extension;
pub mod threshold;

#[cfg(unix)]
pub use engine::ProcessSignalEngine;
pub use engine::InProcessEngine;
pub use extension::WebhookExtension;
pub use threshold::{RemoteThresholdClient, parse_limit_response};
