//! Configuration management
//!
//! Defaults, TOML file and `LOADBRAKE__*` environment variables merged with
//! Figment, then validated before anything is wired.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{
    AppConfig, EngineConfig, ExtensionConfig, LoggingConfig, MonitorConfig, ServerConfig,
};
