//! Configuration types

use crate::constants::*;
use loadbrake_domain::MetricKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote control service
    pub server: ServerConfig,
    /// Cycle scheduling and collection
    pub monitor: MonitorConfig,
    /// Detection engine to supervise
    pub engine: EngineConfig,
    /// Optional breaker extension
    pub extension: ExtensionConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Remote control service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://control.example.com`
    pub base_url: String,
    /// Credential sent as `Authorization: Token <token>`
    pub token: String,
    /// Agent identity; the host name when unset
    pub agent_name: Option<String>,
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,
    /// Read timeout (milliseconds)
    pub read_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_BASE_URL.to_string(),
            token: String::new(),
            agent_name: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    /// Connect timeout as a [`Duration`]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a [`Duration`]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Configured agent name, falling back to the host name
    pub fn resolved_agent_name(&self) -> String {
        self.agent_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                hostname::get()
                    .ok()
                    .and_then(|name| name.into_string().ok())
            })
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string())
    }
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between cycles
    pub interval_secs: u64,
    /// Metrics to collect, in collection order
    pub metrics: Vec<MetricKey>,
    /// CPU sampling window (milliseconds)
    pub cpu_sample_window_ms: u64,
    /// Upper bound for one collector call (milliseconds)
    pub collector_timeout_ms: u64,
    /// Separate threshold for resuming the engine (percent)
    pub resume_threshold: Option<u8>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_MONITOR_INTERVAL_SECS,
            metrics: MetricKey::ALL.to_vec(),
            cpu_sample_window_ms: DEFAULT_CPU_SAMPLE_WINDOW_MS,
            collector_timeout_ms: DEFAULT_COLLECTOR_TIMEOUT_MS,
            resume_threshold: None,
        }
    }
}

impl MonitorConfig {
    /// Cycle interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// CPU sampling window as a [`Duration`]
    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    /// Collector timeout as a [`Duration`]
    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }
}

/// Detection engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Process suspended with `SIGSTOP` and resumed with `SIGCONT`.
    /// Without one the engine is an in-process flag.
    pub pid: Option<u32>,
}

/// Breaker extension configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Endpoint receiving each snapshot as JSON
    pub webhook_url: Option<String>,
    /// Request timeout (milliseconds)
    pub timeout_ms: u64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: DEFAULT_EXTENSION_TIMEOUT_MS,
        }
    }
}

impl ExtensionConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
