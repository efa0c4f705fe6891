//! Configuration loader
//!
//! Sources are merged in this order, later ones overriding earlier ones:
//! 1. [`AppConfig::default()`]
//! 2. A TOML file (explicit path, or the first default location that exists)
//! 3. Environment variables such as `LOADBRAKE__SERVER__TOKEN`

use crate::config::AppConfig;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::MetricKey;
use loadbrake_domain::constants::PERCENT_MAX;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        let prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        candidates.extend(
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        );

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate every configuration section
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(config)?;
    validate_monitor_config(config)?;
    validate_extension_config(config)?;
    Ok(())
}

fn validate_server_config(config: &AppConfig) -> Result<()> {
    if config.server.base_url.trim().is_empty() {
        return Err(Error::config("Server base URL cannot be empty"));
    }
    if config.server.connect_timeout_ms == 0 || config.server.read_timeout_ms == 0 {
        return Err(Error::config("Server timeouts cannot be 0"));
    }
    Ok(())
}

fn validate_monitor_config(config: &AppConfig) -> Result<()> {
    let monitor = &config.monitor;
    if monitor.interval_secs == 0 {
        return Err(Error::config("Monitor interval cannot be 0"));
    }
    if monitor.cpu_sample_window_ms == 0 {
        return Err(Error::config("CPU sample window cannot be 0"));
    }
    if monitor.collector_timeout_ms == 0 {
        return Err(Error::config("Collector timeout cannot be 0"));
    }
    if monitor.metrics.is_empty() {
        return Err(Error::config("At least one metric must be configured"));
    }

    let mut seen: Vec<MetricKey> = Vec::with_capacity(monitor.metrics.len());
    for key in &monitor.metrics {
        if seen.contains(key) {
            return Err(Error::config(format!("Metric {key} is configured twice")));
        }
        seen.push(*key);
    }

    if let Some(resume) = monitor.resume_threshold
        && resume > PERCENT_MAX
    {
        return Err(Error::config(format!(
            "Resume threshold {resume} exceeds {PERCENT_MAX}%"
        )));
    }
    Ok(())
}

fn validate_extension_config(config: &AppConfig) -> Result<()> {
    let extension = &config.extension;
    if extension
        .webhook_url
        .as_ref()
        .is_some_and(|url| url.trim().is_empty())
    {
        return Err(Error::config("Webhook URL cannot be empty when set"));
    }
    if extension.webhook_url.is_some() && extension.timeout_ms == 0 {
        return Err(Error::config("Extension timeout cannot be 0"));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set server configuration
    pub fn with_server(mut self, server: crate::config::ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Set monitor configuration
    pub fn with_monitor(mut self, monitor: crate::config::MonitorConfig) -> Self {
        self.config.monitor = monitor;
        self
    }

    /// Set engine configuration
    pub fn with_engine(mut self, engine: crate::config::EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Set extension configuration
    pub fn with_extension(mut self, extension: crate::config::ExtensionConfig) -> Self {
        self.config.extension = extension;
        self
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: crate::config::LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
