//! Monitor wiring
//!
//! Builds every adapter named by an [`AppConfig`] and assembles the
//! [`PerformanceMonitor`].

use crate::adapters::{InProcessEngine, RemoteThresholdClient, WebhookExtension};
use crate::collectors::{GcStatsSource, default_registry};
use crate::config::{AppConfig, EngineConfig};
use loadbrake_application::PerformanceMonitor;
use loadbrake_domain::Threshold;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::{BreakerExtension, EngineControl};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Engine adapter for `config`
pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn EngineControl>> {
    match config.pid {
        None => Ok(Arc::new(InProcessEngine::new())),
        #[cfg(unix)]
        Some(pid) => Ok(Arc::new(crate::adapters::ProcessSignalEngine::new(pid)?)),
        #[cfg(not(unix))]
        Some(_) => Err(Error::config(
            "Process engine control is only supported on Unix hosts",
        )),
    }
}

/// Monitor driving `engine` as configured
pub fn build_monitor_with_engine(
    config: &AppConfig,
    engine: Arc<dyn EngineControl>,
    gc_source: Option<Arc<dyn GcStatsSource>>,
    cancel: CancellationToken,
) -> Result<PerformanceMonitor> {
    let threshold_source = Arc::new(
        RemoteThresholdClient::from_config(&config.server)?.with_cancellation(cancel.clone()),
    );
    let registry = default_registry(&config.monitor, gc_source, cancel)?;
    let extension = WebhookExtension::from_config(&config.extension)?
        .map(|ext| Arc::new(ext) as Arc<dyn BreakerExtension>);
    let resume_threshold = config
        .monitor
        .resume_threshold
        .map(Threshold::new)
        .transpose()
        .map_err(|e| Error::config(format!("Invalid resume threshold: {e}")))?;

    info!(
        endpoint = %threshold_source.endpoint(),
        metrics = config.monitor.metrics.len(),
        extension = extension.is_some(),
        "Performance monitor configured"
    );

    Ok(PerformanceMonitor::builder(engine)
        .registry(registry)
        .threshold_source(threshold_source)
        .extension(extension)
        .resume_threshold(resume_threshold)
        .build())
}

/// Monitor with the engine adapter named by `config.engine`
pub fn build_monitor(config: &AppConfig, cancel: CancellationToken) -> Result<PerformanceMonitor> {
    let engine = build_engine(&config.engine)?;
    build_monitor_with_engine(config, engine, None, cancel)
}
