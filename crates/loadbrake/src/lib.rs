//! # Loadbrake
//!
//! Adaptive load-aware circuit breaker. Periodically measures host resource
//! pressure, compares CPU usage with a threshold fetched from a remote
//! control service and stops or starts a detection engine accordingly.
//!
//! ## Example
//!
//! ```ignore
//! use loadbrake::infrastructure::{ConfigLoader, build_monitor};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ConfigLoader::new().load()?;
//! let monitor = build_monitor(&config, CancellationToken::new())?;
//! monitor.run_cycle().await;
//! println!("cpu={} threshold={}", monitor.cpu_usage(), monitor.threshold());
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value objects, errors and port traits
//! - `application` - registry, store, synchronizer, dispatcher, controller, monitor
//! - `infrastructure` - config, logging, collectors, adapters, scheduler

use std::path::Path;
use std::sync::Arc;

use loadbrake_infrastructure::config::{AppConfig, ConfigLoader};
use loadbrake_infrastructure::{MonitorScheduler, build_monitor};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Domain layer - re-exports from the domain crate
pub mod domain {
    pub use loadbrake_domain::*;
}

/// Application layer - re-exports from the application crate
pub mod application {
    pub use loadbrake_application::*;
}

/// Infrastructure layer - re-exports from the infrastructure crate
pub mod infrastructure {
    pub use loadbrake_infrastructure::*;
}

pub use application::{CycleOutcome, PerformanceMonitor, PerformanceReport};
pub use domain::{ControllerState, Error, MetricKey, MetricsSnapshot, Result, Threshold};

/// Load configuration, install logging and supervise the engine
///
/// With `once`, runs a single cycle, prints the report as JSON and resumes
/// the engine before returning. Otherwise runs until Ctrl-C.
pub async fn run(
    config_path: Option<&Path>,
    once: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    loadbrake_infrastructure::logging::init_logging(&config.logging)?;

    let cancel = CancellationToken::new();
    let monitor = Arc::new(build_monitor(&config, cancel.child_token())?);
    info!(
        interval_secs = config.monitor.interval_secs,
        engine_pid = ?config.engine.pid,
        "Starting loadbrake"
    );

    if once {
        monitor.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(&monitor.report())?);
        monitor.resume_engine().await;
        return Ok(());
    }

    let scheduler =
        MonitorScheduler::new(Arc::clone(&monitor), config.monitor.interval(), cancel.clone());
    let handle = scheduler.spawn();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown requested");
    cancel.cancel();
    handle.await?;
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> loadbrake_domain::Result<AppConfig> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}
