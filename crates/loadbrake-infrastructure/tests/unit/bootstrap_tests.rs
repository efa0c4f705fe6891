//! Monitor wiring tests

use loadbrake_domain::ControllerState;
use loadbrake_domain::ports::EngineControl;
use loadbrake_infrastructure::bootstrap::{build_engine, build_monitor};
use loadbrake_infrastructure::config::{AppConfig, EngineConfig};
use tokio_util::sync::CancellationToken;

#[test]
fn test_build_engine_defaults_to_in_process() {
    let engine = build_engine(&EngineConfig::default()).unwrap();
    assert_eq!(engine.running_status(), ControllerState::Running);
}

#[cfg(unix)]
#[test]
fn test_build_engine_rejects_own_pid() {
    let config = EngineConfig {
        pid: Some(std::process::id()),
    };
    assert!(build_engine(&config).is_err());
}

#[tokio::test]
async fn test_build_monitor_from_defaults() {
    let monitor = build_monitor(&AppConfig::default(), CancellationToken::new()).unwrap();
    assert_eq!(monitor.state(), ControllerState::Running);
    assert_eq!(monitor.threshold().value(), 100);
    assert!(monitor.performance_metrics().is_empty());
}

#[tokio::test]
async fn test_build_monitor_rejects_out_of_range_resume_threshold() {
    let mut config = AppConfig::default();
    config.monitor.resume_threshold = Some(150);
    assert!(build_monitor(&config, CancellationToken::new()).is_err());
}
