//! Breaker dispatcher tests

use crate::test_utils::{cpu_metric, PanickingExtension, RecordingExtension};
use loadbrake_application::{BreakerDispatcher, DispatchOutcome};
use loadbrake_domain::{MetricsSnapshot, PerformanceMetric};
use std::sync::Arc;

#[tokio::test]
async fn test_without_extension_is_noop() {
    let dispatcher = BreakerDispatcher::new(None);
    assert!(!dispatcher.is_configured());
    let outcome = dispatcher.dispatch(&MetricsSnapshot::empty()).await;
    assert_eq!(outcome, DispatchOutcome::NotConfigured);
}

#[tokio::test]
async fn test_delivers_serialized_metric_list() {
    let extension = Arc::new(RecordingExtension::default());
    let dispatcher = BreakerDispatcher::new(Some(extension.clone()));
    let snapshot = MetricsSnapshot::new(vec![cpu_metric(55.0)]);

    assert_eq!(dispatcher.dispatch(&snapshot).await, DispatchOutcome::Delivered);

    let payloads = extension.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    let decoded: Vec<PerformanceMetric> = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(decoded, vec![cpu_metric(55.0)]);
}

#[tokio::test]
async fn test_extension_error_is_swallowed() {
    let dispatcher = BreakerDispatcher::new(Some(Arc::new(RecordingExtension::failing())));
    let outcome = dispatcher.dispatch(&MetricsSnapshot::empty()).await;
    assert_eq!(outcome, DispatchOutcome::Failed);
}

#[tokio::test]
async fn test_extension_panic_is_swallowed() {
    let dispatcher = BreakerDispatcher::new(Some(Arc::new(PanickingExtension)));
    let outcome = dispatcher.dispatch(&MetricsSnapshot::empty()).await;
    assert_eq!(outcome, DispatchOutcome::Failed);
}
