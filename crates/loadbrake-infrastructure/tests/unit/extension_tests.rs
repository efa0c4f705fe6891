//! Webhook extension tests

use loadbrake_domain::error::Error;
use loadbrake_domain::ports::BreakerExtension;
use loadbrake_infrastructure::adapters::WebhookExtension;
use loadbrake_infrastructure::config::ExtensionConfig;
use mockito::{Matcher, Server};
use std::time::Duration;

const PAYLOAD: &str = r#"[{"key":"CPU_USAGE","value":{"cpu_usage_percentage":42.0}}]"#;

fn extension(url: String) -> WebhookExtension {
    WebhookExtension::new(url, Duration::from_secs(2), reqwest::Client::new())
}

#[test]
fn test_from_config_without_url_is_none() {
    let extension = WebhookExtension::from_config(&ExtensionConfig::default()).unwrap();
    assert!(extension.is_none());
}

#[test]
fn test_from_config_with_url() {
    let config = ExtensionConfig {
        webhook_url: Some("http://hooks.local/perf".to_string()),
        ..ExtensionConfig::default()
    };
    let extension = WebhookExtension::from_config(&config).unwrap().unwrap();
    assert_eq!(extension.url(), "http://hooks.local/perf");
    assert_eq!(extension.name(), "webhook");
}

#[tokio::test]
async fn test_posts_serialized_metrics() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/perf")
        .match_header("content-type", "application/json; charset=utf-8")
        .match_body(Matcher::Exact(PAYLOAD.to_string()))
        .with_status(204)
        .create_async()
        .await;

    extension(format!("{}/perf", server.url()))
        .check_performance(PAYLOAD)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_payload_is_dispatch_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/perf")
        .with_status(422)
        .create_async()
        .await;

    let err = extension(format!("{}/perf", server.url()))
        .check_performance(PAYLOAD)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ExtensionDispatch { .. }));
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_dispatch_error() {
    let err = extension("http://127.0.0.1:1/perf".to_string())
        .check_performance(PAYLOAD)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ExtensionDispatch { .. }));
}
