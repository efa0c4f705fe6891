//! Webhook breaker extension
//!
//! POSTs every serialized snapshot to a configured endpoint.

use crate::config::ExtensionConfig;
use crate::constants::CONTENT_TYPE_JSON_UTF8;
use crate::error_ext::ErrorContext;
use async_trait::async_trait;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::BreakerExtension;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const EXTENSION_NAME: &str = "webhook";

/// [`BreakerExtension`] forwarding snapshots over HTTP
pub struct WebhookExtension {
    http_client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookExtension {
    pub fn new(url: impl Into<String>, timeout: Duration, http_client: Client) -> Self {
        Self {
            http_client,
            url: url.into(),
            timeout,
        }
    }

    /// Extension for the configured webhook, or `None` when no URL is set
    pub fn from_config(config: &ExtensionConfig) -> Result<Option<Self>> {
        let Some(url) = &config.webhook_url else {
            return Ok(None);
        };
        let http_client = Client::builder()
            .build()
            .config_context("Failed to build HTTP client")?;
        Ok(Some(Self::new(url.clone(), config.timeout(), http_client)))
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BreakerExtension for WebhookExtension {
    fn name(&self) -> &str {
        EXTENSION_NAME
    }

    async fn check_performance(&self, serialized_metrics: &str) -> Result<()> {
        let response = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON_UTF8)
            .timeout(self.timeout)
            .body(serialized_metrics.to_owned())
            .send()
            .await
            .map_err(|e| {
                Error::extension_dispatch(EXTENSION_NAME, format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::extension_dispatch(
                EXTENSION_NAME,
                format!("endpoint returned {}", status.as_u16()),
            ));
        }
        Ok(())
    }
}
