//! Remote threshold client
//!
//! `GET <base>/api/v1/agent/limit?agentName=<agent>` authenticated with
//! `Authorization: Token <token>`. The body carries a `data` list of limit
//! records; only `data[0].value` is read. With a cancellation token attached,
//! an in-flight request is abandoned as soon as shutdown is requested.

use crate::config::ServerConfig;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use async_trait::async_trait;
use loadbrake_domain::Threshold;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::ThresholdSource;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// [`ThresholdSource`] backed by the control service
pub struct RemoteThresholdClient {
    http_client: Client,
    endpoint: Url,
    token: String,
    cancel: Option<CancellationToken>,
}

impl RemoteThresholdClient {
    /// Client for `base_url` identifying as `agent_name`
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        agent_name: &str,
        http_client: Client,
    ) -> Result<Self> {
        let endpoint = Url::parse_with_params(
            &format!("{}{LIMIT_ENDPOINT_PATH}", base_url.trim_end_matches('/')),
            &[(AGENT_NAME_QUERY_PARAM, agent_name)],
        )
        .config_context(format!("Invalid control service URL '{base_url}'"))?;

        Ok(Self {
            http_client,
            endpoint,
            token: token.into(),
            cancel: None,
        })
    }

    /// Client with the configured connect and read timeouts
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .config_context("Failed to build HTTP client")?;

        Self::new(
            &config.base_url,
            config.token.clone(),
            &config.resolved_agent_name(),
            http_client,
        )
    }

    /// Abandon in-flight requests once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Full request URL including the agent query
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request_threshold(&self) -> Result<Threshold> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, format!("{AUTHORIZATION_TOKEN_PREFIX}{}", self.token))
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON_UTF8)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::network_with_source("Threshold request timed out", e)
                } else {
                    Error::network_with_source(format!("Threshold request failed: {e}"), e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::threshold_fetch(format!(
                "control service returned {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .network_context("Failed to read threshold response")?;
        let threshold = parse_limit_response(&body)?;
        debug!(threshold = threshold.value(), "Threshold fetched");
        Ok(threshold)
    }
}

#[async_trait]
impl ThresholdSource for RemoteThresholdClient {
    async fn fetch_threshold(&self) -> Result<Threshold> {
        let Some(cancel) = &self.cancel else {
            return self.request_threshold().await;
        };
        if cancel.is_cancelled() {
            return Err(Error::threshold_fetch("shutdown requested"));
        }

        tokio::select! {
            () = cancel.cancelled() => Err(Error::threshold_fetch("request cancelled by shutdown")),
            result = self.request_threshold() => result,
        }
    }
}

/// Extract the threshold from a limit response body
///
/// `data[0].value` may be a JSON number or a numeric string.
pub fn parse_limit_response(body: &str) -> Result<Threshold> {
    if body.trim().is_empty() {
        return Err(Error::threshold_fetch("empty response body"));
    }

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| Error::threshold_fetch(format!("malformed response: {e}")))?;

    let value = payload
        .get("data")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .and_then(|record| record.get("value"))
        .ok_or_else(|| Error::threshold_fetch("response has no data[0].value"))?;

    let percent = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::threshold_fetch(format!("limit value {value} is not an integer")))?;

    u8::try_from(percent)
        .map_err(|_| Error::threshold_fetch(format!("limit value {percent} out of range")))
        .and_then(|p| Threshold::new(p).map_err(|e| Error::threshold_fetch(e.to_string())))
}
