use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::Serialize;
use tether_core::NotifyError;
use tether_domain::TetherError;
use tracing::debug;
use url::Url;

use crate::errors::{notify_error_from_http, InfraError};

/// Upper bound on how much of an error response body is kept
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client for posting JSON payloads to webhooks.
///
/// Each call is a single attempt: notification delivery is fire-and-forget
/// and must never be retried here.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: ReqwestClient,
}

impl WebhookClient {
    /// Start building a new webhook client.
    pub fn builder() -> WebhookClientBuilder {
        WebhookClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TetherError> {
        Self::builder().build()
    }

    /// POST `payload` as JSON to `url`.
    ///
    /// Any 2xx status counts as delivered. Other statuses return
    /// [`NotifyError::Status`] with (a prefix of) the response body.
    pub async fn post_json<T>(&self, url: &Url, payload: &T) -> Result<(), NotifyError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(|err| NotifyError::Serialization(err.to_string()))?;

        debug!(%url, bytes = body.len(), "posting webhook payload");

        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(notify_error_from_http)?;

        let status = response.status();
        debug!(%url, %status, "received webhook response");

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Status { code: status.as_u16(), body: truncate(body) })
    }
}

fn truncate(mut body: String) -> String {
    if let Some((idx, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        body.truncate(idx);
        body.push_str("...");
    }
    body
}

/// Builder for [`WebhookClient`].
#[derive(Debug)]
pub struct WebhookClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for WebhookClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: Some(concat!("tether/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl WebhookClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<WebhookClient, TetherError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            TetherError::from(infra)
        })?;

        Ok(WebhookClient { client })
    }
}
