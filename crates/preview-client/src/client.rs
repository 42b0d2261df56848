//! Bounded API client
//!
//! Every call is raced against a fixed ceiling and an optional external
//! cancellation token. A backend in `timeout` mode therefore surfaces as
//! [`ClientError::Aborted`] rather than hanging the caller.

use crate::activity::ActivityLog;
use crate::error::{AbortReason, ClientError};
use crate::transport::{RawResponse, Transport};
use preview_mock::{ErrorBody, Method, MockRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ceiling for a single request, in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With request ceiling
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Request ceiling as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout_ms: 6000 }
    }
}

/// API client over any [`Transport`]
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    log: Arc<ActivityLog>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create client with its own activity log
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            log: Arc::new(ActivityLog::new()),
        }
    }

    /// With a shared activity log
    #[must_use]
    pub fn with_log(mut self, log: Arc<ActivityLog>) -> Self {
        self.log = log;
        self
    }

    /// Activity log written by this client
    #[must_use]
    pub fn log(&self) -> &Arc<ActivityLog> {
        &self.log
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a request and decode a 2xx body into `T`
    ///
    /// # Errors
    /// - `ClientError::Aborted` if the ceiling elapses first
    /// - `ClientError::Status` for non-2xx responses
    /// - `ClientError::Transport` if the transport fails
    /// - `ClientError::Decode` if the body does not fit `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        self.fetch_with_cancel(method, url, body, None).await
    }

    /// Like [`ApiClient::fetch`], also aborting when `cancel` fires
    ///
    /// # Errors
    /// As [`ApiClient::fetch`]; cancellation yields `ClientError::Aborted`.
    pub async fn fetch_with_cancel<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, ClientError> {
        let label = format!("{method} {url}");
        let outcome = self.exchange(&label, method, url, body, cancel).await;
        let decoded = outcome.and_then(|payload| serde_json::from_value(payload).map_err(ClientError::from));

        if let Err(err) = &decoded {
            tracing::warn!(request = %label, error = %err, "request failed");
            self.log
                .api(format!("{label} error"), Some(Value::String(err.to_string())));
        }
        decoded
    }

    /// `GET url`
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        self.fetch(Method::Get, url, None).await
    }

    /// `POST url` with a JSON body
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, ClientError> {
        self.fetch(Method::Post, url, Some(body)).await
    }

    /// `DELETE url`
    ///
    /// # Errors
    /// See [`ApiClient::fetch`].
    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        self.fetch(Method::Delete, url, None).await
    }

    async fn exchange(
        &self,
        label: &str,
        method: Method,
        url: &str,
        body: Option<&Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value, ClientError> {
        self.log.api(format!("{label} request"), body.cloned());

        let mut request = MockRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_body(body.to_string());
        }

        let ceiling = self.config.timeout();
        let raw = tokio::select! {
            sent = self.transport.send(request) => sent?,
            () = tokio::time::sleep(ceiling) => {
                return Err(ClientError::Aborted(AbortReason::Ceiling(ceiling)));
            }
            () = cancelled(cancel) => {
                return Err(ClientError::Aborted(AbortReason::Cancelled));
            }
        };

        self.settle(label, raw)
    }

    fn settle(&self, label: &str, raw: RawResponse) -> Result<Value, ClientError> {
        let payload: Value =
            serde_json::from_str(&raw.body).unwrap_or_else(|_| Value::Object(Map::new()));
        self.log
            .api(format!("{label} response {}", raw.status), Some(payload.clone()));
        tracing::debug!(request = %label, status = raw.status, "response received");

        if (200..300).contains(&raw.status) {
            return Ok(payload);
        }
        let message = ErrorBody::from_payload(&payload)
            .map(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", raw.status));
        Err(ClientError::status(raw.status, message))
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => futures::future::pending().await,
    }
}
