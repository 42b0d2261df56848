//! Request transports
//!
//! A transport delivers one [`MockRequest`] and returns the raw status and
//! body text. It applies no deadline of its own; bounding is done by
//! [`crate::ApiClient`].

use crate::error::TransportError;
use preview_mock::{Method, MockRequest, MockServer};
use std::sync::Arc;

/// Status and undecoded body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Status code
    pub status: u16,
    /// Body text
    pub body: String,
}

impl RawResponse {
    /// Create raw response
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Delivers requests to a backend
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request
    async fn send(&self, request: MockRequest) -> Result<RawResponse, TransportError>;
}

/// In-process transport straight into a [`MockServer`]
#[derive(Debug, Clone)]
pub struct InProcessTransport {
    server: Arc<MockServer>,
}

impl InProcessTransport {
    /// Create transport over `server`
    #[inline]
    #[must_use]
    pub fn new(server: Arc<MockServer>) -> Self {
        Self { server }
    }

    /// Server behind this transport
    #[must_use]
    pub fn server(&self) -> &Arc<MockServer> {
        &self.server
    }
}

#[async_trait::async_trait]
impl Transport for InProcessTransport {
    async fn send(&self, request: MockRequest) -> Result<RawResponse, TransportError> {
        let response = self.server.handle(request).await;
        Ok(RawResponse::new(response.status, response.body.to_string()))
    }
}

/// HTTP transport to a running mock server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create transport for `base_url` (e.g. `http://127.0.0.1:4010`)
    ///
    /// # Errors
    /// `TransportError::InvalidUrl` if `base_url` is not an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidUrl(base_url));
        }
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: MockRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.url());
        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_process_forwards_to_server() {
        let transport = InProcessTransport::new(Arc::new(MockServer::default()));
        let raw = transport.send(MockRequest::get("/api/users")).await.unwrap();
        assert_eq!(raw.status, 200);
        assert!(raw.body.contains("Alice Johnson"));
    }

    #[test]
    fn http_transport_requires_scheme() {
        assert!(HttpTransport::new("localhost:4010").is_err());
        let transport = HttpTransport::new("http://localhost:4010/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:4010");
    }
}
