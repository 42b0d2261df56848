//! Error types for the API client

use std::fmt;
use std::time::Duration;

/// Why a request was abandoned before a response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The client's fixed ceiling elapsed
    Ceiling(Duration),
    /// The caller's cancellation token fired
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Ceiling(limit) => write!(f, "no response within {}ms", limit.as_millis()),
            AbortReason::Cancelled => f.write_str("cancelled by caller"),
        }
    }
}

/// Transport-level failure (the request never produced a status)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP transport failed
    #[error("http transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL could not be joined with the request path
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Errors surfaced by [`crate::ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response before the ceiling or cancellation
    #[error("request aborted: {0}")]
    Aborted(AbortReason),

    /// Response with a non-2xx status
    #[error("{message}")]
    Status {
        /// Status code
        status: u16,
        /// Server-provided `message`, or a generic one
        message: String,
    },

    /// Transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Create status error
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Status code carried by this error, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request was abandoned
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_server_message() {
        let err = ClientError::status(403, "Only admins can delete");
        assert_eq!(err.to_string(), "Only admins can delete");
        assert_eq!(err.status_code(), Some(403));
        assert!(!err.is_aborted());
    }

    #[test]
    fn abort_display() {
        let err = ClientError::Aborted(AbortReason::Ceiling(Duration::from_millis(6000)));
        assert_eq!(err.to_string(), "request aborted: no response within 6000ms");
        assert!(err.is_aborted());
        assert_eq!(
            ClientError::Aborted(AbortReason::Cancelled).to_string(),
            "request aborted: cancelled by caller"
        );
    }
}
