//! Error types for the mock backend
//!
//! Handler-level failures are first-class responses: every variant maps to a
//! status code and a displayable `message`.

use crate::types::{status, MockResponse};

/// Role check failed inside a handler's success path
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    /// Guests may not create users
    #[error("Guests cannot create users")]
    GuestCannotCreate,

    /// Only admins may delete users
    #[error("Only admins can delete")]
    AdminOnlyDelete,
}

/// Request could not be served as addressed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Body is not valid JSON
    #[error("Invalid JSON body")]
    InvalidJson,

    /// Body names an unknown role
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// No route for method and path
    #[error("Not Found")]
    NotFound,
}

impl RequestError {
    /// Status code for this failure
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidJson | Self::InvalidRole(_) => status::BAD_REQUEST,
            Self::NotFound => status::NOT_FOUND,
        }
    }
}

impl From<AuthorizationError> for MockResponse {
    fn from(value: AuthorizationError) -> Self {
        MockResponse::error(status::FORBIDDEN, value.to_string())
    }
}

impl From<RequestError> for MockResponse {
    fn from(value: RequestError) -> Self {
        MockResponse::error(value.status(), value.to_string())
    }
}

/// HTTP surface failures
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Listener could not be bound
    #[error("failed to bind mock server: {0}")]
    Bind(#[from] warp::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_error_becomes_403() {
        let response: MockResponse = AuthorizationError::AdminOnlyDelete.into();
        assert_eq!(response.status, 403);
        assert_eq!(response.message(), Some("Only admins can delete"));
    }

    #[test]
    fn request_error_status() {
        assert_eq!(RequestError::InvalidRole("root".to_string()).status(), 400);
        assert_eq!(RequestError::NotFound.status(), 404);
        assert_eq!(
            RequestError::InvalidRole("root".to_string()).to_string(),
            "Invalid role: root"
        );
    }
}
