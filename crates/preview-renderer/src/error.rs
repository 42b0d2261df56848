//! Error types for spec loading and screen sessions
//!
//! Provides error handling for:
//! - Fetch operations (source → text)
//! - Parse operations (text → document)
//! - Form checks and session actions

use preview_client::ClientError;
use preview_spec::ValidationError;
use std::path::PathBuf;

/// Spec document could not be retrieved
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Path escapes the source root
    #[error("path escapes the spec root: {0}")]
    Traversal(String),

    /// HTTP request failed
    #[error("http error fetching {url}: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("fetching {url} returned status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Status code
        status: u16,
    },
}

impl FetchError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Spec text is not well-formed in its format
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// JSON syntax error
    #[error("invalid JSON in {path}: {message}")]
    Json {
        /// Source path
        path: String,
        /// Parser message
        message: String,
    },

    /// YAML syntax error
    #[error("invalid YAML in {path}: {message}")]
    Yaml {
        /// Source path
        path: String,
        /// Parser message
        message: String,
    },
}

/// Loading a screen spec failed; nothing may be rendered
#[derive(Debug, thiserror::Error)]
pub enum SpecLoadError {
    /// Document could not be retrieved
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Document is not well-formed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Document is well-formed but not a screen spec
    #[error("invalid screen spec: {0}")]
    Validation(#[from] ValidationError),
}

/// Create-form values are incomplete
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field is absent or blank
    #[error("{label} is required")]
    MissingField {
        /// Field name
        name: String,
        /// Field label
        label: String,
    },
}

/// Screen action could not be carried out
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Active role may not perform the action
    #[error("{action} is not permitted for role {role}")]
    NotPermitted {
        /// Action label
        action: String,
        /// Active role
        role: preview_spec::Role,
    },

    /// Form values rejected before sending
    #[error(transparent)]
    Form(#[from] FormError),

    /// API call failed
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use preview_spec::Role;

    #[test]
    fn error_messages() {
        let err = FormError::MissingField {
            name: "email".to_string(),
            label: "Email".to_string(),
        };
        assert_eq!(err.to_string(), "Email is required");

        let err = SessionError::NotPermitted {
            action: "Delete".to_string(),
            role: Role::Guest,
        };
        assert_eq!(err.to_string(), "Delete is not permitted for role guest");

        let err = FetchError::Traversal("../secret".to_string());
        assert_eq!(err.to_string(), "path escapes the spec root: ../secret");
    }
}
