//! Preview Client - bounded API access for previewed screens
//!
//! Wraps a [`Transport`] with the request policy a screen relies on:
//! - A fixed per-request ceiling (default 6000 ms)
//! - Optional caller cancellation via `CancellationToken`
//! - `{message}` extraction from error bodies
//! - A newest-first activity log of every request, response and failure
//!
//! # Example
//!
//! ```rust,ignore
//! use preview_client::prelude::*;
//! use std::sync::Arc;
//!
//! let server = Arc::new(MockServer::default());
//! let client = ApiClient::new(
//!     Arc::new(InProcessTransport::new(server)),
//!     ClientConfig::new(),
//! );
//! let users: serde_json::Value = client.get("/api/users").await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod activity;
pub mod client;
pub mod error;
pub mod transport;

// Re-exports for convenience
pub use activity::{ActivityLog, LogItem, LogKind};
pub use client::{ApiClient, ClientConfig};
pub use error::{AbortReason, ClientError, TransportError};
pub use transport::{HttpTransport, InProcessTransport, RawResponse, Transport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for issuing API calls
    pub use crate::{ApiClient, ClientConfig, ClientError, InProcessTransport, Transport};
    pub use preview_mock::{Method, MockServer};
}
