//! Preview Mock - scenario-controlled backend simulation
//!
//! Serves the user-management resources a previewed screen talks to, with
//! every operation's outcome selectable at runtime:
//! - Per-operation scenario modes (success, error codes, delay, timeout)
//! - A switchable active role checked inside the success path
//! - In-memory user and audit stores, seeded on start
//! - An in-process router and a `warp` HTTP surface with control endpoints
//!
//! # Architecture
//!
//! ```text
//! MockRequest ──► MockServer::handle ──► UserHandlers / NavTree
//!                                             │
//!                      ScenarioStore ──► MockEngine::resolve(mode, success)
//!                                             │
//!                                        MockResponse
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use preview_mock::prelude::*;
//!
//! let server = MockServer::new(&MockConfig::new());
//! server.scenarios().set_mode(OperationKey::GET_USERS, MockMode::ServerError);
//!
//! let response = server.handle(MockRequest::get("/api/users")).await;
//! assert_eq!(response.status, 500);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod http;
pub mod scenario;
pub mod server;
pub mod store;
pub mod tree;
pub mod types;

// Re-exports for convenience
pub use config::{ListShape, MockConfig};
pub use engine::MockEngine;
pub use error::{AuthorizationError, RequestError, ServeError};
pub use handlers::{authorize_create, authorize_delete, NewUser, UserHandlers};
pub use http::{bind, routes, serve, RoleBody, SHUTDOWN_DRAIN};
pub use scenario::{MockMode, OperationKey, ScenarioState, ScenarioStore};
pub use server::MockServer;
pub use store::{Record, RecordStore};
pub use tree::NavTree;
pub use types::{
    status, AuditAction, AuditEntry, ErrorBody, Method, MockRequest, MockResponse, TreeNode, User,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the mock backend
    pub use crate::{
        Method, MockConfig, MockMode, MockRequest, MockResponse, MockServer, OperationKey,
        ScenarioState, ScenarioStore, User,
    };
    pub use preview_spec::Role;
}
