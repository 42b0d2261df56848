//! In-process request router
//!
//! [`MockServer`] owns every piece of simulated backend state and turns a
//! [`MockRequest`] into a [`MockResponse`]. The HTTP surface and the
//! in-process client transport both go through [`MockServer::handle`].

use crate::config::MockConfig;
use crate::engine::MockEngine;
use crate::error::RequestError;
use crate::handlers::UserHandlers;
use crate::scenario::ScenarioStore;
use crate::tree::NavTree;
use crate::types::{Method, MockRequest, MockResponse};
use std::sync::Arc;

/// Simulated backend
#[derive(Debug)]
pub struct MockServer {
    scenarios: Arc<ScenarioStore>,
    users: UserHandlers,
    tree: NavTree,
}

impl MockServer {
    /// Create server from configuration, with seed users
    #[must_use]
    pub fn new(config: &MockConfig) -> Self {
        let scenarios = Arc::new(ScenarioStore::new(config.initial_role));
        let users = UserHandlers::new(
            Arc::clone(&scenarios),
            MockEngine::new(config.delay()),
            config.list_shape,
        );
        Self {
            scenarios,
            users,
            tree: NavTree::new(),
        }
    }

    /// Create server over pre-built parts
    #[must_use]
    pub fn from_parts(scenarios: Arc<ScenarioStore>, users: UserHandlers, tree: NavTree) -> Self {
        Self {
            scenarios,
            users,
            tree,
        }
    }

    /// Scenario and role state
    #[must_use]
    pub fn scenarios(&self) -> &Arc<ScenarioStore> {
        &self.scenarios
    }

    /// User resource handlers
    #[must_use]
    pub fn users(&self) -> &UserHandlers {
        &self.users
    }

    /// Navigation tree
    #[must_use]
    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    /// Route one request
    ///
    /// May never complete when the addressed operation is in `timeout`
    /// mode.
    pub async fn handle(&self, request: MockRequest) -> MockResponse {
        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        tracing::debug!(method = %request.method, path = %request.path, "mock request");

        let response = match (request.method, segments.as_slice()) {
            (Method::Get, ["api", "tree"]) => {
                let parent = request.query.get("parentId").map(String::as_str);
                MockResponse::ok(&self.tree.children(parent))
            }
            (Method::Get, ["api", "users"]) => self.users.list().await,
            (Method::Post, ["api", "users"]) => self.users.create(request.body.as_deref()).await,
            (Method::Delete, ["api", "users", id]) => self.users.delete(id).await,
            (Method::Get, ["api", "audits"]) => self.users.list_audits().await,
            _ => RequestError::NotFound.into(),
        };

        tracing::info!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "mock response"
        );
        response
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new(&MockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{MockMode, OperationKey};
    use preview_spec::Role;
    use serde_json::json;

    #[tokio::test]
    async fn tree_route_reads_parent_from_query() {
        let server = MockServer::default();
        let root = server.handle(MockRequest::get("/api/tree")).await;
        assert_eq!(root.status, 200);
        assert_eq!(root.body[0]["id"], "users-root");

        let children = server
            .handle(MockRequest::get("/api/tree?parentId=users-root"))
            .await;
        assert_eq!(children.body[0]["screenSpecPath"], "/spec/user-list.screen.json");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = MockServer::default();
        for request in [
            MockRequest::get("/api/nothing"),
            MockRequest::delete("/api/users"),
            MockRequest::new(Method::Put, "/api/users/u-1"),
        ] {
            let response = server.handle(request).await;
            assert_eq!(response.status, 404);
            assert_eq!(response.message(), Some("Not Found"));
        }
    }

    #[tokio::test]
    async fn delete_route_passes_id() {
        let server = MockServer::default();
        let response = server.handle(MockRequest::delete("/api/users/u-2")).await;
        assert_eq!(response.body, json!({ "ok": true }));
        assert!(server.users().users().iter().all(|u| u.id != "u-2"));
    }

    #[tokio::test]
    async fn tree_is_not_scenario_controlled() {
        let server = MockServer::default();
        server
            .scenarios()
            .set_mode(OperationKey::GET_USERS, MockMode::ServerError);
        server.scenarios().set_role(Role::Guest);
        assert_eq!(server.handle(MockRequest::get("/api/tree")).await.status, 200);
    }
}
