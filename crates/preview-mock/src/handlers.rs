//! Role-gated request handlers
//!
//! Every handler follows the same state machine:
//!
//! ```text
//! Received → read mode + role → MockEngine::resolve(mode, success)
//!                                        │
//!            error / delay / timeout ────┘  success path:
//!                                             authorize(role) → mutate → respond
//! ```
//!
//! Simulated error modes therefore take precedence over the role check: a
//! guest creating a user under `serverError` sees a 500, not a 403.

use crate::config::ListShape;
use crate::engine::MockEngine;
use crate::error::{AuthorizationError, RequestError};
use crate::scenario::{OperationKey, ScenarioStore};
use crate::store::RecordStore;
use crate::types::{status, AuditAction, AuditEntry, MockResponse, User};
use preview_spec::Role;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Name given to created users without one
pub const DEFAULT_NAME: &str = "Unnamed";
/// Email given to created users without one
pub const DEFAULT_EMAIL: &str = "unknown@example.com";
/// Role given to created users without one
pub const DEFAULT_ROLE: Role = Role::User;

/// Guests may not create users
///
/// # Errors
/// `AuthorizationError::GuestCannotCreate` for `Role::Guest`.
pub fn authorize_create(role: Role) -> Result<(), AuthorizationError> {
    match role {
        Role::Guest => Err(AuthorizationError::GuestCannotCreate),
        Role::Admin | Role::User => Ok(()),
    }
}

/// Only admins may delete users
///
/// # Errors
/// `AuthorizationError::AdminOnlyDelete` for any non-admin role.
pub fn authorize_delete(role: Role) -> Result<(), AuthorizationError> {
    match role {
        Role::Admin => Ok(()),
        Role::User | Role::Guest => Err(AuthorizationError::AdminOnlyDelete),
    }
}

/// Create-user request body after defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role
    pub role: Role,
}

impl NewUser {
    /// Parse a raw request body
    ///
    /// Missing, empty or non-string fields fall back to their defaults; an
    /// absent or blank body reads as `{}`.
    ///
    /// # Errors
    /// - `RequestError::InvalidJson` if the body is not JSON
    /// - `RequestError::InvalidRole` if `role` names no known role
    pub fn from_body(body: Option<&str>) -> Result<Self, RequestError> {
        let value = match body.map(str::trim) {
            None | Some("") => Value::Object(Map::new()),
            Some(raw) => serde_json::from_str(raw).map_err(|_| RequestError::InvalidJson)?,
        };

        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };

        let role = match text("role") {
            None => DEFAULT_ROLE,
            Some(raw) => raw
                .parse()
                .map_err(|_| RequestError::InvalidRole(raw.to_string()))?,
        };

        Ok(Self {
            name: text("name").unwrap_or(DEFAULT_NAME).to_string(),
            email: text("email").unwrap_or(DEFAULT_EMAIL).to_string(),
            role,
        })
    }

    /// Materialize with a freshly generated id
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: next_user_id(),
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}

/// Time-ordered user id (`u-<unix millis>`)
///
/// Two creations within the same millisecond produce the same id.
#[must_use]
pub fn next_user_id() -> String {
    format!("u-{}", chrono::Utc::now().timestamp_millis())
}

/// Handlers for the `users` and `audits` resources
#[derive(Debug)]
pub struct UserHandlers {
    users: RecordStore<User>,
    audits: RecordStore<AuditEntry>,
    scenarios: Arc<ScenarioStore>,
    engine: MockEngine,
    list_shape: ListShape,
}

impl UserHandlers {
    /// Create handlers over the seed users
    #[must_use]
    pub fn new(scenarios: Arc<ScenarioStore>, engine: MockEngine, list_shape: ListShape) -> Self {
        Self::with_users(scenarios, engine, list_shape, User::seed())
    }

    /// Create handlers over an explicit starting set of users
    #[must_use]
    pub fn with_users(
        scenarios: Arc<ScenarioStore>,
        engine: MockEngine,
        list_shape: ListShape,
        users: Vec<User>,
    ) -> Self {
        Self {
            users: RecordStore::with_records(users),
            audits: RecordStore::new(),
            scenarios,
            engine,
            list_shape,
        }
    }

    /// Current users, most recent first
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users.snapshot()
    }

    /// Current audit trail, most recent first
    #[must_use]
    pub fn audits(&self) -> Vec<AuditEntry> {
        self.audits.snapshot()
    }

    /// `GET /api/users`
    pub async fn list(&self) -> MockResponse {
        let mode = self.scenarios.mode(&OperationKey::GET_USERS);
        self.engine
            .resolve(mode, move || async move {
                let mut body = Map::new();
                body.insert(self.list_shape.key().to_string(), json!(self.users.snapshot()));
                MockResponse::ok(&body)
            })
            .await
    }

    /// `POST /api/users`
    pub async fn create(&self, body: Option<&str>) -> MockResponse {
        let mode = self.scenarios.mode(&OperationKey::POST_USER);
        let role = self.scenarios.role();
        self.engine
            .resolve(mode, move || async move {
                if let Err(denied) = authorize_create(role) {
                    tracing::info!(%role, "create denied");
                    return denied.into();
                }
                let user = match NewUser::from_body(body) {
                    Ok(draft) => draft.into_user(),
                    Err(e) => return e.into(),
                };
                self.users.prepend(user.clone());
                self.record(AuditAction::Create, &user.id, role);
                tracing::info!(id = %user.id, "user created");
                MockResponse::json(status::CREATED, &user)
            })
            .await
    }

    /// `DELETE /api/users/:id`
    ///
    /// Deleting an id that does not exist still succeeds.
    pub async fn delete(&self, id: &str) -> MockResponse {
        let mode = self.scenarios.mode(&OperationKey::DELETE_USER);
        let role = self.scenarios.role();
        self.engine
            .resolve(mode, move || async move {
                if let Err(denied) = authorize_delete(role) {
                    tracing::info!(%role, id, "delete denied");
                    return denied.into();
                }
                let removed = self.users.remove(id);
                self.record(AuditAction::Delete, id, role);
                tracing::info!(id, removed, "user deleted");
                MockResponse::ok(&json!({ "ok": true }))
            })
            .await
    }

    /// `GET /api/audits`
    pub async fn list_audits(&self) -> MockResponse {
        let mode = self.scenarios.mode(&OperationKey::GET_AUDITS);
        self.engine
            .resolve(mode, move || async move {
                MockResponse::ok(&json!({ "items": self.audits.snapshot() }))
            })
            .await
    }

    fn record(&self, action: AuditAction, target_id: &str, role: Role) {
        self.audits.prepend(AuditEntry {
            id: format!("a-{}", uuid::Uuid::new_v4()),
            action,
            target_id: target_id.to_string(),
            role,
            timestamp: chrono::Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::MockMode;
    use pretty_assertions::assert_eq;

    fn setup(role: Role) -> (Arc<ScenarioStore>, UserHandlers) {
        let scenarios = Arc::new(ScenarioStore::new(role));
        let handlers =
            UserHandlers::new(Arc::clone(&scenarios), MockEngine::default(), ListShape::Users);
        (scenarios, handlers)
    }

    #[test]
    fn new_user_defaults() {
        let draft = NewUser::from_body(Some("{}")).unwrap();
        assert_eq!(
            draft,
            NewUser {
                name: DEFAULT_NAME.to_string(),
                email: DEFAULT_EMAIL.to_string(),
                role: Role::User,
            }
        );
        assert_eq!(NewUser::from_body(None).unwrap(), draft);
        assert_eq!(
            NewUser::from_body(Some(r#"{"name": "", "email": null}"#)).unwrap(),
            draft
        );
    }

    #[test]
    fn new_user_rejects_bad_input() {
        assert_eq!(NewUser::from_body(Some("{oops")), Err(RequestError::InvalidJson));
        assert_eq!(
            NewUser::from_body(Some(r#"{"role": "root"}"#)),
            Err(RequestError::InvalidRole("root".to_string()))
        );
    }

    #[test]
    fn policy_table() {
        assert!(authorize_create(Role::Admin).is_ok());
        assert!(authorize_create(Role::User).is_ok());
        assert!(authorize_create(Role::Guest).is_err());
        assert!(authorize_delete(Role::Admin).is_ok());
        assert!(authorize_delete(Role::User).is_err());
        assert!(authorize_delete(Role::Guest).is_err());
    }

    #[tokio::test]
    async fn list_uses_configured_shape() {
        let scenarios = Arc::new(ScenarioStore::default());
        let handlers = UserHandlers::new(scenarios, MockEngine::default(), ListShape::Items);
        let response = handlers.list().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body["items"].as_array().unwrap().len(), 2);
        assert!(response.body.get("users").is_none());
    }

    #[tokio::test]
    async fn create_records_audit_entry() {
        let (_, handlers) = setup(Role::User);
        let response = handlers.create(Some(r#"{"name": "Carol"}"#)).await;
        assert_eq!(response.status, 201);

        let audits = handlers.audits();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].action, AuditAction::Create);
        assert_eq!(audits[0].role, Role::User);
        assert_eq!(audits[0].target_id, response.body["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn denied_delete_leaves_store_and_audit_untouched() {
        let (_, handlers) = setup(Role::Guest);
        let response = handlers.delete("u-1").await;
        assert_eq!(response.status, 403);
        assert_eq!(handlers.users().len(), 2);
        assert!(handlers.audits().is_empty());
    }

    #[tokio::test]
    async fn error_mode_wins_over_authorization() {
        let (scenarios, handlers) = setup(Role::Guest);
        scenarios.set_mode(OperationKey::POST_USER, MockMode::ServerError);
        let response = handlers.create(Some("{}")).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.message(), Some("Server Error (500)"));
    }

    #[tokio::test]
    async fn invalid_body_is_checked_after_authorization() {
        let (_, handlers) = setup(Role::Guest);
        let response = handlers.create(Some("{oops")).await;
        assert_eq!(response.status, 403);

        let (_, handlers) = setup(Role::Admin);
        let response = handlers.create(Some("{oops")).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.message(), Some("Invalid JSON body"));
    }

    #[tokio::test]
    async fn audits_follow_their_own_scenario_key() {
        let (scenarios, handlers) = setup(Role::Admin);
        scenarios.set_mode(OperationKey::GET_AUDITS, MockMode::Forbidden);
        assert_eq!(handlers.list_audits().await.status, 403);
        assert_eq!(handlers.list().await.status, 200);
    }
}
