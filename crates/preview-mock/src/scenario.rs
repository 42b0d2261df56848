//! Scenario state: which simulated outcome each operation produces
//!
//! The store is owned by one mock server instance and handed to handlers as
//! an `Arc`. It is a control surface for a single interactive session: every
//! read and write takes a short lock, and there is no ordering guarantee
//! between concurrent writers beyond last-writer-wins.

use parking_lot::RwLock;
use preview_spec::Role;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Simulated response mode for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum MockMode {
    /// Produce the real handler outcome
    #[default]
    Success,
    /// Immediate 400
    BadRequest,
    /// Immediate 403
    Forbidden,
    /// Immediate 500
    ServerError,
    /// Fixed delay, then the real outcome
    Delay,
    /// Never respond
    Timeout,
}

impl MockMode {
    /// All modes in declaration order
    pub const ALL: [MockMode; 6] = [
        MockMode::Success,
        MockMode::BadRequest,
        MockMode::Forbidden,
        MockMode::ServerError,
        MockMode::Delay,
        MockMode::Timeout,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MockMode::Success => "success",
            MockMode::BadRequest => "badRequest",
            MockMode::Forbidden => "forbidden",
            MockMode::ServerError => "serverError",
            MockMode::Delay => "delay",
            MockMode::Timeout => "timeout",
        }
    }

    /// Human-readable label for control panels
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MockMode::Success => "Success",
            MockMode::BadRequest => "400 Bad Request",
            MockMode::Forbidden => "403 Forbidden",
            MockMode::ServerError => "500 Server Error",
            MockMode::Delay => "Delay",
            MockMode::Timeout => "Timeout",
        }
    }

    /// Parse a wire name; anything unrecognized reads as `Success`
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .unwrap_or_default()
    }
}

impl From<String> for MockMode {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl fmt::Display for MockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a simulated operation (`GET_USERS`, `POST_USER`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationKey(Cow<'static, str>);

impl OperationKey {
    /// `GET /api/users`
    pub const GET_USERS: OperationKey = OperationKey(Cow::Borrowed("GET_USERS"));
    /// `POST /api/users`
    pub const POST_USER: OperationKey = OperationKey(Cow::Borrowed("POST_USER"));
    /// `DELETE /api/users/:id`
    pub const DELETE_USER: OperationKey = OperationKey(Cow::Borrowed("DELETE_USER"));
    /// `GET /api/audits`
    pub const GET_AUDITS: OperationKey = OperationKey(Cow::Borrowed("GET_AUDITS"));

    /// Operations known to the built-in handlers
    pub const BUILTIN: [OperationKey; 4] = [
        Self::GET_USERS,
        Self::POST_USER,
        Self::DELETE_USER,
        Self::GET_AUDITS,
    ];

    /// Custom operation key
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Key name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from operation key to mode
///
/// Keys absent from the mapping read as [`MockMode::Success`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioState(BTreeMap<OperationKey, MockMode>);

impl ScenarioState {
    /// Mapping with every built-in operation set to `success`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode configured for `key`
    #[must_use]
    pub fn mode(&self, key: &OperationKey) -> MockMode {
        self.0.get(key).copied().unwrap_or_default()
    }

    /// Copy with one key replaced
    #[must_use]
    pub fn with_mode(mut self, key: OperationKey, mode: MockMode) -> Self {
        self.0.insert(key, mode);
        self
    }

    /// Configured entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&OperationKey, MockMode)> {
        self.0.iter().map(|(key, mode)| (key, *mode))
    }
}

impl Default for ScenarioState {
    fn default() -> Self {
        Self(
            OperationKey::BUILTIN
                .into_iter()
                .map(|key| (key, MockMode::Success))
                .collect(),
        )
    }
}

impl FromIterator<(OperationKey, MockMode)> for ScenarioState {
    fn from_iter<I: IntoIterator<Item = (OperationKey, MockMode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Owned scenario and role state for one simulated server
#[derive(Debug)]
pub struct ScenarioStore {
    scenarios: RwLock<Arc<ScenarioState>>,
    role: RwLock<Role>,
    initial_role: Role,
}

impl ScenarioStore {
    /// Create store with all-success scenarios and the given starting role
    #[must_use]
    pub fn new(initial_role: Role) -> Self {
        Self {
            scenarios: RwLock::new(Arc::new(ScenarioState::default())),
            role: RwLock::new(initial_role),
            initial_role,
        }
    }

    /// Current mapping as an immutable snapshot
    #[must_use]
    pub fn scenario_state(&self) -> Arc<ScenarioState> {
        Arc::clone(&self.scenarios.read())
    }

    /// Replace the whole mapping (no merge)
    pub fn set_scenario_state(&self, next: ScenarioState) {
        tracing::debug!(?next, "scenario state replaced");
        *self.scenarios.write() = Arc::new(next);
    }

    /// Replace the mapping with a copy that differs in one key
    pub fn set_mode(&self, key: OperationKey, mode: MockMode) {
        let mut guard = self.scenarios.write();
        let next = (**guard).clone().with_mode(key, mode);
        *guard = Arc::new(next);
    }

    /// Mode currently configured for `key`
    #[must_use]
    pub fn mode(&self, key: &OperationKey) -> MockMode {
        self.scenarios.read().mode(key)
    }

    /// Active role
    #[must_use]
    pub fn role(&self) -> Role {
        *self.role.read()
    }

    /// Replace the active role
    pub fn set_role(&self, next: Role) {
        tracing::debug!(role = %next, "mock role changed");
        *self.role.write() = next;
    }

    /// Restore all-success scenarios and the starting role
    pub fn reset(&self) {
        self.set_scenario_state(ScenarioState::default());
        self.set_role(self.initial_role);
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new(Role::Admin)
    }
}
