//! Wire types for the simulated backend
//!
//! Defines:
//! - HTTP-shaped requests and responses exchanged with the mock server
//! - Records held by the in-memory stores
//! - Navigation tree nodes

use chrono::{DateTime, Utc};
use preview_spec::Role;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Status codes produced by the mock backend
pub mod status {
    /// 200
    pub const OK: u16 = 200;
    /// 201
    pub const CREATED: u16 = 201;
    /// 400
    pub const BAD_REQUEST: u16 = 400;
    /// 403
    pub const FORBIDDEN: u16 = 403;
    /// 404
    pub const NOT_FOUND: u16 = 404;
    /// 405
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// 500
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("unsupported method: {other}")),
        }
    }
}

/// HTTP-shaped request routed by the mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// Method
    pub method: Method,
    /// Path without query string
    pub path: String,
    /// Query parameters (no percent-decoding)
    pub query: BTreeMap<String, String>,
    /// Raw body text
    pub body: Option<String>,
}

impl MockRequest {
    /// Create request, splitting any `?query` off `url`
    #[must_use]
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (url, BTreeMap::new()),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            body: None,
        }
    }

    /// GET request
    #[inline]
    #[must_use]
    pub fn get(url: &str) -> Self {
        Self::new(Method::Get, url)
    }

    /// POST request with a JSON body
    #[must_use]
    pub fn post(url: &str, body: &Value) -> Self {
        Self::new(Method::Post, url).with_body(body.to_string())
    }

    /// DELETE request
    #[inline]
    #[must_use]
    pub fn delete(url: &str) -> Self {
        Self::new(Method::Delete, url)
    }

    /// With raw body text
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Merge parameters from a raw query string
    #[must_use]
    pub fn with_query_string(mut self, raw: &str) -> Self {
        self.query.extend(parse_query(raw));
        self
    }

    /// Path plus query string, as a client would address it
    #[must_use]
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

fn parse_query(raw: &str) -> BTreeMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// HTTP-shaped response produced by the mock server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockResponse {
    /// Status code
    pub status: u16,
    /// JSON body
    pub body: Value,
}

impl MockResponse {
    /// Response with a serializable body
    ///
    /// A body that fails to serialize becomes a 500.
    #[must_use]
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(status::INTERNAL_SERVER_ERROR, format!("serialization failed: {e}")),
        }
    }

    /// 200 with body
    #[inline]
    #[must_use]
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::json(status::OK, body)
    }

    /// Error response with the uniform `{ message }` body
    #[must_use]
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::new(message).into(),
        }
    }

    /// Whether status is 2xx
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `message` field of the body, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Uniform error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Display message
    pub message: String,
}

impl ErrorBody {
    /// Create body with `message`
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Read the body out of a response payload; `None` unless `message` is a string
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        payload
            .get("message")
            .and_then(Value::as_str)
            .map(Self::new)
    }
}

impl From<ErrorBody> for Value {
    fn from(body: ErrorBody) -> Self {
        json!({ "message": body.message })
    }
}

/// Simulated user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier (`u-<millis>` for created users)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role
    pub role: Role,
}

impl User {
    /// Create user
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Users present when a server starts
    #[must_use]
    pub fn seed() -> Vec<User> {
        vec![
            User::new("u-1", "Alice Johnson", "alice@example.com", Role::Admin),
            User::new("u-2", "Bob Smith", "bob@example.com", Role::User),
        ]
    }
}

/// Kind of audited mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A record was created
    Create,
    /// A record was deleted
    Delete,
}

/// Audit trail entry for a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Identifier
    pub id: String,
    /// Mutation kind
    pub action: AuditAction,
    /// Affected record id
    pub target_id: String,
    /// Role that performed the mutation
    pub role: Role,
    /// When it happened
    pub timestamp: DateTime<Utc>,
}

/// Navigation tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Node identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Whether the node has no children
    pub is_leaf: bool,
    /// Spec document opened by a leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_spec_path: Option<String>,
}

impl TreeNode {
    /// Branch node
    #[must_use]
    pub fn branch(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_leaf: false,
            screen_spec_path: None,
        }
    }

    /// Leaf node opening a screen spec
    #[must_use]
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, spec_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_leaf: true,
            screen_spec_path: Some(spec_path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_splits_query() {
        let request = MockRequest::get("/api/tree?parentId=users-root");
        assert_eq!(request.path, "/api/tree");
        assert_eq!(request.query.get("parentId").map(String::as_str), Some("users-root"));
        assert_eq!(request.url(), "/api/tree?parentId=users-root");
    }

    #[test]
    fn error_response_shape() {
        let response = MockResponse::error(status::FORBIDDEN, "Forbidden (403)");
        assert_eq!(response.body, json!({"message": "Forbidden (403)"}));
        assert_eq!(response.message(), Some("Forbidden (403)"));
        assert!(!response.is_success());
        assert_eq!(
            ErrorBody::from_payload(&response.body),
            Some(ErrorBody::new("Forbidden (403)"))
        );
        assert_eq!(ErrorBody::from_payload(&json!({"message": 3})), None);
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
        assert!("PATCH".parse::<Method>().is_err());
    }

    #[test]
    fn tree_node_omits_missing_spec_path() {
        let value = serde_json::to_value(TreeNode::branch("users-root", "User Management")).unwrap();
        assert_eq!(value, json!({"id": "users-root", "title": "User Management", "isLeaf": false}));
    }
}
