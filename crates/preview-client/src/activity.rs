//! Activity log shared by the client and the screen session

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Origin of a log item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// User interaction
    Ui,
    /// API traffic
    Api,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Ui => f.write_str("ui"),
            LogKind::Api => f.write_str("api"),
        }
    }
}

/// One log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogItem {
    /// Unique id
    pub id: Uuid,
    /// Origin
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Human-readable summary
    pub message: String,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
    /// Associated data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Newest-first activity log
///
/// Every push is also emitted as a `tracing` event.
#[derive(Debug, Default)]
pub struct ActivityLog {
    items: RwLock<Vec<LogItem>>,
}

impl ActivityLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry
    pub fn push(&self, kind: LogKind, message: impl Into<String>, payload: Option<Value>) {
        let item = LogItem {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            payload,
        };
        tracing::debug!(kind = %item.kind, message = %item.message, "activity");
        self.items.write().insert(0, item);
    }

    /// Record an API entry
    pub fn api(&self, message: impl Into<String>, payload: Option<Value>) {
        self.push(LogKind::Api, message, payload);
    }

    /// Record a UI entry
    pub fn ui(&self, message: impl Into<String>) {
        self.push(LogKind::Ui, message, None);
    }

    /// Entries, newest first
    #[must_use]
    pub fn items(&self) -> Vec<LogItem> {
        self.items.read().clone()
    }

    /// Messages only, newest first
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.items.read().iter().map(|i| i.message.clone()).collect()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.items.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newest_first() {
        let log = ActivityLog::new();
        log.ui("opened");
        log.api("GET /api/users request", None);
        assert_eq!(log.messages(), ["GET /api/users request", "opened"]);
        assert_eq!(log.items()[1].kind, LogKind::Ui);
    }

    #[test]
    fn item_serializes_with_type_key() {
        let log = ActivityLog::new();
        log.api("x", Some(json!({"a": 1})));
        let value = serde_json::to_value(&log.items()[0]).unwrap();
        assert_eq!(value["type"], "api");
        assert_eq!(value["payload"]["a"], 1);
    }

    #[test]
    fn clear_empties() {
        let log = ActivityLog::new();
        log.ui("a");
        log.clear();
        assert!(log.items().is_empty());
    }
}
