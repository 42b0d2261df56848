//! Mock server configuration

use preview_spec::Role;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body shape of a successful user listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListShape {
    /// `{ "users": [...] }`
    #[default]
    Users,
    /// `{ "items": [...] }`
    Items,
}

impl ListShape {
    /// Top-level key holding the records
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            ListShape::Users => "users",
            ListShape::Items => "items",
        }
    }
}

/// Mock server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Interval applied by the `delay` mode, in milliseconds
    pub delay_ms: u64,
    /// User listing body shape
    pub list_shape: ListShape,
    /// Role active when the server starts and after a reset
    pub initial_role: Role,
}

impl MockConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With delay interval
    #[inline]
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With listing body shape
    #[inline]
    #[must_use]
    pub fn with_list_shape(mut self, shape: ListShape) -> Self {
        self.list_shape = shape;
        self
    }

    /// With starting role
    #[inline]
    #[must_use]
    pub fn with_initial_role(mut self, role: Role) -> Self {
        self.initial_role = role;
        self
    }

    /// Delay interval as a duration
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1800,
            list_shape: ListShape::Users,
            initial_role: Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MockConfig::new();
        assert_eq!(config.delay(), Duration::from_millis(1800));
        assert_eq!(config.list_shape.key(), "users");
        assert_eq!(config.initial_role, Role::Admin);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: MockConfig = serde_json::from_str(r#"{"list_shape": "items"}"#).unwrap();
        assert_eq!(config.list_shape, ListShape::Items);
        assert_eq!(config.delay_ms, 1800);
    }
}
