//! Error types for spec validation
//!
//! Validation reports the first structural violation only, together with
//! the dotted path of the offending field.

use serde_json::Value;
use std::fmt;

/// One step in a document path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

/// Location of a field inside a spec document
///
/// Displays as `table.columns[1].dataIndex`; the document root displays as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Path of the document root
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Child path for an object key
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// Child path for an array index
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Kind of a document value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Any number
    Number,
    /// String
    String,
    /// Array
    Array,
    /// Object / mapping
    Object,
}

impl ValueKind {
    /// Classify a parsed value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Structural violation in a spec document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field absent
    #[error("{path}: required field is missing (expected {expected})")]
    MissingField {
        /// Field location
        path: FieldPath,
        /// Expected kind
        expected: ValueKind,
    },

    /// Field present with the wrong kind
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field location
        path: FieldPath,
        /// Expected kind
        expected: ValueKind,
        /// Actual kind
        found: ValueKind,
    },

    /// Discriminator with the wrong literal
    #[error("{path}: expected literal \"{expected}\", found \"{found}\"")]
    InvalidLiteral {
        /// Field location
        path: FieldPath,
        /// Required literal
        expected: &'static str,
        /// Actual string
        found: String,
    },

    /// String outside a closed set
    #[error("{path}: expected one of {allowed:?}, found \"{found}\"")]
    InvalidVariant {
        /// Field location
        path: FieldPath,
        /// Accepted values
        allowed: &'static [&'static str],
        /// Actual string
        found: String,
    },
}

impl ValidationError {
    /// Location of the violation
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::MissingField { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidLiteral { path, .. }
            | Self::InvalidVariant { path, .. } => path,
        }
    }
}

/// Role name outside `admin` / `user` / `guest`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: '{0}'")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_display() {
        let path = FieldPath::root().key("table").key("columns").index(1).key("dataIndex");
        assert_eq!(path.to_string(), "table.columns[1].dataIndex");
        assert_eq!(FieldPath::root().to_string(), "$");
    }

    #[test]
    fn type_mismatch_display() {
        let err = ValidationError::TypeMismatch {
            path: FieldPath::root().key("title"),
            expected: ValueKind::String,
            found: ValueKind::Number,
        };
        assert_eq!(err.to_string(), "title: expected string, found number");
    }

    #[test]
    fn invalid_variant_display() {
        let err = ValidationError::InvalidVariant {
            path: FieldPath::root().key("component"),
            allowed: &["input", "select"],
            found: "textarea".to_string(),
        };
        assert!(err.to_string().contains("expected one of [\"input\", \"select\"]"));
        assert_eq!(err.path().to_string(), "component");
    }
}
