//! YAML spec parser
//!
//! Deserializes straight into `serde_json::Value` so both formats meet the
//! validator in the same shape.

use crate::error::ParseError;
use crate::parsers::DocumentParser;
use serde_json::Value;

/// YAML document parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, path: &str, content: &str) -> Result<Value, ParseError> {
        serde_yaml::from_str(content).map_err(|e| ParseError::Yaml {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
