//! JSON spec parser

use crate::error::ParseError;
use crate::parsers::DocumentParser;
use serde_json::Value;

/// JSON document parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn parse(&self, path: &str, content: &str) -> Result<Value, ParseError> {
        serde_json::from_str(content).map_err(|e| ParseError::Json {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object() {
        let value = JsonParser.parse("a.json", r#"{"title": "Users"}"#).unwrap();
        assert_eq!(value["title"], "Users");
    }

    #[test]
    fn error_names_path() {
        let err = JsonParser.parse("broken.json", "{").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON in broken.json"));
    }
}
