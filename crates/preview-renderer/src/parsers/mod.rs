//! Spec document parsers
//!
//! Turns spec text into a `serde_json::Value` for the validator:
//! - JSON via serde_json
//! - YAML via serde_yaml
//!
//! The format is chosen from the path suffix alone; content is never
//! sniffed.

use crate::error::ParseError;
use serde_json::Value;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for converting document text into a JSON value
pub trait DocumentParser: Send + Sync + 'static {
    /// Parse `content`; `path` is only used in error messages
    ///
    /// # Errors
    /// `ParseError` if the text is not well-formed.
    fn parse(&self, path: &str, content: &str) -> Result<Value, ParseError>;

    /// Supported suffixes (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser is selected for `path`
    fn can_parse(&self, path: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| path.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
    }
}

/// Document format of a spec path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecFormat {
    /// JSON (the fallback)
    Json,
    /// YAML (`.yaml` / `.yml`)
    Yaml,
}

impl SpecFormat {
    /// Format for `path`: YAML suffixes select YAML, anything else JSON
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if YamlParser.can_parse(path) {
            SpecFormat::Yaml
        } else {
            SpecFormat::Json
        }
    }

    /// Parser for this format
    #[must_use]
    pub fn parser(self) -> &'static dyn DocumentParser {
        match self {
            SpecFormat::Json => &JsonParser,
            SpecFormat::Yaml => &YamlParser,
        }
    }

    /// Parse `content` as this format
    ///
    /// # Errors
    /// `ParseError` if the text is not well-formed.
    pub fn parse(self, path: &str, content: &str) -> Result<Value, ParseError> {
        self.parser().parse(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_dispatch() {
        assert_eq!(SpecFormat::from_path("/spec/a.yaml"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path("/spec/a.yml"), SpecFormat::Yaml);
        assert_eq!(SpecFormat::from_path("/spec/a.json"), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path("/spec/a.txt"), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path("/spec/yaml"), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path("/spec/a.yaml.bak"), SpecFormat::Json);
    }

    #[test]
    fn yaml_suffix_with_json_content_still_parses_as_yaml() {
        // YAML is a superset of JSON
        let value = SpecFormat::from_path("x.yaml")
            .parse("x.yaml", r#"{"id": "a"}"#)
            .unwrap();
        assert_eq!(value["id"], "a");
    }

    #[test]
    fn json_suffix_rejects_yaml_content() {
        let err = SpecFormat::from_path("x.json").parse("x.json", "id: a").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }
}
