//! Spec loading pipeline
//!
//! ```text
//! path ──► SpecSource::fetch ──► SpecFormat::from_path(path).parse ──► SpecValidator
//!              │                          │                                 │
//!         FetchError                 ParseError                    ValidationError
//! ```
//!
//! One fetch per call, no retries. Any failure means there is nothing to
//! render.

use crate::error::SpecLoadError;
use crate::parsers::SpecFormat;
use crate::source::SpecSource;
use preview_spec::{ScreenSpec, SpecValidator};

/// Loads validated screen specs from a [`SpecSource`]
#[derive(Debug, Clone)]
pub struct SpecLoader<S> {
    source: S,
    validator: SpecValidator,
}

impl<S: SpecSource> SpecLoader<S> {
    /// Create loader over `source`
    #[inline]
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            validator: SpecValidator::new(),
        }
    }

    /// Underlying source
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, parse and validate the spec at `path`
    ///
    /// # Errors
    /// - `SpecLoadError::Fetch` if the document cannot be retrieved
    /// - `SpecLoadError::Parse` if it is not well-formed for its suffix
    /// - `SpecLoadError::Validation` if it is not a valid screen spec
    pub async fn load(&self, path: &str) -> Result<ScreenSpec, SpecLoadError> {
        let raw = self.source.fetch(path).await?;
        let format = SpecFormat::from_path(path);
        let document = format.parse(path, &raw)?;
        let spec = self.validator.validate(&document)?;
        tracing::info!(path, id = %spec.id, ?format, "spec loaded");
        Ok(spec)
    }
}
