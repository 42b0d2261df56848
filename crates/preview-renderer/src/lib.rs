//! Preview Renderer - spec-driven data screens
//!
//! Loads a screen spec from its source and turns it into a working screen:
//! - Suffix-based JSON / YAML parsing
//! - Structural validation before anything is shown
//! - Role-aware create / delete gating and labels
//! - Search filtering, form checks and table cell text
//!
//! # Architecture
//!
//! ```text
//! SpecSource ──► SpecLoader ──► ScreenSpec ──► ScreenModel ──► ScreenSession
//!  (fs / http)   (parse+validate)                               (ApiClient)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use preview_renderer::prelude::*;
//!
//! let loader = SpecLoader::new(FsSource::new("public"));
//! let spec = loader.load("/spec/user-list.screen.json").await?;
//! let mut session = ScreenSession::open(ScreenModel::new(spec), client, Role::Admin);
//! session.refresh().await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod loader;
pub mod parsers;
pub mod screen;
pub mod source;

// Re-exports for convenience
pub use error::{FetchError, FormError, ParseError, SessionError, SpecLoadError};
pub use loader::SpecLoader;
pub use parsers::{DocumentParser, JsonParser, SpecFormat, YamlParser};
pub use screen::{ScreenModel, ScreenSession, DEFAULT_CREATE_LABEL, DEFAULT_DELETE_LABEL};
pub use source::{FsSource, HttpSource, SpecSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for loading and driving screens
    pub use crate::{
        FsSource, HttpSource, ScreenModel, ScreenSession, SpecLoadError, SpecLoader, SpecSource,
    };
    pub use preview_spec::{Role, ScreenSpec};
}
