//! Preview Spec
//!
//! Declarative description of a CRUD data screen and the structural
//! validator that admits untrusted spec documents.
//!
//! # Architecture
//!
//! ```text
//! JSON / YAML text → serde_json::Value → SpecValidator → ScreenSpec
//!                                             ↓
//!                                      ValidationError (first violation)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use preview_spec::validate_screen_spec;
//!
//! let doc: serde_json::Value = serde_json::from_str(raw)?;
//! let spec = validate_screen_spec(&doc)?;
//! println!("{} has {} columns", spec.title, spec.table.columns.len());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod types;
pub mod validator;

pub use error::{FieldPath, PathSegment, UnknownRole, ValidationError, ValueKind};
pub use types::{
    role_allowed, Action, ActionType, ApiEndpoints, Column, CreateForm, FieldComponent,
    FormField, Role, ScreenSpec, ScreenType, SearchSpec, TableSpec, WireEnum,
};
pub use validator::{validate_screen_spec, SpecValidator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with screen specs
    pub use crate::error::ValidationError;
    pub use crate::types::{Action, ActionType, Role, ScreenSpec};
    pub use crate::validator::{validate_screen_spec, SpecValidator};
}
