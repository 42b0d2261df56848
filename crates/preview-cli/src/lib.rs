//! Preview CLI - command-line front end for the UI preview workspace
//!
//! Subcommands:
//! - `serve`: run the mock backend over HTTP with control endpoints
//! - `validate`: load and validate a spec document
//! - `tree`: print the navigation tree
//! - `request`: issue one API call, optionally under scenario overrides
//! - `preview`: render a screen's table as a given role

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{parse_mode_override, RequestArgs};
pub use config::{ConfigError, PreviewConfig};
pub use logging::LogFormat;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
