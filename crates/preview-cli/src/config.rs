//! Preview configuration
//!
//! Loaded from an optional TOML file; command-line flags override what the
//! file sets.
//!
//! ```toml
//! addr = "127.0.0.1:4010"
//! public_dir = "public"
//!
//! [mock]
//! delay_ms = 1800
//! list_shape = "users"
//! initial_role = "admin"
//!
//! [client]
//! timeout_ms = 6000
//! ```

use preview_client::ClientConfig;
use preview_mock::MockConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration TOML
    #[error("invalid config in {path}: {source}")]
    Toml {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Listen address for `serve`
    pub addr: SocketAddr,
    /// Static asset root; spec documents live under `<public_dir>/spec`
    pub public_dir: PathBuf,
    /// Mock backend settings
    pub mock: MockConfig,
    /// API client settings
    pub client: ClientConfig,
}

impl PreviewConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; absent keys keep their defaults
    ///
    /// # Errors
    /// `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `toml::de::Error` if the text is not valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `path` when given, defaults otherwise
    ///
    /// # Errors
    /// See [`PreviewConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// With static asset root
    #[inline]
    #[must_use]
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// With mock settings
    #[inline]
    #[must_use]
    pub fn with_mock(mut self, mock: MockConfig) -> Self {
        self.mock = mock;
        self
    }

    /// With client settings
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Directory served under `/spec`
    #[must_use]
    pub fn spec_dir(&self) -> PathBuf {
        self.public_dir.join("spec")
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 4010)),
            public_dir: PathBuf::from("public"),
            mock: MockConfig::default(),
            client: ClientConfig::default(),
        }
    }
}
