//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::validation::{self, ValidationError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Mode core configuration.
///
/// Every section is optional; an empty document yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Channel capacity limits (ban list size, name length, mailbox depth).
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Ban redirection behaviour.
    #[serde(default)]
    pub redirect: RedirectConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate loaded values, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validation::validate(self)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, recorded as the setter of remotely-originated list entries.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "modecore.local".to_string()
}

/// Ban redirection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectConfig {
    /// Redirect into a full target channel anyway (default: false).
    ///
    /// When disabled, a redirecting ban whose target is at its `+l` limit
    /// turns into a plain ban.
    #[serde(default)]
    pub limit_redirect_interop: bool,
}
