//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - `types`: Core config struct definitions (Config, ServerConfig, RedirectConfig)
//! - `limits`: Channel capacity limits (LimitsConfig)
//! - `validation`: Startup validation of loaded values

mod limits;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use types::{Config, ConfigError, RedirectConfig, ServerConfig};
pub use validation::{ValidationError, validate};
