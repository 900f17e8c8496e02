//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.max_bans must be at least 1")]
    ZeroBanLimit,
    #[error("limits.max_channel_name_len must be at least 2, got {0}")]
    ChannelNameTooShort(usize),
    #[error("limits.channel_mailbox_capacity must be at least 1")]
    ZeroMailbox,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    if limits.max_bans == 0 {
        errors.push(ValidationError::ZeroBanLimit);
    }
    // "#" plus at least one character.
    if limits.max_channel_name_len < 2 {
        errors.push(ValidationError::ChannelNameTooShort(
            limits.max_channel_name_len,
        ));
    }
    if limits.channel_mailbox_capacity == 0 {
        errors.push(ValidationError::ZeroMailbox);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
