//! Channel capacity limits configuration.

use serde::Deserialize;

/// Channel capacity limits.
///
/// These bound per-channel state so a single channel cannot grow without
/// limit or back up its actor indefinitely.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum entries in a channel's ban list (default: 64).
    /// Applies to extended bans as well as hostmask bans.
    #[serde(default = "default_max_bans")]
    pub max_bans: usize,
    /// Maximum channel name length, including the leading `#` (default: 50).
    /// Also bounds ban redirect targets.
    #[serde(default = "default_max_channel_name_len")]
    pub max_channel_name_len: usize,
    /// Channel actor mailbox capacity (default: 500).
    /// Higher values provide burst tolerance during floods.
    #[serde(default = "default_channel_mailbox_capacity")]
    pub channel_mailbox_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_bans: default_max_bans(),
            max_channel_name_len: default_max_channel_name_len(),
            channel_mailbox_capacity: default_channel_mailbox_capacity(),
        }
    }
}

fn default_max_bans() -> usize {
    64
}

fn default_max_channel_name_len() -> usize {
    50
}

fn default_channel_mailbox_capacity() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let config = LimitsConfig::default();
        assert_eq!(config.max_bans, 64);
        assert_eq!(config.max_channel_name_len, 50);
        assert_eq!(config.channel_mailbox_capacity, 500);
    }

    #[test]
    fn deserialize_partial_config_uses_defaults() {
        let config: LimitsConfig = toml::from_str("max_bans = 10").unwrap();
        assert_eq!(config.max_bans, 10);
        assert_eq!(config.max_channel_name_len, 50);
        assert_eq!(config.channel_mailbox_capacity, 500);
    }
}
