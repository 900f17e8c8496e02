//! Unified error handling for the mode core.
//!
//! Every user-visible denial maps to one IRC numeric. The core never formats
//! wire lines itself; [`ModeError::reply_params`] and
//! [`ChannelError::reply_params`] produce the parameter list that the
//! embedding server hands to its [`NumericSink`](crate::collab::NumericSink).

use thiserror::Error;

// ============================================================================
// Numerics
// ============================================================================

/// IRC numerics emitted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Numeric {
    ERR_NOSUCHCHANNEL,
    ERR_NOTONCHANNEL,
    ERR_NEEDMOREPARAMS,
    ERR_KEYSET,
    ERR_LINKCHANNEL,
    ERR_CHANNELISFULL,
    ERR_UNKNOWNMODE,
    ERR_BANNEDFROMCHAN,
    ERR_BANLISTFULL,
    ERR_BADCHANNAME,
    ERR_CHANOPRIVSNEEDED,
    ERR_INVALIDKEY,
    ERR_BANREDIRECT,
    ERR_INVALIDMODEPARAM,
}

impl Numeric {
    /// The three-digit numeric code.
    pub const fn code(self) -> u16 {
        match self {
            Self::ERR_NOSUCHCHANNEL => 403,
            Self::ERR_NOTONCHANNEL => 442,
            Self::ERR_NEEDMOREPARAMS => 461,
            Self::ERR_KEYSET => 467,
            Self::ERR_LINKCHANNEL => 470,
            Self::ERR_CHANNELISFULL => 471,
            Self::ERR_UNKNOWNMODE => 472,
            Self::ERR_BANNEDFROMCHAN => 474,
            Self::ERR_BANLISTFULL => 478,
            Self::ERR_BADCHANNAME => 479,
            Self::ERR_CHANOPRIVSNEEDED => 482,
            Self::ERR_INVALIDKEY => 525,
            Self::ERR_BANREDIRECT => 690,
            Self::ERR_INVALIDMODEPARAM => 696,
        }
    }
}

// ============================================================================
// Mode Errors (registry pipeline)
// ============================================================================

/// Reasons a mode change was not committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("unknown mode character: {0}")]
    UnknownMode(char),

    #[error("mode {0} needs a parameter")]
    NeedMoreParams(char),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("you're not channel operator")]
    ChanOpPrivsNeeded,

    /// The change would leave the channel exactly as it is. Dropped silently.
    #[error("mode {0} unchanged")]
    Unchanged(char),

    #[error("invalid channel limit: {0}")]
    InvalidLimit(String),

    #[error("key is not well-formed")]
    InvalidKey,

    #[error("channel key already set")]
    KeySet,

    #[error("ban list is full (maximum {max} entries)")]
    BanListFull { max: usize },

    #[error("invalid channel name in redirection ({0})")]
    InvalidRedirect(String),

    #[error("redirect target {0} does not exist")]
    RedirectTargetMissing(String),

    #[error("not opped on redirect target {0}")]
    RedirectNeedsOp(String),

    #[error("ban redirection points at its own channel")]
    SelfRedirect,

    #[error("mode {0} has no netmerge conflict policy")]
    NoConflictPolicy(char),

    #[error("channel is shutting down")]
    ChannelGone,
}

impl ModeError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMode(_) => "unknown_mode",
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::ChanOpPrivsNeeded => "chanop_privs_needed",
            Self::Unchanged(_) => "unchanged",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::InvalidKey => "invalid_key",
            Self::KeySet => "key_set",
            Self::BanListFull { .. } => "ban_list_full",
            Self::InvalidRedirect(_) => "invalid_redirect",
            Self::RedirectTargetMissing(_) => "redirect_target_missing",
            Self::RedirectNeedsOp(_) => "redirect_needs_op",
            Self::SelfRedirect => "self_redirect",
            Self::NoConflictPolicy(_) => "no_conflict_policy",
            Self::ChannelGone => "channel_gone",
        }
    }

    /// The numeric a local user receives for this denial.
    ///
    /// Returns `None` for silent drops and server-side failures.
    pub fn numeric(&self) -> Option<Numeric> {
        match self {
            Self::UnknownMode(_) => Some(Numeric::ERR_UNKNOWNMODE),
            Self::NeedMoreParams(_) => Some(Numeric::ERR_NEEDMOREPARAMS),
            Self::NoSuchChannel(_) | Self::InvalidRedirect(_) => Some(Numeric::ERR_NOSUCHCHANNEL),
            Self::ChanOpPrivsNeeded => Some(Numeric::ERR_CHANOPRIVSNEEDED),
            Self::InvalidLimit(_) => Some(Numeric::ERR_INVALIDMODEPARAM),
            Self::InvalidKey => Some(Numeric::ERR_INVALIDKEY),
            Self::KeySet => Some(Numeric::ERR_KEYSET),
            Self::BanListFull { .. } => Some(Numeric::ERR_BANLISTFULL),
            Self::RedirectTargetMissing(_) | Self::RedirectNeedsOp(_) | Self::SelfRedirect => {
                Some(Numeric::ERR_BANREDIRECT)
            }
            Self::Unchanged(_) | Self::NoConflictPolicy(_) | Self::ChannelGone => None,
        }
    }

    /// Parameters for the numeric reply, starting with the recipient's nick.
    pub fn reply_params(&self, nick: &str, channel: &str) -> Vec<String> {
        let params: Vec<String> = match self {
            Self::UnknownMode(c) => vec![c.to_string(), "is unknown mode char to me".into()],
            Self::NeedMoreParams(_) => vec!["MODE".into(), "Not enough parameters".into()],
            Self::NoSuchChannel(name) => vec![name.clone(), "No such channel".into()],
            Self::ChanOpPrivsNeeded => {
                vec![channel.into(), "You're not channel operator".into()]
            }
            Self::InvalidLimit(value) => vec![
                channel.into(),
                "l".into(),
                value.clone(),
                "Invalid limit mode parameter".into(),
            ],
            Self::InvalidKey => vec![channel.into(), "Key is not well-formed".into()],
            Self::KeySet => vec![channel.into(), "Channel key already set".into()],
            Self::BanListFull { max } => vec![
                channel.into(),
                format!(
                    "Channel ban list for {channel} is full (maximum entries for this channel is {max})"
                ),
            ],
            Self::InvalidRedirect(target) => vec![
                channel.into(),
                format!("Invalid channel name in redirection ({target})"),
            ],
            Self::RedirectTargetMissing(target) => {
                vec![format!("Target channel {target} must exist to be set as a redirect.")]
            }
            Self::RedirectNeedsOp(target) => {
                vec![format!("You must be opped on {target} to set it as a redirect.")]
            }
            Self::SelfRedirect => vec![
                channel.into(),
                "You cannot set a ban redirection to the channel the ban is on".into(),
            ],
            Self::Unchanged(_) | Self::NoConflictPolicy(_) | Self::ChannelGone => {
                vec![channel.into(), self.to_string()]
            }
        };

        std::iter::once(nick.to_string()).chain(params).collect()
    }
}

// ============================================================================
// Channel Errors (membership operations)
// ============================================================================

/// Channel membership errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no such channel")]
    NoSuchChannel,

    #[error("illegal channel name")]
    InvalidChannelName,

    #[error("not on channel")]
    NotOnChannel,

    #[error("cannot join channel (+b)")]
    BannedFromChan,

    #[error("cannot join channel (+l)")]
    ChannelIsFull,

    #[error("channel is restarting")]
    ChannelTombstone,
}

impl ChannelError {
    /// The numeric a local user receives for this error, if any.
    pub fn numeric(&self) -> Option<Numeric> {
        match self {
            Self::NoSuchChannel => Some(Numeric::ERR_NOSUCHCHANNEL),
            Self::InvalidChannelName => Some(Numeric::ERR_BADCHANNAME),
            Self::NotOnChannel => Some(Numeric::ERR_NOTONCHANNEL),
            Self::BannedFromChan => Some(Numeric::ERR_BANNEDFROMCHAN),
            Self::ChannelIsFull => Some(Numeric::ERR_CHANNELISFULL),
            Self::ChannelTombstone => None,
        }
    }

    /// Parameters for the numeric reply, starting with the recipient's nick.
    pub fn reply_params(&self, nick: &str, channel: &str) -> Vec<String> {
        let text = match self {
            Self::NoSuchChannel => "No such channel",
            Self::InvalidChannelName => "Illegal channel name",
            Self::NotOnChannel => "You're not on that channel",
            Self::BannedFromChan => "Cannot join channel (You are banned)",
            Self::ChannelIsFull => "Cannot join channel (+l)",
            Self::ChannelTombstone => "Channel is restarting",
        };
        vec![nick.to_string(), channel.to_string(), text.to_string()]
    }
}

// ============================================================================
// Registry Errors (extension registration)
// ============================================================================

/// Errors raised while registering handlers or watchers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("mode {0} is already registered")]
    AlreadyRegistered(char),

    #[error("watcher {0} is already attached")]
    WatcherExists(&'static str),
}
