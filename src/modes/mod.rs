//! Channel mode framework.
//!
//! - [`ModeHandler`]: one mode letter's validation, commit and netmerge policy
//! - [`ModeRegistry`]: letter → handler map plus the ordered watcher chain
//! - [`ModeWatcher`]: interceptors that may rewrite or veto a change
//!
//! A change moves `Requested → Validated → Watched → Committed`, or stops at
//! `Denied` on the first failure. The channel is only written at commit.

mod ban;
mod flag;
mod key;
mod limit;
mod registry;
mod watcher;

use std::fmt;

pub use ban::BanMode;
pub use flag::FlagMode;
pub use key::{KeyMode, MAX_KEY_LEN};
pub use limit::{LIMIT_WRAP, LimitMode, parse_limit};
pub use registry::ModeRegistry;
pub use watcher::{ModeWatcher, WatchContext, WatcherChain};

use crate::collab::ChannelLookup;
use crate::error::ModeError;
use crate::state::Channel;

/// How a mode stores its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// On or off, no parameter.
    Flag,
    /// Single parameter value (`+k`, `+l`).
    Param,
    /// List of masks (`+b`).
    List,
}

/// When a mode consumes a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamArity {
    None,
    /// Only when setting (`+l 10`, but bare `-l`).
    OnSet,
    /// On both set and unset (`+b mask`, `-b mask`).
    Always,
}

impl ParamArity {
    pub fn takes_param(self, adding: bool) -> bool {
        match self {
            Self::None => false,
            Self::OnSet => adding,
            Self::Always => true,
        }
    }
}

/// Where a mode change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A user on this server. Subject to authority checks.
    Local,
    /// A linked server. Trusted; denials are only logged.
    Remote,
}

impl Origin {
    pub fn is_local(self) -> bool {
        self == Self::Local
    }
}

/// A single mode change, as requested or as committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub letter: char,
    pub adding: bool,
    pub param: Option<String>,
}

impl ModeChange {
    pub fn plus(letter: char, param: Option<&str>) -> Self {
        Self {
            letter,
            adding: true,
            param: param.map(str::to_string),
        }
    }

    pub fn minus(letter: char, param: Option<&str>) -> Self {
        Self {
            letter,
            adding: false,
            param: param.map(str::to_string),
        }
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.adding { '+' } else { '-' };
        match &self.param {
            Some(param) => write!(f, "{}{} {}", sign, self.letter, param),
            None => write!(f, "{}{}", sign, self.letter),
        }
    }
}

/// Which side wins a netmerge conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictWinner {
    Theirs,
    Ours,
}

/// Environment a mode change is evaluated in.
pub struct ModeEnv<'a> {
    /// Other channels, for cross-channel checks.
    pub lookup: &'a dyn ChannelLookup,
    /// Longest acceptable channel name.
    pub max_channel_len: usize,
    /// Recorded as the setter of remotely-originated list entries.
    pub server_name: &'a str,
}

/// Behaviour of one mode letter.
pub trait ModeHandler: Send + Sync {
    fn letter(&self) -> char;

    fn kind(&self) -> ModeKind;

    fn arity(&self) -> ParamArity;

    /// Whether every server resolves a conflict on this mode the same way.
    fn symmetric(&self) -> bool {
        true
    }

    /// Check a change against the channel and return the parameter to commit.
    ///
    /// Must not modify anything; watchers still get a chance to veto.
    fn validate(
        &self,
        channel: &Channel,
        adding: bool,
        param: Option<&str>,
    ) -> Result<Option<String>, ModeError>;

    /// Bring a parameter into the form it is stored in.
    ///
    /// Netmerge winners pass through this before they are committed, since
    /// they never go through [`validate`](Self::validate).
    fn normalize_param(&self, param: &str) -> Result<String, ModeError> {
        if param.is_empty() {
            return Err(ModeError::NeedMoreParams(self.letter()));
        }
        Ok(param.to_string())
    }

    /// Write a validated change. Returns false if nothing changed.
    fn commit(&self, channel: &mut Channel, change: &ModeChange, setter: &str) -> bool;

    /// Pick the surviving value when two servers disagree.
    ///
    /// The change with the earlier timestamp wins. At equal timestamps the
    /// lexically greater parameter wins so both sides agree.
    fn resolve_conflict(
        &self,
        their_ts: i64,
        our_ts: i64,
        theirs: &str,
        ours: &str,
    ) -> ConflictWinner {
        match their_ts.cmp(&our_ts) {
            std::cmp::Ordering::Less => ConflictWinner::Theirs,
            std::cmp::Ordering::Greater => ConflictWinner::Ours,
            std::cmp::Ordering::Equal if theirs > ours => ConflictWinner::Theirs,
            std::cmp::Ordering::Equal => ConflictWinner::Ours,
        }
    }
}
