//! Interfaces to the parts of the server the core does not own.
//!
//! The embedding server supplies numeric delivery and ban exceptions. Channel
//! lookups are answered by the core's own
//! [`ChannelDirectory`](crate::state::ChannelDirectory), but handlers and
//! watchers only see the [`ChannelLookup`] trait so they can be tested
//! against a fixed table.

use std::sync::Arc;

use tracing::debug;

use crate::error::Numeric;
use crate::state::UserContext;

/// Member count and `+l` limit of a channel, as last published by its actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub members: usize,
    pub limit: Option<usize>,
}

impl Occupancy {
    /// Whether one more member would exceed the limit.
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.members >= limit)
    }
}

/// Read-only view of other channels.
pub trait ChannelLookup: Send + Sync {
    /// Whether a channel with this name currently exists.
    fn channel_exists(&self, name: &str) -> bool;

    /// Privilege level of `uid` on `channel`; 0 if not a member or no channel.
    fn privilege_level(&self, uid: &str, channel: &str) -> u32;

    /// Member count and limit of `channel`, or `None` if it does not exist.
    fn occupancy(&self, channel: &str) -> Option<Occupancy>;
}

/// A lookup that knows no channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChannels;

impl ChannelLookup for NoChannels {
    fn channel_exists(&self, _name: &str) -> bool {
        false
    }

    fn privilege_level(&self, _uid: &str, _channel: &str) -> u32 {
        0
    }

    fn occupancy(&self, _channel: &str) -> Option<Occupancy> {
        None
    }
}

/// Delivers numeric replies to local users.
pub trait NumericSink: Send + Sync {
    fn send_numeric(&self, uid: &str, numeric: Numeric, params: Vec<String>);
}

/// Sink that only logs. Used when the embedding server supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NumericSink for LogSink {
    fn send_numeric(&self, uid: &str, numeric: Numeric, params: Vec<String>) {
        debug!(uid = %uid, numeric = numeric.code(), params = ?params, "Numeric reply");
    }
}

/// Ban exception policy (`+e` and friends live outside the core).
pub trait BanExceptionCheck: Send + Sync {
    /// Whether `user` is exempt from the ban `ban` on `channel`.
    fn is_excepted(&self, user: &UserContext, channel: &str, ban: &str) -> bool;
}

/// No exceptions: every matching ban applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExceptions;

impl BanExceptionCheck for NoExceptions {
    fn is_excepted(&self, _user: &UserContext, _channel: &str, _ban: &str) -> bool {
        false
    }
}

impl<F> BanExceptionCheck for F
where
    F: Fn(&UserContext, &str, &str) -> bool + Send + Sync,
{
    fn is_excepted(&self, user: &UserContext, channel: &str, ban: &str) -> bool {
        self(user, channel, ban)
    }
}

/// Collaborators handed to the [`ChannelManager`](crate::state::ChannelManager).
#[derive(Clone)]
pub struct Collaborators {
    pub numerics: Arc<dyn NumericSink>,
    pub exceptions: Arc<dyn BanExceptionCheck>,
}

impl Collaborators {
    pub fn new(numerics: Arc<dyn NumericSink>) -> Self {
        Self {
            numerics,
            exceptions: Arc::new(NoExceptions),
        }
    }

    pub fn with_exceptions(mut self, exceptions: Arc<dyn BanExceptionCheck>) -> Self {
        self.exceptions = exceptions;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

/// Current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
