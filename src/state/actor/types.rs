use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};

use crate::error::{ChannelError, ModeError};
use crate::join::{JoinChain, JoinDecision};
use crate::modes::{ModeChange, Origin};
use crate::netmerge::ConflictInput;
use crate::security::BanRedirectEntry;
use crate::state::{ListEntry, Uid, UserContext};

/// Events that can be sent to a Channel Actor.
#[derive(Debug)]
pub enum ChannelEvent {
    /// Run a mode change through the registry pipeline.
    ApplyMode {
        source: Box<UserContext>,
        change: ModeChange,
        origin: Origin,
        reply_tx: oneshot::Sender<Result<ModeChange, ModeError>>,
    },
    /// Evaluate the ban list for a prospective joiner without joining.
    EvaluateJoin {
        user: Box<UserContext>,
        chain: JoinChain,
        reply_tx: oneshot::Sender<JoinDecision>,
    },
    /// Evaluate and, if allowed, add the user as a member.
    ///
    /// The reply is `Allow` once the user is a member, or the `Deny` /
    /// `Redirect` decision that kept them out.
    Join {
        user: Box<UserContext>,
        chain: JoinChain,
        reply_tx: oneshot::Sender<Result<JoinDecision, ChannelError>>,
    },
    /// User leaving the channel. Replies with the remaining member count.
    Part {
        uid: Uid,
        reply_tx: oneshot::Sender<Result<usize, ChannelError>>,
    },
    /// Resolve a netmerge disagreement on a parameter mode.
    ResolveConflict {
        input: ConflictInput,
        reply_tx: oneshot::Sender<Result<String, ModeError>>,
    },
    /// Rewrite redirecting bans into plain bans.
    StripRedirects {
        reply_tx: oneshot::Sender<Vec<ModeChange>>,
    },
    /// The channel is being destroyed. Replies with the purged redirect count.
    Destroy {
        reply_tx: Option<oneshot::Sender<usize>>,
    },
    GetInfo {
        reply_tx: oneshot::Sender<ChannelInfo>,
    },
    GetBans {
        reply_tx: oneshot::Sender<Vec<ListEntry>>,
    },
    GetRedirects {
        reply_tx: oneshot::Sender<Vec<BanRedirectEntry>>,
    },
}

/// Snapshot of a channel for queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
    pub created: i64,
    pub member_count: usize,
    /// Mode string with parameters, e.g. `+lnt 10`.
    pub modes: String,
}

/// Facts about a channel that other channels' actors may read.
///
/// Written only by the owning actor, after each change it processes.
#[derive(Debug, Clone, Default)]
pub struct ChannelSummary {
    /// Privilege level of each member.
    pub members: HashMap<Uid, u32>,
    /// Effective `+l`, or `None` if unset or the mode is not registered.
    pub limit: Option<usize>,
}

/// Sending half of a channel actor plus its published summary.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    pub(crate) tx: mpsc::Sender<ChannelEvent>,
    pub(crate) summary: Arc<RwLock<ChannelSummary>>,
}

impl ChannelHandle {
    /// Read the last published summary.
    pub fn summary(&self) -> ChannelSummary {
        self.summary.read().clone()
    }

    /// Whether two handles point at the same actor.
    pub fn same_actor(&self, other: &ChannelHandle) -> bool {
        Arc::ptr_eq(&self.summary, &other.summary)
    }
}
