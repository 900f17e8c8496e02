//! Actor Model for Channel State Management.
//!
//! Each channel is managed by a `ChannelActor` running in its own Tokio task.
//!
//! # Architecture
//!
//! - **State Ownership**: The actor owns the [`Channel`] (modes, bans,
//!   members, ban redirects). Nothing else holds a reference to it.
//! - **Message Passing**: All interactions happen via [`ChannelEvent`]
//!   messages; results travel back over `oneshot` channels.
//! - **Serialization**: Events are processed one at a time, so a mode commit
//!   and a join evaluation on the same channel never interleave.
//! - **Cross-channel reads**: Questions about other channels go through the
//!   [`ChannelDirectory`] summaries. An actor never waits on another actor.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::collab::{ChannelLookup, Collaborators, NoChannels};
use crate::config::Config;
use crate::modes::ModeRegistry;
use crate::state::managers::ChannelDirectory;
use crate::state::Channel;

mod handlers;
mod types;

pub use types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorState {
    Active,
    Draining,
}

/// What every channel actor shares with the manager that spawned it.
#[derive(Clone)]
pub(crate) struct ActorShared {
    pub registry: Arc<RwLock<ModeRegistry>>,
    pub directory: Weak<ChannelDirectory>,
    pub collab: Collaborators,
    pub config: Arc<Config>,
}

/// The Channel Actor.
///
/// Owns the state of a single channel and processes events sequentially.
pub struct ChannelActor {
    channel: Channel,
    summary: Arc<RwLock<ChannelSummary>>,
    shared: ActorShared,
    state: ActorState,
}

impl ChannelActor {
    /// Create a new Channel Actor and spawn it.
    ///
    /// New channels start with `+nt`.
    pub(crate) fn spawn(name: String, created: i64, shared: ActorShared) -> ChannelHandle {
        let capacity = shared.config.limits.channel_mailbox_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);

        let mut channel = Channel::new(name, created, shared.config.limits.max_bans);
        channel.set_flag('n', true);
        channel.set_flag('t', true);

        let summary = Arc::new(RwLock::new(ChannelSummary::default()));
        let actor = Self {
            channel,
            summary: summary.clone(),
            shared,
            state: ActorState::Active,
        };

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        ChannelHandle { tx, summary }
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<ChannelEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!(channel = %self.channel.name, "Channel actor stopped");
    }

    fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::ApplyMode {
                source,
                change,
                origin,
                reply_tx,
            } => self.handle_apply_mode(*source, change, origin, reply_tx),
            ChannelEvent::EvaluateJoin {
                user,
                chain,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.evaluate(&user, &chain));
            }
            ChannelEvent::Join {
                user,
                chain,
                reply_tx,
            } => self.handle_join(*user, chain, reply_tx),
            ChannelEvent::Part { uid, reply_tx } => self.handle_part(uid, reply_tx),
            ChannelEvent::ResolveConflict { input, reply_tx } => {
                self.handle_resolve_conflict(input, reply_tx)
            }
            ChannelEvent::StripRedirects { reply_tx } => self.handle_strip_redirects(reply_tx),
            ChannelEvent::Destroy { reply_tx } => {
                let purged = self.destroy();
                if let Some(tx) = reply_tx {
                    let _ = tx.send(purged);
                }
            }
            ChannelEvent::GetInfo { reply_tx } => self.handle_get_info(reply_tx),
            ChannelEvent::GetBans { reply_tx } => {
                let _ = reply_tx.send(self.channel.bans.clone());
            }
            ChannelEvent::GetRedirects { reply_tx } => {
                let _ = reply_tx.send(self.channel.ban_redirects().to_vec());
            }
        }
    }

    /// Lookup over other channels, or one that knows none if the directory
    /// has been dropped.
    fn lookup(&self) -> Arc<dyn ChannelLookup> {
        match self.shared.directory.upgrade() {
            Some(directory) => directory as Arc<dyn ChannelLookup>,
            None => Arc::new(NoChannels),
        }
    }

    /// `+l` as seen by joins: absent when the handler is unregistered.
    fn effective_limit(&self) -> Option<usize> {
        if self.shared.registry.read().is_registered('l') {
            self.channel.limit()
        } else {
            None
        }
    }

    /// Publish member privileges and the effective limit for other actors.
    fn publish_summary(&self) {
        let limit = self.effective_limit();
        let mut summary = self.summary.write();
        summary.members = self
            .channel
            .members
            .iter()
            .map(|(uid, modes)| (uid.clone(), modes.privilege_level()))
            .collect();
        summary.limit = limit;
    }

    /// Remove the channel from the directory and purge its redirect store.
    /// Returns how many redirect entries were purged.
    fn destroy(&mut self) -> usize {
        if self.state == ActorState::Draining {
            return 0;
        }
        self.state = ActorState::Draining;

        let purged = self.channel.purge_ban_redirects();
        if let Some(directory) = self.shared.directory.upgrade() {
            directory.remove_actor(&self.channel.name, &self.summary);
        }
        *self.summary.write() = ChannelSummary::default();

        info!(channel = %self.channel.name, purged, "Channel destroyed");
        purged
    }

    fn cleanup_if_empty(&mut self) {
        if self.channel.members.is_empty() {
            self.destroy();
        }
    }
}
