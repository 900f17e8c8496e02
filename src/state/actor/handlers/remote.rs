//! Server-originated events: netmerge conflicts and redirect stripping.

use super::{ActorState, ChannelActor};
use crate::error::ModeError;
use crate::modes::ModeChange;
use crate::netmerge::{ConflictInput, resolve_conflict};
use tokio::sync::oneshot;
use tracing::info;

impl ChannelActor {
    pub(crate) fn handle_resolve_conflict(
        &mut self,
        input: ConflictInput,
        reply_tx: oneshot::Sender<Result<String, ModeError>>,
    ) {
        if self.state == ActorState::Draining {
            let _ = reply_tx.send(Err(ModeError::ChannelGone));
            return;
        }

        let result = {
            let registry = self.shared.registry.read();
            resolve_conflict(
                &registry,
                &mut self.channel,
                &input,
                &self.shared.config.server.name,
            )
        };

        if result.is_ok() {
            self.publish_summary();
        }
        let _ = reply_tx.send(result);
    }

    /// Rewrite `mask#target` bans as plain bans, for links that do not
    /// understand ban redirects.
    pub(crate) fn handle_strip_redirects(&mut self, reply_tx: oneshot::Sender<Vec<ModeChange>>) {
        let changes = self.channel.strip_ban_redirects();
        if !changes.is_empty() {
            info!(channel = %self.channel.name, changes = changes.len(), "Stripped ban redirects");
        }
        let _ = reply_tx.send(changes);
    }
}
