//! MODE event handling for channels.
//!
//! Runs one change through the shared registry and publishes the new
//! summary when it commits.

use super::{ActorState, ChannelActor};
use crate::error::ModeError;
use crate::modes::{ModeChange, ModeEnv, Origin};
use crate::state::UserContext;
use tokio::sync::oneshot;

impl ChannelActor {
    pub(crate) fn handle_apply_mode(
        &mut self,
        source: UserContext,
        change: ModeChange,
        origin: Origin,
        reply_tx: oneshot::Sender<Result<ModeChange, ModeError>>,
    ) {
        if self.state == ActorState::Draining {
            let _ = reply_tx.send(Err(ModeError::ChannelGone));
            return;
        }

        let lookup = self.lookup();
        let result = {
            let registry = self.shared.registry.read();
            let env = ModeEnv {
                lookup: lookup.as_ref(),
                max_channel_len: self.shared.config.limits.max_channel_name_len,
                server_name: &self.shared.config.server.name,
            };
            registry.apply(&mut self.channel, &source, change, origin, &env)
        };

        if result.is_ok() {
            self.publish_summary();
        }
        let _ = reply_tx.send(result);
    }
}
