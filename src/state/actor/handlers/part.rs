//! PART event handling.

use super::ChannelActor;
use crate::error::ChannelError;
use crate::state::Uid;
use tokio::sync::oneshot;
use tracing::debug;

impl ChannelActor {
    pub(crate) fn handle_part(
        &mut self,
        uid: Uid,
        reply_tx: oneshot::Sender<Result<usize, ChannelError>>,
    ) {
        if self.channel.members.remove(&uid).is_none() {
            let _ = reply_tx.send(Err(ChannelError::NotOnChannel));
            return;
        }

        let remaining = self.channel.members.len();
        debug!(channel = %self.channel.name, uid = %uid, remaining, "User parted");

        self.publish_summary();
        self.cleanup_if_empty();
        let _ = reply_tx.send(Ok(remaining));
    }
}
