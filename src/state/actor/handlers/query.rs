use super::ChannelActor;
use crate::state::actor::ChannelInfo;
use tokio::sync::oneshot;

impl ChannelActor {
    pub(crate) fn handle_get_info(&self, reply_tx: oneshot::Sender<ChannelInfo>) {
        let modes = self.channel.mode_string(&self.shared.registry.read());
        let _ = reply_tx.send(ChannelInfo {
            name: self.channel.name.clone(),
            created: self.channel.created,
            member_count: self.channel.members.len(),
            modes,
        });
    }
}
