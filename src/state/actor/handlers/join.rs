//! JOIN event handling.
//!
//! Evaluates the ban list, then the limit, then adds the member.

use super::{ActorState, ChannelActor};
use crate::error::ChannelError;
use crate::join::{JoinChain, JoinDecision, JoinEnv, evaluate_join};
use crate::state::{MemberModes, UserContext};
use tokio::sync::oneshot;
use tracing::debug;

impl ChannelActor {
    /// Ban evaluation for `user` against this channel.
    pub(crate) fn evaluate(&self, user: &UserContext, chain: &JoinChain) -> JoinDecision {
        let lookup = self.lookup();
        let env = JoinEnv {
            lookup: lookup.as_ref(),
            exceptions: self.shared.collab.exceptions.as_ref(),
            limit_redirect_interop: self.shared.config.redirect.limit_redirect_interop,
        };
        evaluate_join(&self.channel, user, chain, &env)
    }

    pub(crate) fn handle_join(
        &mut self,
        user: UserContext,
        chain: JoinChain,
        reply_tx: oneshot::Sender<Result<JoinDecision, ChannelError>>,
    ) {
        // Draining actors are about to leave the directory; the caller retries
        // against a fresh one.
        if self.state == ActorState::Draining {
            let _ = reply_tx.send(Err(ChannelError::ChannelTombstone));
            return;
        }

        if self.channel.is_member(&user.uid) {
            let _ = reply_tx.send(Ok(JoinDecision::Allow));
            return;
        }

        let decision = self.evaluate(&user, &chain);
        if decision != JoinDecision::Allow {
            debug!(channel = %self.channel.name, uid = %user.uid, ?decision, "Join refused by ban");
            let _ = reply_tx.send(Ok(decision));
            return;
        }

        if let Some(limit) = self.effective_limit()
            && self.channel.members.len() >= limit
        {
            let _ = reply_tx.send(Err(ChannelError::ChannelIsFull));
            return;
        }

        let modes = if self.channel.members.is_empty() {
            MemberModes::opped()
        } else {
            MemberModes::default()
        };
        self.channel.members.insert(user.uid.clone(), modes);
        self.publish_summary();

        debug!(
            channel = %self.channel.name,
            uid = %user.uid,
            following = chain.is_following(),
            members = self.channel.members.len(),
            "User joined"
        );
        let _ = reply_tx.send(Ok(JoinDecision::Allow));
    }
}
