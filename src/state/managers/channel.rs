//! Channel management.
//!
//! `ChannelManager` is what a host server calls into. It owns the channel
//! directory and the shared mode registry, routes each request to the
//! owning channel actor, and turns denials into numeric replies for local
//! users.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, info, warn};

use crate::collab::{Collaborators, current_timestamp};
use crate::config::{Config, ValidationError};
use crate::error::{ChannelError, ModeError, Numeric};
use crate::join::{JoinChain, JoinDecision};
use crate::modes::{ModeChange, ModeRegistry, Origin};
use crate::netmerge::ConflictInput;
use crate::security::BanRedirectEntry;
use crate::state::actor::{ActorShared, ChannelActor, ChannelEvent, ChannelHandle, ChannelInfo};
use crate::state::managers::ChannelDirectory;
use crate::state::{ListEntry, UserContext, is_valid_channel_name};
use crate::telemetry::spans;

/// How a join ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user is now a member of the requested channel.
    Joined,
    /// The user was banned from `from` and placed in `to` instead.
    Redirected { from: String, to: String },
}

/// Channel management state and behavior.
///
/// The ChannelManager is responsible for:
/// - Spawning channel actors and tracking them in the directory.
/// - Holding the mode registry shared by every actor.
/// - Running joins, including forced joins into redirect targets.
/// - Reporting local denials through the numeric sink.
pub struct ChannelManager {
    directory: Arc<ChannelDirectory>,
    registry: Arc<RwLock<ModeRegistry>>,
    collab: Collaborators,
    config: Arc<Config>,
}

impl ChannelManager {
    /// Create a manager with the default mode set (`+imnpst`, `+k`, `+l`,
    /// `+b` with ban redirects).
    ///
    /// Fails with every problem [`Config::validate`] finds.
    pub fn new(config: Config, collab: Collaborators) -> Result<Self, Vec<ValidationError>> {
        Self::with_registry(config, ModeRegistry::with_defaults(), collab)
    }

    pub fn with_registry(
        config: Config,
        registry: ModeRegistry,
        collab: Collaborators,
    ) -> Result<Self, Vec<ValidationError>> {
        if let Err(errors) = config.validate() {
            for err in &errors {
                warn!(error = %err, "Invalid mode core configuration");
            }
            return Err(errors);
        }

        Ok(Self {
            directory: Arc::new(ChannelDirectory::new()),
            registry: Arc::new(RwLock::new(registry)),
            collab,
            config: Arc::new(config),
        })
    }

    /// The registry shared by all channels. Handlers and watchers may be
    /// added or removed at runtime.
    pub fn registry(&self) -> &Arc<RwLock<ModeRegistry>> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &Arc<ChannelDirectory> {
        &self.directory
    }

    pub fn channel_count(&self) -> usize {
        self.directory.len()
    }

    fn get_or_create(&self, name: &str) -> ChannelHandle {
        self.directory.get_or_insert_with(name, || {
            info!(channel = %name, "Channel created");
            ChannelActor::spawn(
                name.to_string(),
                current_timestamp(),
                ActorShared {
                    registry: self.registry.clone(),
                    directory: Arc::downgrade(&self.directory),
                    collab: self.collab.clone(),
                    config: self.config.clone(),
                },
            )
        })
    }

    /// Send an event and wait for its reply. `None` if the actor is gone.
    async fn request<T>(
        &self,
        handle: &ChannelHandle,
        make: impl FnOnce(oneshot::Sender<T>) -> ChannelEvent,
    ) -> Option<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if handle.tx.send(make(reply_tx)).await.is_err() {
            warn!("Channel actor mailbox closed");
            return None;
        }
        reply_rx.await.ok()
    }

    fn send_numeric(&self, user: &UserContext, numeric: Numeric, params: Vec<String>) {
        self.collab.numerics.send_numeric(&user.uid, numeric, params);
    }

    /// Send the numeric for `err`, if it has one, and hand the error back.
    fn report(&self, user: &UserContext, channel: &str, err: ChannelError) -> ChannelError {
        if let Some(numeric) = err.numeric() {
            self.send_numeric(user, numeric, err.reply_params(&user.nickname, channel));
        }
        err
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Apply one mode change to `channel`.
    ///
    /// Local denials with a numeric are reported to `source`. Remote denials
    /// are only logged.
    pub async fn apply_mode_change(
        &self,
        source: &UserContext,
        channel: &str,
        change: ModeChange,
        origin: Origin,
    ) -> Result<ModeChange, ModeError> {
        let span = spans::mode_change(channel, &source.nickname, change.letter, change.adding);
        async move {
            let result = match self.directory.get(channel) {
                None => Err(ModeError::NoSuchChannel(channel.to_string())),
                Some(handle) => self
                    .request(&handle, |reply_tx| ChannelEvent::ApplyMode {
                        source: Box::new(source.clone()),
                        change,
                        origin,
                        reply_tx,
                    })
                    .await
                    .unwrap_or(Err(ModeError::ChannelGone)),
            };

            if let Err(err) = &result {
                debug!(error = %err, code = err.error_code(), ?origin, "Mode change denied");
                if origin.is_local()
                    && let Some(numeric) = err.numeric()
                {
                    self.send_numeric(source, numeric, err.reply_params(&source.nickname, channel));
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Resolve a netmerge disagreement on `letter` and commit the winner.
    pub async fn resolve_netmerge_conflict(
        &self,
        letter: char,
        channel: &str,
        their_ts: i64,
        our_ts: i64,
        theirs: &str,
        ours: &str,
    ) -> Result<String, ModeError> {
        let Some(handle) = self.directory.get(channel) else {
            return Err(ModeError::NoSuchChannel(channel.to_string()));
        };
        let input = ConflictInput {
            letter,
            their_ts,
            our_ts,
            theirs: theirs.to_string(),
            ours: ours.to_string(),
        };
        self.request(&handle, |reply_tx| ChannelEvent::ResolveConflict { input, reply_tx })
            .instrument(spans::netmerge(channel, letter))
            .await
            .unwrap_or(Err(ModeError::ChannelGone))
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Evaluate `channel`'s bans for `user` without joining.
    ///
    /// A channel that does not exist has no bans, so the answer is `Allow`.
    pub async fn evaluate_join(
        &self,
        user: &UserContext,
        channel: &str,
        chain: &JoinChain,
    ) -> Result<JoinDecision, ChannelError> {
        let Some(handle) = self.directory.get(channel) else {
            return Ok(JoinDecision::Allow);
        };
        self.request(&handle, |reply_tx| ChannelEvent::EvaluateJoin {
            user: Box::new(user.clone()),
            chain: *chain,
            reply_tx,
        })
        .await
        .ok_or(ChannelError::ChannelTombstone)
    }

    /// Join `user` to `channel`, creating it if needed.
    ///
    /// A ban with a redirect sends 474 and 470, then places the user in the
    /// redirect target with ban evaluation there suppressed.
    pub async fn join(&self, user: &UserContext, channel: &str) -> Result<JoinOutcome, ChannelError> {
        let mut chain = JoinChain::new();
        self.join_in_chain(user, channel, &mut chain).await
    }

    /// [`join`](Self::join) within an existing redirect chain.
    pub fn join_in_chain<'a>(
        &'a self,
        user: &'a UserContext,
        channel: &'a str,
        chain: &'a mut JoinChain,
    ) -> BoxFuture<'a, Result<JoinOutcome, ChannelError>> {
        let span = spans::join(&user.uid, channel);
        async move {
            if !is_valid_channel_name(channel, self.config.limits.max_channel_name_len) {
                return Err(self.report(user, channel, ChannelError::InvalidChannelName));
            }

            let decision = match self.admit(user, channel, *chain).await {
                Ok(decision) => decision,
                Err(err) => return Err(self.report(user, channel, err)),
            };

            match decision {
                JoinDecision::Allow => Ok(JoinOutcome::Joined),
                JoinDecision::Deny => Err(self.report(user, channel, ChannelError::BannedFromChan)),
                JoinDecision::Redirect(target) => {
                    self.report(user, channel, ChannelError::BannedFromChan);
                    self.send_numeric(
                        user,
                        Numeric::ERR_LINKCHANNEL,
                        vec![
                            user.nickname.clone(),
                            channel.to_string(),
                            target.clone(),
                            "You are banned from this channel, so you are automatically transferred to the redirected channel.".to_string(),
                        ],
                    );
                    info!(uid = %user.uid, target = %target, "Following ban redirect");

                    let mut guard = chain.follow();
                    let outcome = self.force_join(user, &target, &mut guard).await?;
                    match outcome {
                        JoinOutcome::Joined => Ok(JoinOutcome::Redirected {
                            from: channel.to_string(),
                            to: target,
                        }),
                        redirected => Ok(redirected),
                    }
                }
            }
        }
        .instrument(span)
        .boxed()
    }

    /// Join `user` to `channel` on the server's behalf, honouring `chain`.
    ///
    /// While `chain` is following a redirect the channel's bans are not
    /// evaluated.
    pub fn force_join<'a>(
        &'a self,
        user: &'a UserContext,
        channel: &'a str,
        chain: &'a mut JoinChain,
    ) -> BoxFuture<'a, Result<JoinOutcome, ChannelError>> {
        self.join_in_chain(user, channel, chain)
    }

    /// Hand the join to the channel actor, retrying once against a fresh
    /// actor if the current one is shutting down.
    async fn admit(
        &self,
        user: &UserContext,
        channel: &str,
        chain: JoinChain,
    ) -> Result<JoinDecision, ChannelError> {
        for attempt in 0..2 {
            let handle = self.get_or_create(channel);
            let reply = self
                .request(&handle, |reply_tx| ChannelEvent::Join {
                    user: Box::new(user.clone()),
                    chain,
                    reply_tx,
                })
                .await;

            match reply {
                Some(Err(ChannelError::ChannelTombstone)) | None if attempt == 0 => {
                    debug!(channel = %channel, "Channel actor draining, retrying join");
                    self.directory.remove_handle(channel, &handle);
                }
                Some(result) => return result,
                None => return Err(ChannelError::ChannelTombstone),
            }
        }
        Err(ChannelError::ChannelTombstone)
    }

    /// Remove `user` from `channel`. Returns the remaining member count; the
    /// channel is destroyed when it reaches zero.
    pub async fn part(&self, user: &UserContext, channel: &str) -> Result<usize, ChannelError> {
        let result = match self.directory.get(channel) {
            None => Err(ChannelError::NoSuchChannel),
            Some(handle) => self
                .request(&handle, |reply_tx| ChannelEvent::Part {
                    uid: user.uid.clone(),
                    reply_tx,
                })
                .await
                .unwrap_or(Err(ChannelError::NoSuchChannel)),
        };
        result.map_err(|err| self.report(user, channel, err))
    }

    /// Destroy `channel` now, purging its redirect store. Returns how many
    /// redirect entries were purged.
    pub async fn on_channel_destroyed(&self, channel: &str) -> usize {
        let Some(handle) = self.directory.get(channel) else {
            return 0;
        };
        self.request(&handle, |reply_tx| ChannelEvent::Destroy {
            reply_tx: Some(reply_tx),
        })
        .await
        .unwrap_or(0)
    }

    // ========================================================================
    // Ban redirects and queries
    // ========================================================================

    /// Rewrite every `mask#target` ban on `channel` as the plain ban `mask`.
    ///
    /// Returns the mode changes a host should propagate.
    pub async fn strip_ban_redirects(&self, channel: &str) -> Vec<ModeChange> {
        let Some(handle) = self.directory.get(channel) else {
            return Vec::new();
        };
        self.request(&handle, |reply_tx| ChannelEvent::StripRedirects { reply_tx })
            .await
            .unwrap_or_default()
    }

    pub async fn bans(&self, channel: &str) -> Option<Vec<ListEntry>> {
        let handle = self.directory.get(channel)?;
        self.request(&handle, |reply_tx| ChannelEvent::GetBans { reply_tx })
            .await
    }

    pub async fn ban_redirects(&self, channel: &str) -> Option<Vec<BanRedirectEntry>> {
        let handle = self.directory.get(channel)?;
        self.request(&handle, |reply_tx| ChannelEvent::GetRedirects { reply_tx })
            .await
    }

    pub async fn channel_info(&self, channel: &str) -> Option<ChannelInfo> {
        let handle = self.directory.get(channel)?;
        self.request(&handle, |reply_tx| ChannelEvent::GetInfo { reply_tx })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn user(uid: &str, nick: &str) -> UserContext {
        UserContext::new(uid, nick, nick, "host.example", IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)))
    }

    #[tokio::test]
    async fn test_first_joiner_is_opped() {
        let manager = ChannelManager::new(Config::default(), Collaborators::default()).unwrap();
        let alice = user("001", "alice");
        let bob = user("002", "bob");

        assert_eq!(manager.join(&alice, "#a").await, Ok(JoinOutcome::Joined));
        assert_eq!(manager.join(&bob, "#A").await, Ok(JoinOutcome::Joined));
        assert_eq!(manager.channel_count(), 1);

        let summary = manager.directory().get("#a").map(|h| h.summary());
        let summary = summary.unwrap();
        assert_eq!(summary.members.get("001"), Some(&crate::state::OP_VALUE));
        assert_eq!(summary.members.get("002"), Some(&0));
    }

    #[tokio::test]
    async fn test_new_channel_modes() {
        let manager = ChannelManager::new(Config::default(), Collaborators::default()).unwrap();
        manager.join(&user("001", "alice"), "#a").await.unwrap();
        let info = manager.channel_info("#a").await.unwrap();
        assert_eq!(info.name, "#a");
        assert_eq!(info.member_count, 1);
        assert_eq!(info.modes, "+nt");
    }

    #[tokio::test]
    async fn test_last_part_destroys_channel() {
        let manager = ChannelManager::new(Config::default(), Collaborators::default()).unwrap();
        let alice = user("001", "alice");
        manager.join(&alice, "#a").await.unwrap();

        assert_eq!(manager.part(&alice, "#a").await, Ok(0));
        assert_eq!(manager.channel_count(), 0);
        assert_eq!(manager.part(&alice, "#a").await, Err(ChannelError::NoSuchChannel));
    }

    #[tokio::test]
    async fn test_mode_on_missing_channel() {
        let manager = ChannelManager::new(Config::default(), Collaborators::default()).unwrap();
        let result = manager
            .apply_mode_change(&user("001", "alice"), "#nowhere", ModeChange::plus('m', None), Origin::Local)
            .await;
        assert_eq!(result, Err(ModeError::NoSuchChannel("#nowhere".into())));
    }

    #[tokio::test]
    async fn test_invalid_channel_name() {
        let manager = ChannelManager::new(Config::default(), Collaborators::default()).unwrap();
        let result = manager.join(&user("001", "alice"), "nohash").await;
        assert_eq!(result, Err(ChannelError::InvalidChannelName));
        assert_eq!(manager.channel_count(), 0);
    }
}
