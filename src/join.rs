//! Join-time ban enforcement.
//!
//! [`evaluate_join`] walks a channel's ban list and decides whether a joining
//! user is let in, refused, or sent to a redirect target. A redirect is
//! followed by a forced join into the target; while that forced join runs the
//! user's [`JoinChain`] is marked as following, and evaluation on the target
//! returns [`JoinDecision::Allow`] without looking at its bans. That is what
//! stops `#a → #b → #a` redirect loops.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::collab::{BanExceptionCheck, ChannelLookup};
use crate::security::{ExtendedBanMask, ParsedMask, cidr_match, wildcard_match};
use crate::state::{Channel, UserContext};

/// Outcome of evaluating a join against the ban list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinDecision {
    Allow,
    /// Banned. The caller sends 474.
    Deny,
    /// Banned with a redirect. The caller sends 474 and 470, then force-joins.
    Redirect(String),
}

/// Per-join-attempt redirect state.
///
/// Created fresh for every top-level join and threaded through any forced
/// joins it causes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinChain {
    following: bool,
}

impl JoinChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redirect is being followed, so ban evaluation is skipped.
    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Mark the chain as following a redirect until the guard is dropped.
    pub fn follow(&mut self) -> FollowGuard<'_> {
        self.following = true;
        FollowGuard { chain: self }
    }
}

/// Clears [`JoinChain::is_following`] on drop, including on early return.
#[derive(Debug)]
pub struct FollowGuard<'a> {
    chain: &'a mut JoinChain,
}

impl Deref for FollowGuard<'_> {
    type Target = JoinChain;

    fn deref(&self) -> &JoinChain {
        self.chain
    }
}

impl DerefMut for FollowGuard<'_> {
    fn deref_mut(&mut self) -> &mut JoinChain {
        self.chain
    }
}

impl Drop for FollowGuard<'_> {
    fn drop(&mut self) {
        self.chain.following = false;
    }
}

/// What join evaluation needs from outside the channel.
pub struct JoinEnv<'a> {
    pub lookup: &'a dyn ChannelLookup,
    pub exceptions: &'a dyn BanExceptionCheck,
    /// Redirect into a full target instead of falling back to a plain ban.
    pub limit_redirect_interop: bool,
}

/// Decide whether `user` may join `channel`.
///
/// Bans are scanned in list order and the first ban that matches, and that
/// the user is not excepted from, decides. Extended bans are not evaluated
/// here. A ban matches if its hostmask matches the user's displayed host,
/// real host, or IP (including CIDR masks).
pub fn evaluate_join(
    channel: &Channel,
    user: &UserContext,
    chain: &JoinChain,
    env: &JoinEnv<'_>,
) -> JoinDecision {
    if chain.is_following() {
        return JoinDecision::Allow;
    }

    let displayed = user.hostmask();
    let real = user.real_hostmask();
    let by_ip = user.ip_hostmask();

    for ban in &channel.bans {
        let ParsedMask::Mask(mask) = ExtendedBanMask::parse(&ban.mask) else {
            continue;
        };
        let hostmask = mask.hostmask();
        let matched = wildcard_match(&hostmask, &displayed)
            || wildcard_match(&hostmask, &real)
            || cidr_match(&hostmask, &by_ip);
        if !matched {
            continue;
        }

        if env.exceptions.is_excepted(user, &channel.name, &ban.mask) {
            debug!(channel = %channel.name, uid = %user.uid, ban = %ban.mask, "Ban excepted");
            continue;
        }

        let Some(entry) = mask
            .redirect()
            .and_then(|target| channel.find_ban_redirect(&hostmask, target))
        else {
            return JoinDecision::Deny;
        };

        if !env.limit_redirect_interop
            && env
                .lookup
                .occupancy(&entry.target)
                .is_some_and(|occupancy| occupancy.is_full())
        {
            debug!(channel = %channel.name, target = %entry.target, "Redirect target full, treating as plain ban");
            return JoinDecision::Deny;
        }

        return JoinDecision::Redirect(entry.target.clone());
    }

    JoinDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{NoChannels, NoExceptions, Occupancy};
    use crate::state::ListEntry;

    struct Full(Option<usize>);

    impl ChannelLookup for Full {
        fn channel_exists(&self, _name: &str) -> bool {
            true
        }

        fn privilege_level(&self, _uid: &str, _channel: &str) -> u32 {
            0
        }

        fn occupancy(&self, _channel: &str) -> Option<Occupancy> {
            Some(Occupancy { members: 1, limit: self.0 })
        }
    }

    fn bob() -> UserContext {
        UserContext::new("002", "bob", "bob", "cloak.example", "203.0.113.7".parse().unwrap())
            .with_realhost("evil.host")
    }

    fn channel_with(bans: &[&str]) -> Channel {
        let mut channel = Channel::new("#a", 0, 64);
        for mask in bans {
            channel.bans.push(ListEntry {
                mask: mask.to_string(),
                set_by: "alice".into(),
                set_at: 0,
            });
            if let ParsedMask::Mask(parsed) = ExtendedBanMask::parse(mask)
                && let Some(target) = parsed.redirect()
            {
                channel.add_ban_redirect(parsed.hostmask(), target.to_string());
            }
        }
        channel
    }

    fn env<'a>(lookup: &'a dyn ChannelLookup, exceptions: &'a dyn BanExceptionCheck) -> JoinEnv<'a> {
        JoinEnv {
            lookup,
            exceptions,
            limit_redirect_interop: false,
        }
    }

    #[test]
    fn test_no_bans_allows() {
        let channel = channel_with(&[]);
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&NoChannels, &NoExceptions));
        assert_eq!(decision, JoinDecision::Allow);
    }

    #[test]
    fn test_matches_real_host_and_ip() {
        let chain = JoinChain::new();
        for ban in ["*!*@evil.host", "*!*@cloak.example", "*!*@203.0.113.0/24", "bob!*@*"] {
            let channel = channel_with(&[ban]);
            let decision = evaluate_join(&channel, &bob(), &chain, &env(&NoChannels, &NoExceptions));
            assert_eq!(decision, JoinDecision::Deny, "ban {ban}");
        }
    }

    #[test]
    fn test_extbans_are_skipped() {
        let channel = channel_with(&["R:*", "m:*!*@*"]);
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&NoChannels, &NoExceptions));
        assert_eq!(decision, JoinDecision::Allow);
    }

    #[test]
    fn test_redirect() {
        let channel = channel_with(&["*!*@evil.host#b"]);
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&Full(None), &NoExceptions));
        assert_eq!(decision, JoinDecision::Redirect("#b".into()));
    }

    #[test]
    fn test_first_matching_ban_decides() {
        let channel = channel_with(&["*!*@evil.host", "*!*@evil.host#b"]);
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&Full(None), &NoExceptions));
        assert_eq!(decision, JoinDecision::Deny);

        let channel = channel_with(&["*!*@evil.host#b", "*!*@evil.host"]);
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&Full(None), &NoExceptions));
        assert_eq!(decision, JoinDecision::Redirect("#b".into()));
    }

    #[test]
    fn test_full_target_falls_back_to_ban() {
        let channel = channel_with(&["*!*@evil.host#b"]);
        let full = Full(Some(1));
        let exceptions = NoExceptions;
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&full, &exceptions));
        assert_eq!(decision, JoinDecision::Deny);

        let interop = JoinEnv {
            limit_redirect_interop: true,
            ..env(&full, &exceptions)
        };
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &interop);
        assert_eq!(decision, JoinDecision::Redirect("#b".into()));
    }

    #[test]
    fn test_exception_skips_ban() {
        let channel = channel_with(&["*!*@evil.host#b", "*!*@cloak.example"]);
        let except_redirect = |_: &UserContext, _: &str, ban: &str| ban.ends_with("#b");
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&Full(None), &except_redirect));
        assert_eq!(decision, JoinDecision::Deny);

        let except_all = |_: &UserContext, _: &str, _: &str| true;
        let decision = evaluate_join(&channel, &bob(), &JoinChain::new(), &env(&Full(None), &except_all));
        assert_eq!(decision, JoinDecision::Allow);
    }

    #[test]
    fn test_following_chain_skips_evaluation() {
        let channel = channel_with(&["*!*@evil.host#b"]);
        let mut chain = JoinChain::new();
        {
            let guard = chain.follow();
            let decision = evaluate_join(&channel, &bob(), &guard, &env(&Full(None), &NoExceptions));
            assert_eq!(decision, JoinDecision::Allow);
        }
        assert!(!chain.is_following());
        let decision = evaluate_join(&channel, &bob(), &chain, &env(&Full(None), &NoExceptions));
        assert_eq!(decision, JoinDecision::Redirect("#b".into()));
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn fails(chain: &mut JoinChain) -> Result<(), ()> {
            let guard = chain.follow();
            assert!(guard.is_following());
            Err(())
        }

        let mut chain = JoinChain::new();
        assert!(fails(&mut chain).is_err());
        assert!(!chain.is_following());
    }
}
