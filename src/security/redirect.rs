//! Ban redirection.
//!
//! A ban of the form `mask#target` sends matching users to `#target` instead
//! of only refusing them. The watcher here validates and normalises such bans
//! before `+b` commits them, and keeps the channel's redirect entries in step
//! with its ban list afterwards.

use slirc_proto::irc_eq;
use tracing::debug;

use crate::error::ModeError;
use crate::modes::{ModeChange, ModeWatcher, WatchContext};
use crate::state::{Channel, OP_VALUE, is_valid_channel_name};

use super::mask::{ExtendedBanMask, ParsedMask};

/// One active redirecting ban.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRedirectEntry {
    /// Normalised `nick!ident@host`, without the target.
    pub banmask: String,
    /// Channel matching users are sent to.
    pub target: String,
}

pub(crate) type BanRedirectList = Vec<BanRedirectEntry>;

impl Channel {
    /// Active redirect entries, in the order their bans were set.
    pub fn ban_redirects(&self) -> &[BanRedirectEntry] {
        self.redirects.as_deref().unwrap_or(&[])
    }

    /// Whether the redirect slot is populated.
    pub fn has_ban_redirects(&self) -> bool {
        self.redirects.is_some()
    }

    /// Find the entry for a ban mask and target.
    pub fn find_ban_redirect(&self, banmask: &str, target: &str) -> Option<&BanRedirectEntry> {
        self.ban_redirects()
            .iter()
            .find(|entry| irc_eq(&entry.banmask, banmask) && irc_eq(&entry.target, target))
    }

    /// Record a redirect entry, creating the slot if needed.
    pub fn add_ban_redirect(&mut self, banmask: String, target: String) {
        if self.find_ban_redirect(&banmask, &target).is_some() {
            return;
        }
        self.redirects
            .get_or_insert_with(Vec::new)
            .push(BanRedirectEntry { banmask, target });
    }

    /// Remove a redirect entry. The slot is released once it is empty.
    pub fn remove_ban_redirect(&mut self, banmask: &str, target: &str) -> bool {
        let Some(list) = self.redirects.as_mut() else {
            return false;
        };

        let before = list.len();
        list.retain(|entry| !(irc_eq(&entry.banmask, banmask) && irc_eq(&entry.target, target)));
        let removed = list.len() != before;

        if list.is_empty() {
            self.redirects = None;
        }
        removed
    }

    /// Drop every redirect entry. Returns how many were dropped.
    pub fn purge_ban_redirects(&mut self) -> usize {
        self.redirects.take().map_or(0, |list| list.len())
    }

    /// Turn every redirecting ban back into a plain ban.
    ///
    /// Used when redirection is unloaded. Returns the mode changes to
    /// announce: `-b mask#target` then `+b mask` for each entry (the `+b` is
    /// left out when an identical plain ban already exists).
    pub fn strip_ban_redirects(&mut self) -> Vec<ModeChange> {
        let Some(entries) = self.redirects.take() else {
            return Vec::new();
        };

        let mut changes = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            let full = format!("{}{}", entry.banmask, entry.target);
            let Some(index) = self.bans.iter().position(|ban| irc_eq(&ban.mask, &full)) else {
                continue;
            };

            changes.push(ModeChange::minus('b', Some(&full)));
            if self.bans.iter().any(|ban| irc_eq(&ban.mask, &entry.banmask)) {
                self.bans.remove(index);
            } else {
                self.bans[index].mask = entry.banmask.clone();
                changes.push(ModeChange::plus('b', Some(&entry.banmask)));
            }
        }
        changes
    }
}

/// Watcher on `+b` that handles the `#target` suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct BanRedirectWatcher;

impl BanRedirectWatcher {
    pub const NAME: &'static str = "banredirect";

    /// Authority checks for a locally-set redirect.
    fn check_authority(ctx: &WatchContext<'_>, target: &str) -> Result<(), ModeError> {
        if !ctx.env.lookup.channel_exists(target) {
            return Err(ModeError::RedirectTargetMissing(target.to_string()));
        }
        if ctx.env.lookup.privilege_level(&ctx.source.uid, target) < OP_VALUE {
            return Err(ModeError::RedirectNeedsOp(target.to_string()));
        }
        if irc_eq(&ctx.channel.name, target) {
            return Err(ModeError::SelfRedirect);
        }
        Ok(())
    }
}

impl ModeWatcher for BanRedirectWatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn letter(&self) -> char {
        'b'
    }

    fn before_change(&self, ctx: &mut WatchContext<'_>) -> Result<(), ModeError> {
        let Some(raw) = ctx.param.as_deref() else {
            return Ok(());
        };
        let ParsedMask::Mask(mask) = ExtendedBanMask::parse(raw) else {
            return Ok(());
        };

        if ctx.adding && let Some(target) = mask.redirect() {
            if !is_valid_channel_name(target, ctx.env.max_channel_len) {
                return Err(ModeError::InvalidRedirect(target.to_string()));
            }
            // Servers are trusted on existence and authority, not on syntax.
            if ctx.origin.is_local() {
                Self::check_authority(ctx, target)?;
            }
        }

        *ctx.param = Some(mask.to_string());
        Ok(())
    }

    fn after_change(&self, channel: &mut Channel, change: &ModeChange) {
        let Some(ParsedMask::Mask(mask)) = change.param.as_deref().map(ExtendedBanMask::parse) else {
            return;
        };
        let Some(target) = mask.redirect() else {
            return;
        };

        if change.adding {
            channel.add_ban_redirect(mask.hostmask(), target.to_string());
            debug!(channel = %channel.name, banmask = %mask.hostmask(), target = %target, "Ban redirect added");
        } else if channel.remove_ban_redirect(&mask.hostmask(), target) {
            debug!(channel = %channel.name, banmask = %mask.hostmask(), target = %target, "Ban redirect removed");
        }
    }
}
