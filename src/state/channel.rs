//! Channel data owned by a single [`ChannelActor`](super::actor::ChannelActor).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::modes::ModeRegistry;
use crate::security::BanRedirectList;

use super::user::Uid;

/// Privilege level of a channel operator. Local mode changes require this.
pub const OP_VALUE: u32 = 30_000;

/// A list mode entry (ban).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub mask: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Per-member channel status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemberModes {
    pub op: bool, // +o (@)
}

impl MemberModes {
    /// Modes for a channel operator.
    pub fn opped() -> Self {
        Self { op: true }
    }

    /// Numeric privilege level used by authority checks.
    pub fn privilege_level(&self) -> u32 {
        if self.op { OP_VALUE } else { 0 }
    }
}

/// A channel's state: modes, ban list, members and ban redirects.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub created: i64,
    flags: BTreeSet<char>,
    params: BTreeMap<char, String>,
    pub bans: Vec<ListEntry>,
    pub max_bans: usize,
    pub members: HashMap<Uid, MemberModes>,
    /// Present only while at least one redirecting ban is active.
    pub(crate) redirects: Option<BanRedirectList>,
}

impl Channel {
    /// Create a new, empty channel.
    pub fn new(name: impl Into<String>, created: i64, max_bans: usize) -> Self {
        Self {
            name: name.into(),
            created,
            flags: BTreeSet::new(),
            params: BTreeMap::new(),
            bans: Vec::new(),
            max_bans,
            members: HashMap::new(),
            redirects: None,
        }
    }

    /// Whether mode `letter` is set, as a flag or with a parameter.
    pub fn is_mode_set(&self, letter: char) -> bool {
        self.flags.contains(&letter) || self.params.contains_key(&letter)
    }

    /// Current parameter of a parameter mode.
    pub fn param(&self, letter: char) -> Option<&str> {
        self.params.get(&letter).map(String::as_str)
    }

    /// Set or clear a flag mode. Returns true if the state changed.
    pub fn set_flag(&mut self, letter: char, on: bool) -> bool {
        if on {
            self.flags.insert(letter)
        } else {
            self.flags.remove(&letter)
        }
    }

    /// Replace or clear a parameter mode. Returns true if the state changed.
    pub fn set_param(&mut self, letter: char, value: Option<String>) -> bool {
        match value {
            Some(value) => self.params.insert(letter, value.clone()).as_ref() != Some(&value),
            None => self.params.remove(&letter).is_some(),
        }
    }

    /// The stored `+l` value, if one is set.
    pub fn limit(&self) -> Option<usize> {
        self.param('l').and_then(|value| value.parse().ok())
    }

    /// Privilege level of a member, or 0 for non-members.
    pub fn privilege_of(&self, uid: &str) -> u32 {
        self.members
            .get(uid)
            .map_or(0, MemberModes::privilege_level)
    }

    /// Check if a user is a member.
    pub fn is_member(&self, uid: &str) -> bool {
        self.members.contains_key(uid)
    }

    /// Render the mode string (e.g. `+klnt secret 10`).
    ///
    /// Letters whose handler is no longer registered are left out.
    pub fn mode_string(&self, registry: &ModeRegistry) -> String {
        let mut letters: Vec<char> = self
            .flags
            .iter()
            .chain(self.params.keys())
            .copied()
            .filter(|&c| registry.is_registered(c))
            .collect();
        letters.sort_unstable();
        letters.dedup();

        let mut modes = String::from("+");
        let mut args = Vec::new();
        for c in letters {
            modes.push(c);
            if let Some(value) = self.params.get(&c) {
                args.push(value.as_str());
            }
        }

        if args.is_empty() {
            modes
        } else {
            format!("{} {}", modes, args.join(" "))
        }
    }
}

/// Check a channel name: `#` prefix, bounded length, no space, comma or BEL.
pub fn is_valid_channel_name(name: &str, max_len: usize) -> bool {
    name.starts_with('#')
        && name.len() <= max_len
        && !name.chars().any(|c| matches!(c, ' ' | ',' | '\x07' | '\0' | '\r' | '\n'))
}
