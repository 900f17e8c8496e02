//! Index of live channel actors.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use slirc_proto::irc_to_lower;

use crate::collab::{ChannelLookup, Occupancy};
use crate::state::actor::{ChannelHandle, ChannelSummary};

/// All live channels, keyed by RFC1459-lowercased name.
///
/// Also answers cross-channel questions for actors, from each channel's
/// published [`ChannelSummary`].
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    channels: DashMap<String, ChannelHandle>,
}

impl ChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ChannelHandle> {
        self.channels
            .get(&irc_to_lower(name))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(&irc_to_lower(name))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Existing handle for `name`, or the one `spawn` creates.
    ///
    /// `spawn` runs under the shard lock and must not touch the directory.
    pub(crate) fn get_or_insert_with(
        &self,
        name: &str,
        spawn: impl FnOnce() -> ChannelHandle,
    ) -> ChannelHandle {
        self.channels
            .entry(irc_to_lower(name))
            .or_insert_with(spawn)
            .value()
            .clone()
    }

    /// Remove `name` only if it still maps to the actor owning `summary`.
    ///
    /// A replacement actor registered under the same name is left alone.
    pub(crate) fn remove_actor(&self, name: &str, summary: &Arc<RwLock<ChannelSummary>>) -> bool {
        self.channels
            .remove_if(&irc_to_lower(name), |_, handle| {
                Arc::ptr_eq(&handle.summary, summary)
            })
            .is_some()
    }

    pub(crate) fn remove_handle(&self, name: &str, handle: &ChannelHandle) -> bool {
        self.remove_actor(name, &handle.summary)
    }
}

impl ChannelLookup for ChannelDirectory {
    fn channel_exists(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn privilege_level(&self, uid: &str, channel: &str) -> u32 {
        self.channels
            .get(&irc_to_lower(channel))
            .and_then(|entry| entry.summary.read().members.get(uid).copied())
            .unwrap_or(0)
    }

    fn occupancy(&self, channel: &str) -> Option<Occupancy> {
        self.channels.get(&irc_to_lower(channel)).map(|entry| {
            let summary = entry.summary.read();
            Occupancy {
                members: summary.members.len(),
                limit: summary.limit,
            }
        })
    }
}
