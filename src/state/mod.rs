//! State management module.
//!
//! Contains channel data, the per-channel actors that own it, and the
//! managers hosts call into.

pub mod actor;
mod channel;
pub mod managers;
mod user;

pub use actor::{ChannelHandle, ChannelInfo, ChannelSummary};
pub use channel::{Channel, ListEntry, MemberModes, OP_VALUE, is_valid_channel_name};
pub use managers::{ChannelDirectory, ChannelManager, JoinOutcome};
pub use user::{Uid, UserContext};
