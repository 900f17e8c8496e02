//! Domain managers for channel state.
//!
//! `ChannelDirectory` indexes live channel actors; `ChannelManager` is the
//! entry point hosts call into.

mod channel;
mod directory;

pub use channel::{ChannelManager, JoinOutcome};
pub use directory::ChannelDirectory;
