//! Channel actor event handlers.
//!
//! Each submodule adds one group of `ChannelActor` methods:
//!
//! - `modes`: registry pipeline for MODE changes
//! - `join`: ban evaluation and membership on join
//! - `part`: membership removal and empty-channel cleanup
//! - `remote`: netmerge conflict resolution
//! - `query`: read-only snapshots

mod join;
mod modes;
mod part;
mod query;
mod remote;

use super::{ActorState, ChannelActor};
