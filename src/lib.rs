//! slircd-modecore - channel mode and ban enforcement core for slircd.
//!
//! This crate holds the part of the daemon that decides what a channel mode
//! change does and whether a user may enter a channel:
//!
//! - [`modes`]: the mode registry, the per-letter handlers (`+b`, `+l`, `+k`,
//!   boolean flags) and the watcher chain that can rewrite or veto a change
//! - [`security`]: the extended ban mask grammar, hostmask/CIDR matching and
//!   ban redirection (`+b mask#channel`)
//! - [`join`]: join-time ban enforcement (allow / deny / redirect)
//! - [`netmerge`]: timestamp conflict resolution for single-parameter modes
//! - [`state`]: channel data, the per-channel actor and the [`ChannelManager`]
//!
//! # Architecture
//!
//! ```text
//!  MODE ──► ChannelManager ──► ChannelActor ──► ModeRegistry::apply
//!                                   │              validate → watchers → commit
//!  JOIN ──► ChannelManager ──► ChannelActor ──► join::evaluate_join
//!                │                                  │
//!                └──── Redirect(target) ◄───────────┘
//!                       force_join(target) under a JoinChain guard
//! ```
//!
//! Each channel is owned by one actor task, so a mode commit and a join
//! evaluation on the same channel never interleave. Socket I/O, command
//! parsing and numeric formatting belong to the embedding server; the core
//! talks to it through the traits in [`collab`].

pub mod collab;
pub mod config;
pub mod error;
pub mod join;
pub mod modes;
pub mod netmerge;
pub mod security;
pub mod state;
pub mod telemetry;

pub use collab::{BanExceptionCheck, ChannelLookup, Collaborators, NumericSink, Occupancy};
pub use config::Config;
pub use error::{ChannelError, ModeError, Numeric, RegistryError};
pub use join::{JoinChain, JoinDecision};
pub use modes::{ModeChange, ModeHandler, ModeRegistry, ModeWatcher, Origin};
pub use security::{BanRedirectEntry, ExtendedBanMask, ParsedMask};
pub use state::{Channel, ChannelManager, JoinOutcome, UserContext};
