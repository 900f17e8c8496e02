//! Mode watchers: interceptors that run between validation and commit.

use std::sync::Arc;

use crate::error::{ModeError, RegistryError};
use crate::state::{Channel, UserContext};

use super::{ModeChange, ModeEnv, Origin};

/// What a watcher sees of a pending change.
///
/// The channel is read-only here. Watchers that need to record state do so
/// in [`ModeWatcher::after_change`], which only runs once the change commits.
pub struct WatchContext<'a> {
    pub source: &'a UserContext,
    pub origin: Origin,
    pub channel: &'a Channel,
    pub letter: char,
    pub adding: bool,
    /// The parameter about to be committed. Watchers may rewrite it.
    pub param: &'a mut Option<String>,
    pub env: &'a ModeEnv<'a>,
}

/// An interceptor attached to one mode letter.
pub trait ModeWatcher: Send + Sync {
    /// Unique name, used to detach the watcher.
    fn name(&self) -> &'static str;

    fn letter(&self) -> char;

    /// Inspect, rewrite or veto a change before it commits.
    fn before_change(&self, ctx: &mut WatchContext<'_>) -> Result<(), ModeError>;

    /// Observe a committed change.
    fn after_change(&self, _channel: &mut Channel, _change: &ModeChange) {}
}

/// Watchers in attachment order.
#[derive(Default, Clone)]
pub struct WatcherChain {
    watchers: Vec<Arc<dyn ModeWatcher>>,
}

impl WatcherChain {
    pub fn push(&mut self, watcher: Arc<dyn ModeWatcher>) -> Result<(), RegistryError> {
        if self.contains(watcher.name()) {
            return Err(RegistryError::WatcherExists(watcher.name()));
        }
        self.watchers.push(watcher);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.watchers.len();
        self.watchers.retain(|w| w.name() != name);
        self.watchers.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.watchers.iter().any(|w| w.name() == name)
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Run every watcher on the context's letter. Stops at the first veto.
    pub fn before_change(&self, ctx: &mut WatchContext<'_>) -> Result<(), ModeError> {
        let letter = ctx.letter;
        for watcher in self.watchers.iter().filter(|w| w.letter() == letter) {
            watcher.before_change(ctx)?;
        }
        Ok(())
    }

    pub fn after_change(&self, channel: &mut Channel, change: &ModeChange) {
        for watcher in self.watchers.iter().filter(|w| w.letter() == change.letter) {
            watcher.after_change(channel, change);
        }
    }
}
