//! Mode registry and the apply pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ModeError, RegistryError};
use crate::security::BanRedirectWatcher;
use crate::state::{Channel, OP_VALUE, UserContext};

use super::watcher::{ModeWatcher, WatchContext, WatcherChain};
use super::{BanMode, FlagMode, KeyMode, LimitMode, ModeChange, ModeEnv, ModeHandler, Origin};

/// Letters of the built-in boolean modes.
const FLAG_LETTERS: [char; 6] = ['i', 'm', 'n', 'p', 's', 't'];

/// Maps mode letters to handlers and runs changes through the watcher chain.
#[derive(Default, Clone)]
pub struct ModeRegistry {
    handlers: HashMap<char, Arc<dyn ModeHandler>>,
    watchers: WatcherChain,
}

impl ModeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in modes and ban redirection attached.
    pub fn with_defaults() -> Self {
        let mut handlers: HashMap<char, Arc<dyn ModeHandler>> = HashMap::new();

        for letter in FLAG_LETTERS {
            handlers.insert(letter, Arc::new(FlagMode::new(letter)));
        }
        handlers.insert('k', Arc::new(KeyMode));
        handlers.insert('l', Arc::new(LimitMode));
        handlers.insert('b', Arc::new(BanMode));

        let mut watchers = WatcherChain::default();
        // Fresh chain, so the name cannot collide.
        let _ = watchers.push(Arc::new(BanRedirectWatcher));

        Self { handlers, watchers }
    }

    /// Register a handler for a new letter.
    pub fn register(&mut self, handler: Arc<dyn ModeHandler>) -> Result<(), RegistryError> {
        let letter = handler.letter();
        if self.handlers.contains_key(&letter) {
            return Err(RegistryError::AlreadyRegistered(letter));
        }
        self.handlers.insert(letter, handler);
        Ok(())
    }

    /// Remove a handler.
    ///
    /// State the handler left on channels stays in place but is treated as
    /// absent: it no longer shows in mode strings or affects joins.
    pub fn unregister(&mut self, letter: char) -> Option<Arc<dyn ModeHandler>> {
        self.handlers.remove(&letter)
    }

    pub fn lookup(&self, letter: char) -> Result<&Arc<dyn ModeHandler>, ModeError> {
        self.handlers
            .get(&letter)
            .ok_or(ModeError::UnknownMode(letter))
    }

    pub fn is_registered(&self, letter: char) -> bool {
        self.handlers.contains_key(&letter)
    }

    /// Registered letters in sorted order.
    pub fn letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self.handlers.keys().copied().collect();
        letters.sort_unstable();
        letters
    }

    /// Attach a watcher at the end of the chain.
    pub fn add_watcher(&mut self, watcher: Arc<dyn ModeWatcher>) -> Result<(), RegistryError> {
        self.watchers.push(watcher)
    }

    /// Detach a watcher by name.
    pub fn remove_watcher(&mut self, name: &str) -> bool {
        self.watchers.remove(name)
    }

    pub fn watchers(&self) -> &WatcherChain {
        &self.watchers
    }

    /// Run one mode change through the pipeline.
    ///
    /// Handler lookup, operator check (local only), parameter check, handler
    /// validation and then each watcher in order. Any of these may deny the
    /// change; the channel is untouched until all have passed. On success the
    /// committed change is returned, with the parameter as stored.
    pub fn apply(
        &self,
        channel: &mut Channel,
        source: &UserContext,
        request: ModeChange,
        origin: Origin,
        env: &ModeEnv<'_>,
    ) -> Result<ModeChange, ModeError> {
        let ModeChange {
            letter,
            adding,
            param,
        } = request;
        let handler = self.lookup(letter)?;

        if origin.is_local() && channel.privilege_of(&source.uid) < OP_VALUE {
            return Err(ModeError::ChanOpPrivsNeeded);
        }

        let param = if handler.arity().takes_param(adding) {
            match param.filter(|p| !p.is_empty()) {
                Some(p) => Some(p),
                None => return Err(ModeError::NeedMoreParams(letter)),
            }
        } else {
            None
        };

        let mut param = handler.validate(channel, adding, param.as_deref())?;

        {
            let mut ctx = WatchContext {
                source,
                origin,
                channel: &*channel,
                letter,
                adding,
                param: &mut param,
                env,
            };
            self.watchers.before_change(&mut ctx)?;
        }

        let change = ModeChange {
            letter,
            adding,
            param,
        };
        let setter = match origin {
            Origin::Local => source.hostmask(),
            Origin::Remote => env.server_name.to_string(),
        };

        if !handler.commit(channel, &change, &setter) {
            return Err(ModeError::Unchanged(letter));
        }
        self.watchers.after_change(channel, &change);

        debug!(channel = %channel.name, change = %change, setter = %setter, "Mode committed");
        Ok(change)
    }
}
