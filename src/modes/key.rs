//! Channel key (`+k`).

use crate::error::ModeError;
use crate::state::Channel;

use super::{ModeChange, ModeHandler, ModeKind, ParamArity};

/// Longest accepted channel key.
pub const MAX_KEY_LEN: usize = 23;

/// Stores the channel key. Joins are not checked against it here; the
/// JOIN command's key argument never reaches this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMode;

impl ModeHandler for KeyMode {
    fn letter(&self) -> char {
        'k'
    }

    fn kind(&self) -> ModeKind {
        ModeKind::Param
    }

    fn arity(&self) -> ParamArity {
        ParamArity::Always
    }

    fn validate(
        &self,
        channel: &Channel,
        adding: bool,
        param: Option<&str>,
    ) -> Result<Option<String>, ModeError> {
        let key = param.unwrap_or_default();

        if !adding {
            // Any parameter unsets the key; the stored key is echoed back.
            return match channel.param('k') {
                Some(current) => Ok(Some(current.to_string())),
                None => Err(ModeError::Unchanged('k')),
            };
        }

        let key = self.normalize_param(key)?;
        if channel.param('k').is_some() {
            return Err(ModeError::KeySet);
        }
        Ok(Some(key))
    }

    fn normalize_param(&self, param: &str) -> Result<String, ModeError> {
        if param.is_empty() || param.len() > MAX_KEY_LEN || param.contains([' ', ',']) {
            return Err(ModeError::InvalidKey);
        }
        Ok(param.to_string())
    }

    fn commit(&self, channel: &mut Channel, change: &ModeChange, _setter: &str) -> bool {
        let value = if change.adding { change.param.clone() } else { None };
        channel.set_param('k', value)
    }
}
