//! Ban list (`+b`).

use slirc_proto::irc_eq;

use crate::collab::current_timestamp;
use crate::error::ModeError;
use crate::state::{Channel, ListEntry};

use super::{ModeChange, ModeHandler, ModeKind, ParamArity};

#[derive(Debug, Clone, Copy, Default)]
pub struct BanMode;

impl ModeHandler for BanMode {
    fn letter(&self) -> char {
        'b'
    }

    fn kind(&self) -> ModeKind {
        ModeKind::List
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
        // Capacity covers extended bans too, so it is checked before any
        // watcher gets to look at the mask.
        if adding && channel.bans.len() >= channel.max_bans {
            return Err(ModeError::BanListFull {
                max: channel.max_bans,
            });
        }
        Ok(param.map(str::to_string))
    }

    fn commit(&self, channel: &mut Channel, change: &ModeChange, setter: &str) -> bool {
        let Some(mask) = change.param.as_deref() else {
            return false;
        };

        if change.adding {
            if channel.bans.iter().any(|ban| irc_eq(&ban.mask, mask)) {
                return false;
            }
            channel.bans.push(ListEntry {
                mask: mask.to_string(),
                set_by: setter.to_string(),
                set_at: current_timestamp(),
            });
            true
        } else {
            let before = channel.bans.len();
            channel.bans.retain(|ban| !irc_eq(&ban.mask, mask));
            channel.bans.len() != before
        }
    }
}
