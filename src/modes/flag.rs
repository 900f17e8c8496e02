//! Boolean channel modes (`+n`, `+t`, `+i`, `+m`, `+s`, `+p`).

use crate::error::ModeError;
use crate::state::Channel;

use super::{ModeChange, ModeHandler, ModeKind, ParamArity};

/// A mode that is simply on or off.
///
/// Flags only carry state here. Whatever `+i`, `+m` and friends restrict is
/// checked by the embedding server.
#[derive(Debug, Clone, Copy)]
pub struct FlagMode {
    letter: char,
}

impl FlagMode {
    pub const fn new(letter: char) -> Self {
        Self { letter }
    }
}

impl ModeHandler for FlagMode {
    fn letter(&self) -> char {
        self.letter
    }

    fn kind(&self) -> ModeKind {
        ModeKind::Flag
    }

    fn arity(&self) -> ParamArity {
        ParamArity::None
    }

    fn validate(
        &self,
        channel: &Channel,
        adding: bool,
        _param: Option<&str>,
    ) -> Result<Option<String>, ModeError> {
        if channel.is_mode_set(self.letter) == adding {
            return Err(ModeError::Unchanged(self.letter));
        }
        Ok(None)
    }

    fn commit(&self, channel: &mut Channel, change: &ModeChange, _setter: &str) -> bool {
        channel.set_flag(self.letter, change.adding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_toggle() {
        let mode = FlagMode::new('m');
        let mut channel = Channel::new("#test", 0, 64);

        assert_eq!(mode.validate(&channel, true, None), Ok(None));
        assert!(mode.commit(&mut channel, &ModeChange::plus('m', None), "alice"));
        assert!(channel.is_mode_set('m'));

        assert_eq!(mode.validate(&channel, true, None), Err(ModeError::Unchanged('m')));
        assert_eq!(mode.validate(&channel, false, None), Ok(None));
    }
}
