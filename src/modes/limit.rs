//! Channel member limit (`+l`).

use crate::error::ModeError;
use crate::state::Channel;

use super::{ConflictWinner, ModeChange, ModeHandler, ModeKind, ParamArity};

/// Stored limit for a negative `+l` parameter.
pub const LIMIT_WRAP: i64 = 0x7FFF;

/// Parse a limit the way C `atoi` does.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and anything unparsable is 0. Overflow saturates.
pub fn parse_limit(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));

    if negative { -magnitude } else { magnitude }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LimitMode;

impl ModeHandler for LimitMode {
    fn letter(&self) -> char {
        'l'
    }

    fn kind(&self) -> ModeKind {
        ModeKind::Param
    }

    fn arity(&self) -> ParamArity {
        ParamArity::OnSet
    }

    fn validate(
        &self,
        channel: &Channel,
        adding: bool,
        param: Option<&str>,
    ) -> Result<Option<String>, ModeError> {
        let current = channel.param('l').filter(|value| !value.is_empty());

        if !adding {
            return match current {
                Some(_) => Ok(None),
                None => Err(ModeError::Unchanged('l')),
            };
        }

        let limit = self.normalize_param(param.unwrap_or_default())?;
        if current.map(parse_limit).is_some_and(|old| old != 0 && old == parse_limit(&limit)) {
            return Err(ModeError::Unchanged('l'));
        }

        Ok(Some(limit))
    }

    /// Negative limits wrap to [`LIMIT_WRAP`]; zero is refused.
    fn normalize_param(&self, param: &str) -> Result<String, ModeError> {
        let limit = match parse_limit(param) {
            0 => return Err(ModeError::InvalidLimit(param.to_string())),
            n if n < 0 => LIMIT_WRAP,
            n => n,
        };
        Ok(limit.to_string())
    }

    fn commit(&self, channel: &mut Channel, change: &ModeChange, _setter: &str) -> bool {
        let value = if change.adding { change.param.clone() } else { None };
        channel.set_param('l', value)
    }

    /// The earlier change wins; at equal timestamps the higher limit wins.
    fn resolve_conflict(
        &self,
        their_ts: i64,
        our_ts: i64,
        theirs: &str,
        ours: &str,
    ) -> ConflictWinner {
        if their_ts != our_ts {
            return if their_ts < our_ts {
                ConflictWinner::Theirs
            } else {
                ConflictWinner::Ours
            };
        }

        if parse_limit(theirs) > parse_limit(ours) {
            ConflictWinner::Theirs
        } else {
            ConflictWinner::Ours
        }
    }
}
