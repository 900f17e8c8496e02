//! Netmerge conflict resolution for single-parameter modes.
//!
//! When two servers link and disagree about a mode's parameter, both run the
//! handler's policy over the same inputs and commit the same winner.

use tracing::{info, warn};

use crate::error::ModeError;
use crate::modes::{ConflictWinner, ModeChange, ModeKind, ModeRegistry};
use crate::state::Channel;

/// Timestamped parameters from each side of a netmerge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictInput {
    pub letter: char,
    pub their_ts: i64,
    pub our_ts: i64,
    pub theirs: String,
    pub ours: String,
}

/// Pick the winning parameter for `input.letter` and commit it to `channel`.
///
/// Only [`ModeKind::Param`] modes have a conflict policy; list and flag
/// modes merge by union upstream of the core. Returns the winning value.
pub fn resolve_conflict(
    registry: &ModeRegistry,
    channel: &mut Channel,
    input: &ConflictInput,
    setter: &str,
) -> Result<String, ModeError> {
    let handler = registry.lookup(input.letter)?;
    if handler.kind() != ModeKind::Param {
        return Err(ModeError::NoConflictPolicy(input.letter));
    }
    if !handler.symmetric() {
        warn!(channel = %channel.name, mode = %input.letter, "Asymmetric conflict policy; sides may diverge");
    }

    let (winner, loser) = match handler.resolve_conflict(input.their_ts, input.our_ts, &input.theirs, &input.ours) {
        ConflictWinner::Theirs => (&input.theirs, &input.ours),
        ConflictWinner::Ours => (&input.ours, &input.theirs),
    };

    // An unstorable winner yields to the other side; both servers see the
    // same pair, so they still agree.
    let value = match handler.normalize_param(winner) {
        Ok(value) => value,
        Err(err) => {
            warn!(channel = %channel.name, mode = %input.letter, winner = %winner, error = %err, "Netmerge winner is not storable");
            handler.normalize_param(loser)?
        }
    };

    // The winner is committed even if the channel already holds it.
    handler.commit(channel, &ModeChange::plus(input.letter, Some(value.as_str())), setter);

    info!(
        channel = %channel.name,
        mode = %input.letter,
        theirs = %input.theirs,
        ours = %input.ours,
        winner = %value,
        "Netmerge conflict resolved"
    );
    Ok(value)
}
