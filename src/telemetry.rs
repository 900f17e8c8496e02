//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` when `RUST_LOG` is unset or invalid.
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Standardized span constructors for mode core observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for a mode change on a channel.
    pub fn mode_change(channel: &str, source: &str, letter: char, adding: bool) -> Span {
        let sign = if adding { '+' } else { '-' };
        info_span!("mode_change", channel = %channel, source = %source, mode = %format_args!("{sign}{letter}"))
    }

    /// Create a span for a join attempt.
    pub fn join(uid: &str, channel: &str) -> Span {
        info_span!("join", uid = %uid, channel = %channel)
    }

    /// Create a span for a netmerge conflict resolution.
    pub fn netmerge(channel: &str, letter: char) -> Span {
        info_span!("netmerge", channel = %channel, mode = %letter)
    }
}
