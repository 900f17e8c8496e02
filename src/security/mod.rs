//! Ban masks, matching and redirection.
//!
//! - **Mask**: the extended ban mask grammar (`nick!ident@host#channel`)
//! - **Matching**: wildcard and CIDR hostmask matching
//! - **Redirect**: per-channel redirect entries and the `+b` watcher that
//!   maintains them

pub mod mask;
pub mod matching;
pub mod redirect;

pub use mask::{ExtendedBanMask, ParsedMask, is_extban};
pub use matching::{cidr_match, wildcard_match};
pub use redirect::{BanRedirectEntry, BanRedirectWatcher};

pub(crate) use redirect::BanRedirectList;
