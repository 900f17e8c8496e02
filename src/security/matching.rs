//! Hostmask matching for channel bans.
//!
//! Plain wildcard masks go through [`wildcard_match`], which folds case per
//! RFC 1459. Masks with a CIDR host are matched against the user's IP.

use std::net::IpAddr;

use ipnet::IpNet;

pub use slirc_proto::wildcard_match;

/// Match `nick!user@ip` against a mask whose host part may be CIDR notation.
///
/// Masks without a `/` in the host fall back to [`wildcard_match`].
pub fn cidr_match(mask: &str, text: &str) -> bool {
    let (Some((mask_user, mask_host)), Some((text_user, text_host))) =
        (mask.rsplit_once('@'), text.rsplit_once('@'))
    else {
        return wildcard_match(mask, text);
    };

    if !mask_host.contains('/') {
        return wildcard_match(mask, text);
    }

    match (mask_host.parse::<IpNet>(), text_host.parse::<IpAddr>()) {
        (Ok(net), Ok(ip)) => net.contains(&ip) && wildcard_match(mask_user, text_user),
        _ => false,
    }
}
