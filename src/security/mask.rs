//! Extended ban mask grammar.
//!
//! A ban parameter is normalised into `nick!ident@host` plus an optional
//! `#channel` redirect target:
//!
//! ```text
//! nick!ident@host       -> nick!ident@host
//! nick!ident@host#chan  -> nick!ident@host#chan
//! nick@host#chan        -> *!nick@host#chan
//! nick!ident#chan       -> nick!ident@*#chan
//! nick#chan             -> nick!*@*#chan
//! ```
//!
//! Parameters with an extended-ban prefix (`X:...`) are left untouched.

use std::fmt;

/// Whether a ban parameter is an extended ban (`X:...`).
pub fn is_extban(raw: &str) -> bool {
    raw.as_bytes().get(1) == Some(&b':')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Nick = 0,
    Ident = 1,
    Host = 2,
    Channel = 3,
}

/// A hostmask ban split into its fields.
///
/// `channel` keeps its leading `#` and is empty when the ban does not redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedBanMask {
    pub nick: String,
    pub ident: String,
    pub host: String,
    pub channel: String,
}

/// Result of parsing a ban parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMask {
    /// Extended ban, passed through verbatim.
    Extended(String),
    Mask(ExtendedBanMask),
}

impl ParsedMask {
    /// The mask, unless this is an extended ban.
    pub fn as_mask(&self) -> Option<&ExtendedBanMask> {
        match self {
            Self::Extended(_) => None,
            Self::Mask(mask) => Some(mask),
        }
    }
}

impl fmt::Display for ParsedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extended(raw) => f.write_str(raw),
            Self::Mask(mask) => mask.fmt(f),
        }
    }
}

impl ExtendedBanMask {
    /// Parse a ban parameter. Extended bans come back as [`ParsedMask::Extended`].
    pub fn parse(raw: &str) -> ParsedMask {
        if is_extban(raw) {
            ParsedMask::Extended(raw.to_string())
        } else {
            ParsedMask::Mask(Self::parse_hostmask(raw))
        }
    }

    /// Split a hostmask ban into fields and normalise it.
    ///
    /// The scan only moves forward: `!` closes the nick, `@` closes the nick
    /// or ident, and `#` starts the channel from any earlier field. A `#`
    /// inside the channel field is part of the channel name.
    pub fn parse_hostmask(raw: &str) -> Self {
        let mut fields: [String; 4] = Default::default();
        let mut current = Field::Nick;
        let mut start = 0;

        for (i, c) in raw.char_indices() {
            let next = match (c, current) {
                ('!', Field::Nick) => Some((Field::Ident, i + 1)),
                ('@', Field::Nick | Field::Ident) => Some((Field::Host, i + 1)),
                ('#', field) if field != Field::Channel => Some((Field::Channel, i)),
                _ => None,
            };
            if let Some((field, next_start)) = next {
                fields[current as usize] = raw[start..i].to_string();
                current = field;
                start = next_start;
            }
        }
        fields[current as usize] = raw[start..].to_string();

        let [mut nick, mut ident, mut host, channel] = fields;

        // "user@host" names the ident, not the nick.
        if !nick.is_empty() && !host.is_empty() && ident.is_empty() {
            std::mem::swap(&mut nick, &mut ident);
        }
        for field in [&mut nick, &mut ident, &mut host] {
            if field.is_empty() {
                field.push('*');
            }
        }

        Self {
            nick,
            ident,
            host,
            channel,
        }
    }

    /// `nick!ident@host`, without the redirect target.
    pub fn hostmask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.ident, self.host)
    }

    /// The redirect target, if any.
    pub fn redirect(&self) -> Option<&str> {
        (!self.channel.is_empty()).then_some(self.channel.as_str())
    }
}

impl fmt::Display for ExtendedBanMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}{}", self.nick, self.ident, self.host, self.channel)
    }
}
