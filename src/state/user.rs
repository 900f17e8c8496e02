//! The user identity the core matches bans against.

use std::net::IpAddr;

/// Unique user identifier assigned by the embedding server.
pub type Uid = String;

/// Snapshot of a user's identity at the time of a mode change or join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub uid: Uid,
    pub nickname: String,
    pub username: String,
    /// Host shown to other users (possibly cloaked).
    pub hostname: String,
    /// Real resolved host.
    pub realhost: String,
    pub ip: IpAddr,
}

impl UserContext {
    /// Create a user context whose displayed and real hosts are the same.
    pub fn new(
        uid: impl Into<Uid>,
        nickname: impl Into<String>,
        username: impl Into<String>,
        hostname: impl Into<String>,
        ip: IpAddr,
    ) -> Self {
        let hostname = hostname.into();
        Self {
            uid: uid.into(),
            nickname: nickname.into(),
            username: username.into(),
            realhost: hostname.clone(),
            hostname,
            ip,
        }
    }

    /// Set a real host that differs from the displayed one.
    pub fn with_realhost(mut self, realhost: impl Into<String>) -> Self {
        self.realhost = realhost.into();
        self
    }

    /// `nick!user@host` with the displayed host.
    pub fn hostmask(&self) -> String {
        format!("{}!{}@{}", self.nickname, self.username, self.hostname)
    }

    /// `nick!user@realhost`.
    pub fn real_hostmask(&self) -> String {
        format!("{}!{}@{}", self.nickname, self.username, self.realhost)
    }

    /// `nick!user@ip`, matched against CIDR bans.
    pub fn ip_hostmask(&self) -> String {
        format!("{}!{}@{}", self.nickname, self.username, self.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostmask_forms() {
        let user = UserContext::new("001AAAAAA", "bob", "~bob", "cloak.example", "192.0.2.1".parse().unwrap())
            .with_realhost("dsl.isp.example");
        assert_eq!(user.hostmask(), "bob!~bob@cloak.example");
        assert_eq!(user.real_hostmask(), "bob!~bob@dsl.isp.example");
        assert_eq!(user.ip_hostmask(), "bob!~bob@192.0.2.1");
    }
}
