//! Integration test common infrastructure.
//!
//! Provides a numeric sink that records every reply, user constructors and
//! channel manager builders.

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use slircd_modecore::{ChannelManager, Collaborators, Config, JoinOutcome, Numeric, NumericSink, UserContext};

/// One numeric reply as the host server would have sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNumeric {
    pub uid: String,
    pub numeric: Numeric,
    pub params: Vec<String>,
}

/// Numeric sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentNumeric>>,
}

impl RecordingSink {
    /// Numeric codes sent to `uid`, in order.
    pub fn codes_for(&self, uid: &str) -> Vec<u16> {
        self.sent
            .lock()
            .iter()
            .filter(|n| n.uid == uid)
            .map(|n| n.numeric.code())
            .collect()
    }

    pub fn sent_to(&self, uid: &str) -> Vec<SentNumeric> {
        self.sent.lock().iter().filter(|n| n.uid == uid).cloned().collect()
    }

    pub fn total(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl NumericSink for RecordingSink {
    fn send_numeric(&self, uid: &str, numeric: Numeric, params: Vec<String>) {
        self.sent.lock().push(SentNumeric {
            uid: uid.to_string(),
            numeric,
            params,
        });
    }
}

pub fn user(uid: &str, nick: &str, host: &str, ip: &str) -> UserContext {
    let ip: IpAddr = ip.parse().expect("test IP must parse");
    UserContext::new(uid, nick, nick, host, ip)
}

pub fn alice() -> UserContext {
    user("001", "alice", "good.example", "192.0.2.10")
}

pub fn bob() -> UserContext {
    user("002", "bob", "evil.host", "203.0.113.7")
}

pub fn carol() -> UserContext {
    user("003", "carol", "other.example", "198.51.100.3")
}

pub fn manager_with(config: Config) -> (ChannelManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let manager = ChannelManager::new(config, Collaborators::new(sink.clone())).expect("valid config");
    (manager, sink)
}

pub fn manager() -> (ChannelManager, Arc<RecordingSink>) {
    manager_with(Config::default())
}

/// Join and assert the user landed in `channel` directly.
pub async fn join_ok(manager: &ChannelManager, user: &UserContext, channel: &str) {
    let outcome = manager.join(user, channel).await;
    assert_eq!(outcome, Ok(JoinOutcome::Joined), "{} joining {}", user.nickname, channel);
}
