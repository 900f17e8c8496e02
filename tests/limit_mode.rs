mod common;

use common::{alice, bob, carol, join_ok, manager};
use slircd_modecore::{ChannelError, ChannelManager, ModeChange, ModeError, Origin, UserContext};

async fn set_limit(manager: &ChannelManager, source: &UserContext, value: &str) -> Result<ModeChange, ModeError> {
    manager
        .apply_mode_change(source, "#a", ModeChange::plus('l', Some(value)), Origin::Local)
        .await
}

async fn modes(manager: &ChannelManager) -> String {
    manager.channel_info("#a").await.map(|info| info.modes).unwrap_or_default()
}

#[tokio::test]
async fn test_same_limit_is_a_silent_noop() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    assert!(set_limit(&manager, &alice, "10").await.is_ok());
    assert_eq!(set_limit(&manager, &alice, "10").await, Err(ModeError::Unchanged('l')));
    assert_eq!(sink.total(), 0);
    assert_eq!(modes(&manager).await, "+lnt 10");
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    assert_eq!(set_limit(&manager, &alice, "0").await, Err(ModeError::InvalidLimit("0".into())));
    assert_eq!(sink.codes_for("001"), vec![696]);
    assert_eq!(modes(&manager).await, "+nt");
}

#[tokio::test]
async fn test_negative_limit_wraps() {
    let (manager, _sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    let applied = set_limit(&manager, &alice, "-5").await.unwrap();
    assert_eq!(applied.param.as_deref(), Some("32767"));
}

#[tokio::test]
async fn test_trailing_junk_is_ignored() {
    let (manager, _sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    let applied = set_limit(&manager, &alice, "25users").await.unwrap();
    assert_eq!(applied.param.as_deref(), Some("25"));
}

#[tokio::test]
async fn test_removing_unset_limit_is_a_noop() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    let result = manager
        .apply_mode_change(&alice, "#a", ModeChange::minus('l', None), Origin::Local)
        .await;
    assert_eq!(result, Err(ModeError::Unchanged('l')));
    assert_eq!(sink.total(), 0);

    set_limit(&manager, &alice, "3").await.unwrap();
    let result = manager
        .apply_mode_change(&alice, "#a", ModeChange::minus('l', None), Origin::Local)
        .await;
    assert_eq!(result, Ok(ModeChange::minus('l', None)));
    assert_eq!(modes(&manager).await, "+nt");
}

#[tokio::test]
async fn test_limit_needs_parameter() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;

    let result = manager
        .apply_mode_change(&alice, "#a", ModeChange::plus('l', None), Origin::Local)
        .await;
    assert_eq!(result, Err(ModeError::NeedMoreParams('l')));
    assert_eq!(sink.codes_for("001"), vec![461]);
}

#[tokio::test]
async fn test_full_channel_refuses_join() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;
    join_ok(&manager, &carol(), "#a").await;
    set_limit(&manager, &alice, "2").await.unwrap();

    assert_eq!(manager.join(&bob(), "#a").await, Err(ChannelError::ChannelIsFull));
    assert_eq!(sink.codes_for("002"), vec![471]);
}

#[tokio::test]
async fn test_non_operator_cannot_set_limit() {
    let (manager, sink) = manager();
    let alice = alice();
    let bob = bob();
    join_ok(&manager, &alice, "#a").await;
    join_ok(&manager, &bob, "#a").await;

    assert_eq!(set_limit(&manager, &bob, "5").await, Err(ModeError::ChanOpPrivsNeeded));
    assert_eq!(sink.codes_for("002"), vec![482]);
}

#[tokio::test]
async fn test_unregistered_limit_is_ignored() {
    let (manager, _sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;
    set_limit(&manager, &alice, "1").await.unwrap();

    assert!(manager.registry().write().unregister('l').is_some());
    assert_eq!(modes(&manager).await, "+nt");
    join_ok(&manager, &bob(), "#a").await;

    let result = set_limit(&manager, &alice, "5").await;
    assert_eq!(result, Err(ModeError::UnknownMode('l')));
}
