mod common;

use common::{alice, bob, join_ok, manager};
use slircd_modecore::{JoinOutcome, ModeChange, ModeError, Origin};

#[tokio::test]
async fn test_equal_ts_higher_limit_wins() {
    let (manager, sink) = manager();
    let alice = alice();
    join_ok(&manager, &alice, "#a").await;
    manager
        .apply_mode_change(&alice, "#a", ModeChange::plus('l', Some("50")), Origin::Local)
        .await
        .unwrap();

    let winner = manager
        .resolve_netmerge_conflict('l', "#a", 100, 100, "75", "50")
        .await;
    assert_eq!(winner, Ok("75".to_string()));
    assert_eq!(manager.channel_info("#a").await.unwrap().modes, "+lnt 75");
    assert_eq!(sink.total(), 0);
}

#[tokio::test]
async fn test_both_sides_agree() {
    let (manager, _sink) = manager();
    join_ok(&manager, &alice(), "#a").await;

    // The remote side sees the same pair with the roles swapped.
    let here = manager.resolve_netmerge_conflict('l', "#a", 100, 100, "75", "50").await;
    let there = manager.resolve_netmerge_conflict('l', "#a", 100, 100, "50", "75").await;
    assert_eq!(here, there);
}

#[tokio::test]
async fn test_older_channel_wins() {
    let (manager, _sink) = manager();
    join_ok(&manager, &alice(), "#a").await;

    let winner = manager.resolve_netmerge_conflict('l', "#a", 90, 100, "10", "500").await;
    assert_eq!(winner, Ok("10".to_string()));
}

#[tokio::test]
async fn test_modes_without_policy() {
    let (manager, _sink) = manager();
    join_ok(&manager, &alice(), "#a").await;

    assert_eq!(
        manager.resolve_netmerge_conflict('b', "#a", 1, 1, "x!*@*", "y!*@*").await,
        Err(ModeError::NoConflictPolicy('b'))
    );
    assert_eq!(
        manager.resolve_netmerge_conflict('l', "#missing", 1, 1, "1", "2").await,
        Err(ModeError::NoSuchChannel("#missing".into()))
    );
}

#[tokio::test]
async fn test_unstorable_limit_never_locks_the_channel() {
    let (manager, _sink) = manager();
    join_ok(&manager, &alice(), "#a").await;

    assert_eq!(
        manager.resolve_netmerge_conflict('l', "#a", 90, 100, "0", "").await,
        Err(ModeError::InvalidLimit("0".into()))
    );
    assert_eq!(manager.channel_info("#a").await.unwrap().modes, "+nt");
    assert_eq!(manager.join(&bob(), "#a").await, Ok(JoinOutcome::Joined));

    let winner = manager.resolve_netmerge_conflict('l', "#a", 90, 100, "-1", "5").await;
    assert_eq!(winner, Ok("32767".to_string()));
    assert_eq!(manager.channel_info("#a").await.unwrap().modes, "+lnt 32767");
}
