/// Persistence integration tests
///
/// Whole-archive snapshot round-trips through the MessagePack format.
/// Run with: cargo test --test persistence_integration_tests
use leadertrack::{Archive, GameMode, RawPayload};
use serde_json::json;

fn payload(fields: serde_json::Value) -> RawPayload {
    fields.as_object().cloned().unwrap()
}

#[test]
fn test_archive_roundtrip_preserves_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.mpk");

    let mut archive = Archive::new();
    let board = archive.board_mut(GameMode::BattleRoyale);
    board.observe_at(
        "alice",
        payload(json!({
            "nickname": "alice",
            "matches": 10,
            "kills": 5,
            "deaths": 1,
            "score": 100,
            "flight_time": "2:00:00",
        })),
        "2026-08-01".parse().unwrap(),
    );
    board.observe_at(
        "alice",
        payload(json!({
            "matches": 14,
            "kills": 9,
            "deaths": 2,
            "score": 160,
            "flight_time": "3:30:00",
            "ship": [{"name": "Sabre", "ratio": 0.6}],
        })),
        "2026-08-03".parse().unwrap(),
    );
    archive.board_mut(GameMode::VanduulSwarmCoop).observe_at(
        "carol",
        payload(json!({"nickname": "carol", "matches": 2, "flight_time": -1})),
        "2026-08-02".parse().unwrap(),
    );

    archive.save(&path).unwrap();
    let restored = Archive::load(&path).unwrap();

    let mut modes = restored.modes();
    modes.sort_by_key(|m| m.code());
    assert_eq!(modes, vec![GameMode::BattleRoyale, GameMode::VanduulSwarmCoop]);

    let board = restored.board(GameMode::BattleRoyale).unwrap();
    let alice = board.pilot("alice").unwrap();
    assert_eq!(alice.matches(), Some(14));
    assert_eq!(alice.favorite_ship(), Some(("Sabre".to_string(), 0.6)));
    assert_eq!(alice.last_observed(), "2026-08-03".parse::<chrono::NaiveDate>().unwrap());

    let dates = board.history_dates();
    assert_eq!(dates, vec!["2026-08-03".parse::<chrono::NaiveDate>().unwrap()]);
    let delta = &board.deltas_on(dates[0]).unwrap()["alice"];
    assert_eq!(delta.matches, 4);
    assert_eq!(delta.kills, 4);
    assert_eq!(delta.score, 60);
    assert!((delta.flight_time.unwrap() - 1.5).abs() < 1e-9);

    let carol = restored
        .board(GameMode::VanduulSwarmCoop)
        .unwrap()
        .pilot("carol")
        .unwrap();
    assert_eq!(carol.flight_time().unwrap(), Some(0.0));
}

#[test]
fn test_reloaded_archive_continues_incrementally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.mpk");

    let mut archive = Archive::new();
    archive.board_mut(GameMode::SquadronBattle).observe_at(
        "bob",
        payload(json!({"nickname": "bob", "matches": 5, "score": 50})),
        "2026-08-01".parse().unwrap(),
    );
    archive.save(&path).unwrap();

    // A later process picks up where the first left off.
    let mut archive = Archive::load(&path).unwrap();
    let board = archive.board_mut(GameMode::SquadronBattle);
    let outcome = board.observe_at(
        "bob",
        payload(json!({"matches": 6, "score": 75})),
        "2026-08-02".parse().unwrap(),
    );

    assert!(!outcome.inserted);
    assert!(outcome.delta_created);
    let delta = &board.deltas_on("2026-08-02".parse().unwrap()).unwrap()["bob"];
    assert_eq!(delta.matches, 1);
    assert_eq!(delta.score, 25);
}
