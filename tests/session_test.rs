//! Session seating, turn ownership and outcomes.

use eos::{SessionError, SessionManager};
use eos_rules::{Action, Cell, IllegalAction, PieceId, Side, TurnPhase, WinCondition, Winner};

fn seated() -> (SessionManager, String) {
    let manager = SessionManager::standard().unwrap();
    let id = manager.create_session(None).unwrap();
    manager
        .register_player(&id, "alice".into(), "Alice".into())
        .unwrap();
    manager
        .register_player(&id, "bob".into(), "Bob".into())
        .unwrap();
    (manager, id)
}

#[test]
fn test_players_take_seats_in_order() {
    let manager = SessionManager::standard().unwrap();
    let id = manager.create_session(Some("table".into())).unwrap();
    assert_eq!(id, "table");

    let first = manager.register_player(&id, "alice".into(), "Alice".into()).unwrap();
    let second = manager.register_player(&id, "bob".into(), "Bob".into()).unwrap();
    assert_eq!(first.side, Side::Player1);
    assert_eq!(second.side, Side::Player2);

    let third = manager.register_player(&id, "carol".into(), "Carol".into());
    assert!(matches!(third, Err(SessionError::SeatsTaken)));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let manager = SessionManager::standard().unwrap();
    manager.create_session(Some("table".into())).unwrap();
    assert!(matches!(
        manager.create_session(Some("table".into())),
        Err(SessionError::SessionExists { .. })
    ));

    manager.register_player("table", "alice".into(), "Alice".into()).unwrap();
    assert!(matches!(
        manager.register_player("table", "alice".into(), "Again".into()),
        Err(SessionError::DuplicatePlayer { .. })
    ));
}

#[test]
fn test_generated_ids_are_distinct() {
    let manager = SessionManager::standard().unwrap();
    let a = manager.create_session(None).unwrap();
    let b = manager.create_session(None).unwrap();
    assert_ne!(a, b);
    assert_eq!(manager.list_sessions().len(), 2);
}

#[test]
fn test_only_the_side_to_move_may_act() {
    let (manager, id) = seated();

    let err = manager
        .act(&id, "bob", Action::Select { piece: PieceId(28) })
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotYourTurn {
            waiting_for: Side::Player1
        }
    ));

    let err = manager
        .act(&id, "mallory", Action::EndTurn)
        .unwrap_err();
    assert!(matches!(err, SessionError::UnknownPlayer { .. }));
}

#[test]
fn test_full_turn_hands_over_to_opponent() {
    let (manager, id) = seated();

    manager.act(&id, "alice", Action::Select { piece: PieceId(10) }).unwrap();
    let snapshot = manager
        .act(&id, "alice", Action::Move { to: Cell::parse("C3").unwrap() })
        .unwrap();
    assert_eq!(snapshot.turn_phase, TurnPhase::Locked);

    let snapshot = manager.act(&id, "alice", Action::EndTurn).unwrap();
    assert_eq!(snapshot.current_turn, Side::Player2);
    assert_eq!(snapshot.turn_number, 2);
    assert_eq!(snapshot.move_log.len(), 1);

    manager.act(&id, "bob", Action::Select { piece: PieceId(28) }).unwrap();
}

#[test]
fn test_illegal_action_leaves_session_unchanged() {
    let (manager, id) = seated();
    let before = manager.snapshot(&id).unwrap();

    let err = manager
        .act(&id, "alice", Action::Select { piece: PieceId(28) })
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Illegal(IllegalAction::NotYourPiece { .. })
    ));
    assert_eq!(manager.snapshot(&id).unwrap(), before);
}

#[test]
fn test_resignation_ends_game() {
    let (manager, id) = seated();

    let snapshot = manager.resign(&id, "alice").unwrap();
    let victory = snapshot.winner.unwrap();
    assert_eq!(victory.winner, Winner::Player(Side::Player2));
    assert_eq!(victory.condition, WinCondition::Resignation);

    let err = manager.act(&id, "alice", Action::EndTurn).unwrap_err();
    assert!(matches!(err, SessionError::GameOver));
    assert!(matches!(
        manager.resign(&id, "bob"),
        Err(SessionError::GameOver)
    ));
}

#[test]
fn test_timeout_awards_opponent_and_scores() {
    let (manager, id) = seated();

    manager.timeout(&id, Side::Player2).unwrap();
    let scores = manager.scores(&id).unwrap();
    assert_eq!(scores.player1.win_bonus, 30);
    assert_eq!(scores.player1.total, 30);
    assert_eq!(scores.player2.total, 0);
}

#[test]
fn test_unknown_session() {
    let manager = SessionManager::standard().unwrap();
    assert!(matches!(
        manager.snapshot("nope"),
        Err(SessionError::SessionNotFound { .. })
    ));
    assert!(manager.get_session("nope").is_none());
}

#[test]
fn test_removed_session_is_gone() {
    let (manager, id) = seated();
    manager.resign(&id, "bob").unwrap();

    let removed = manager.remove_session(&id).unwrap();
    assert!(removed.game.state().is_over());
    assert!(manager.list_sessions().is_empty());
    assert!(matches!(
        manager.snapshot(&id),
        Err(SessionError::SessionNotFound { .. })
    ));
    assert!(matches!(
        manager.remove_session(&id),
        Err(SessionError::SessionNotFound { .. })
    ));

    // The id is free again.
    assert_eq!(manager.create_session(Some(id.clone())).unwrap(), id);
}
