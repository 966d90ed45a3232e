//! End-to-end tests driving the engine through the service façade.

use board_core::{Color, PieceKind, Square};
use game_engine::{GameError, GameId, GameService, GameStatus, MoveError, PlayerId, ServiceError};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn fresh_game(service: &GameService) -> (GameId, PlayerId, PlayerId) {
    let game = service.create_game();
    let alice = service.add_player(game, "Alice", Color::White).unwrap();
    let bob = service.add_player(game, "Bob", Color::Black).unwrap();
    service.start_game(game).unwrap();
    (game, alice, bob)
}

#[test]
fn started_game_has_standard_position() {
    // Start with Alice as white and Bob as black: active game, Alice
    // to move, 32 pieces in the standard layout.
    let service = GameService::new();
    let (game, _, _) = fresh_game(&service);

    let snapshot = service.position_snapshot(game).unwrap();
    assert_eq!(snapshot.len(), 32);
    assert_eq!(
        service.placement_notation(game).unwrap(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    );
}

#[test]
fn opening_pawn_push() {
    let service = GameService::new();
    let (game, alice, _) = fresh_game(&service);

    let record = service.submit_move(game, alice, sq("e2"), sq("e4")).unwrap();
    assert_eq!(record.notation(), "e4");

    let snapshot = service.position_snapshot(game).unwrap();
    assert!(!snapshot.contains_key("e2"));
    assert_eq!(snapshot["e4"].kind, PieceKind::Pawn);
    assert_eq!(snapshot["e4"].color, Color::White);
}

#[test]
fn turn_is_enforced_from_the_first_move() {
    let service = GameService::new();
    let (game, _, bob) = fresh_game(&service);

    let before = service.placement_notation(game).unwrap();
    let err = service
        .submit_move(game, bob, sq("e7"), sq("e5"))
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Game(GameError::Move(MoveError::NotYourTurn))
    );
    assert_eq!(err.to_string(), "not current player's turn");

    assert_eq!(service.placement_notation(game).unwrap(), before);
    assert!(service.move_history(game).unwrap().is_empty());
}

#[test]
fn zero_distance_move_is_structurally_rejected() {
    let service = GameService::new();
    let (game, alice, _) = fresh_game(&service);

    let err = service
        .submit_move(game, alice, sq("e2"), sq("e2"))
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Game(GameError::Move(MoveError::SamePosition))
    );
}

#[test]
fn base_rule_lets_rook_pass_over_pieces() {
    let service = GameService::new();
    let (game, alice, _) = fresh_game(&service);

    let record = service.submit_move(game, alice, sq("a1"), sq("a4")).unwrap();
    assert_eq!(record.notation(), "Ra4");
}

#[test]
fn turn_alternation_over_many_moves() {
    let service = GameService::new();
    let (game, alice, bob) = fresh_game(&service);

    // Shuttle knights so the position stays replayable.
    let plies = [
        ("g1", "f3"),
        ("g8", "f6"),
        ("f3", "g1"),
        ("f6", "g8"),
        ("g1", "f3"),
        ("g8", "f6"),
    ];
    for (n, (from, to)) in plies.into_iter().enumerate() {
        let mover = if n % 2 == 0 { alice } else { bob };
        service.submit_move(game, mover, sq(from), sq(to)).unwrap();
    }
    // Six plies played: white to move again.
    let err = service
        .submit_move(game, bob, sq("f6"), sq("g8"))
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Game(GameError::Move(MoveError::NotYourTurn))
    );
    assert_eq!(service.move_history(game).unwrap().len(), 6);
}

#[test]
fn snapshot_always_matches_ledgered_mutations() {
    let service = GameService::new();
    let (game, alice, bob) = fresh_game(&service);

    service.submit_move(game, alice, sq("e2"), sq("e4")).unwrap();
    service.submit_move(game, bob, sq("d7"), sq("d5")).unwrap();
    service.submit_move(game, alice, sq("e4"), sq("d5")).unwrap();

    let snapshot = service.position_snapshot(game).unwrap();
    // One capture: 31 occupied squares, every key well-formed.
    assert_eq!(snapshot.len(), 31);
    for key in snapshot.keys() {
        assert!(Square::from_algebraic(key).is_some(), "bad key {key}");
    }
    assert_eq!(snapshot["d5"].color, Color::White);
    assert_eq!(snapshot["d5"].kind, PieceKind::Pawn);

    let history = service.move_history(game).unwrap();
    let notations: Vec<_> = history.iter().map(|m| m.notation()).collect();
    assert_eq!(notations, ["e4", "d5", "exd5"]);
}

#[test]
fn rejected_moves_change_nothing() {
    let service = GameService::new();
    let (game, alice, bob) = fresh_game(&service);
    service.submit_move(game, alice, sq("e2"), sq("e4")).unwrap();

    let snapshot_before = service.position_snapshot(game).unwrap();
    let history_before = service.move_history(game).unwrap();

    // One rejection per pipeline step.
    let attempts = [
        (bob, "e7", "e7"),  // structural
        (bob, "e6", "e5"),  // vacant origin
        (bob, "e4", "e5"),  // not the owner
        (alice, "d2", "d4"), // out of turn
        (bob, "e7", "d8"),  // friendly destination
    ];
    for (player, from, to) in attempts {
        assert!(service.submit_move(game, player, sq(from), sq(to)).is_err());
    }

    assert_eq!(service.position_snapshot(game).unwrap(), snapshot_before);
    assert_eq!(service.move_history(game).unwrap(), history_before);
    // Turn pointer untouched: Bob can still make his reply.
    service.submit_move(game, bob, sq("e7"), sq("e5")).unwrap();
}

#[test]
fn inactive_games_reject_moves() {
    let service = GameService::new();
    let (game, alice, _) = fresh_game(&service);
    service.complete_game(game).unwrap();

    let err = service
        .submit_move(game, alice, sq("e2"), sq("e4"))
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Game(GameError::Move(MoveError::GameNotActive))
    );
}

#[test]
fn start_preconditions_reported_not_fatal() {
    let service = GameService::new();
    let game = service.create_game();
    assert_eq!(
        service.start_game(game),
        Err(ServiceError::Game(GameError::MissingPlayers))
    );

    service.add_player(game, "Alice", Color::White).unwrap();
    assert_eq!(
        service.start_game(game),
        Err(ServiceError::Game(GameError::MissingPlayers))
    );
    assert_eq!(
        service.add_player(game, "Eve", Color::White),
        Err(ServiceError::Game(GameError::ColorTaken(Color::White)))
    );

    service.add_player(game, "Bob", Color::Black).unwrap();
    service.start_game(game).unwrap();
    assert_eq!(
        service.start_game(game),
        Err(ServiceError::Game(GameError::NotPending))
    );
}

#[test]
fn capture_excludes_piece_from_all_views() {
    let service = GameService::new();
    let (game, alice, bob) = fresh_game(&service);

    service.submit_move(game, alice, sq("e2"), sq("e4")).unwrap();
    service.submit_move(game, bob, sq("d7"), sq("d5")).unwrap();
    service.submit_move(game, alice, sq("e4"), sq("d5")).unwrap();

    // The captured pawn is gone from the snapshot and the placement
    // notation agrees with the cache-derived view.
    let snapshot = service.position_snapshot(game).unwrap();
    let placement = service.placement_notation(game).unwrap();
    let occupied: usize = placement
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .count();
    assert_eq!(occupied, snapshot.len());
}

#[test]
fn abandoned_game_is_terminal() {
    let service = GameService::new();
    let (game, alice, _) = fresh_game(&service);
    service.abandon_game(game).unwrap();
    assert_eq!(
        service.abandon_game(game),
        Err(ServiceError::Game(GameError::NotActive))
    );
    assert!(service
        .submit_move(game, alice, sq("e2"), sq("e4"))
        .is_err());
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_value(GameStatus::Active).unwrap();
    assert_eq!(json, "active");
}
