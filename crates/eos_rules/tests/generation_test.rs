//! Tests for move generation and attack resolution.

use eos_rules::{
    AttackMode, Board, Cell, Piece, PieceId, PieceType, PlacedPiece, RuleEntry, Side,
    generate_attacks, generate_moves,
};
use std::collections::BTreeSet;

fn board_with(pieces: &[(Side, PieceType, &str)]) -> Board {
    Board::from_placements(pieces.iter().enumerate().map(|(i, &(side, ty, cell))| {
        PlacedPiece {
            piece: Piece::new(PieceId(i as u8), side, ty),
            cell: Some(Cell::parse(cell).unwrap()),
        }
    }))
    .unwrap()
}

fn cells(names: &[&str]) -> BTreeSet<Cell> {
    names.iter().map(|n| Cell::parse(n).unwrap()).collect()
}

#[test]
fn test_single_step_open_board_has_four_normal_moves() {
    let board = board_with(&[(Side::Player1, PieceType::Sentinel, "I7")]);
    let piece = board.piece(PieceId(0)).unwrap();
    let entry = RuleEntry::from_distances(&[1], &[1], &[]);

    let moves = generate_moves(piece, &entry, false, &board);
    assert_eq!(moves.normal, cells(&["H6", "H8", "J6", "J8"]));
}

#[test]
fn test_first_move_adds_development_at_two_to_four() {
    let board = board_with(&[(Side::Player1, PieceType::Steward, "I7")]);
    let piece = board.piece(PieceId(0)).unwrap();
    let entry = RuleEntry::from_distances(&[1], &[1], &[]);

    let moves = generate_moves(piece, &entry, true, &board);
    assert_eq!(moves.normal.len(), 4);
    assert_eq!(
        moves.advance,
        cells(&[
            "K9", "L10", "M11", "G9", "F10", "E11", "K5", "L4", "M3", "G5", "F4", "E3"
        ])
    );
    assert!(!moves.contains(Cell::parse("I7").unwrap()));
}

#[test]
fn test_range_two_attack_is_blocked_by_intermediate_piece() {
    let entry = RuleEntry::from_distances(&[1], &[2], &[]);

    let open = board_with(&[
        (Side::Player1, PieceType::Archer, "I7"),
        (Side::Player2, PieceType::Rider, "K9"),
    ]);
    let archer = open.piece(PieceId(0)).unwrap();
    let origin = Cell::parse("I7").unwrap();
    assert_eq!(
        generate_attacks(archer, Some(&entry), origin, &open, AttackMode::PreMove, false),
        cells(&["K9"])
    );

    let blocked = board_with(&[
        (Side::Player1, PieceType::Archer, "I7"),
        (Side::Player2, PieceType::Rider, "K9"),
        (Side::Player1, PieceType::Steward, "J8"),
    ]);
    let archer = blocked.piece(PieceId(0)).unwrap();
    assert!(
        generate_attacks(archer, Some(&entry), origin, &blocked, AttackMode::PreMove, false)
            .is_empty()
    );
}

#[test]
fn test_missing_entry_means_no_attacks_even_for_stewards() {
    let board = board_with(&[
        (Side::Player1, PieceType::Steward, "I7"),
        (Side::Player2, PieceType::Steward, "J8"),
    ]);
    let steward = board.piece(PieceId(0)).unwrap();
    let origin = Cell::parse("I7").unwrap();
    assert!(generate_attacks(steward, None, origin, &board, AttackMode::PreMove, true).is_empty());
}

#[test]
fn test_steward_reaches_two_before_first_move() {
    let board = board_with(&[
        (Side::Player1, PieceType::Steward, "I7"),
        (Side::Player2, PieceType::Steward, "K9"),
    ]);
    let steward = board.piece(PieceId(0)).unwrap();
    let origin = Cell::parse("I7").unwrap();
    let entry = RuleEntry::from_distances(&[1], &[1], &[]);

    let pre = generate_attacks(steward, Some(&entry), origin, &board, AttackMode::PreMove, true);
    assert_eq!(pre, cells(&["K9"]));
    let post = generate_attacks(steward, Some(&entry), origin, &board, AttackMode::PostMove, true);
    assert!(post.is_empty());
}

#[test]
fn test_generation_is_idempotent() {
    let game = eos_rules::Game::standard().unwrap();
    let board = game.state().board();
    let rules = game.rules();
    for (piece, cell) in board.live_pieces() {
        let entry = rules.resolve(piece.piece_type());
        let first = generate_moves(piece, entry, true, board);
        let second = generate_moves(piece, entry, true, board);
        assert_eq!(first, second);

        let attack_entry = rules.entry(piece.piece_type());
        let a = generate_attacks(piece, attack_entry, cell, board, AttackMode::PreMove, true);
        let b = generate_attacks(piece, attack_entry, cell, board, AttackMode::PreMove, true);
        assert_eq!(a, b);
    }
    assert_eq!(game.legal_actions(), game.legal_actions());
}

#[test]
fn test_opening_position_has_no_attacks() {
    let game = eos_rules::Game::standard().unwrap();
    for id in 0..18u8 {
        assert!(game.pre_move_candidates(PieceId(id)).attacks.is_empty());
    }
}
