//! Ranged attack resolution along the four diagonals.

use crate::board::Board;
use crate::coord::{Cell, Direction};
use crate::rule_table::RuleEntry;
use crate::types::{Piece, PieceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// When attacks are being evaluated relative to the piece's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackMode {
    /// Before the piece has moved this turn.
    PreMove,
    /// After a move or capture, for chain continuation.
    PostMove,
}

/// Ranges a piece may attack at, after type-specific substitution.
///
/// Stewards ignore the table: `{1, 2}` before their first move in
/// [`AttackMode::PreMove`], `{1}` otherwise. A missing entry means no range.
pub fn effective_range(
    piece_type: PieceType,
    rule_entry: Option<&RuleEntry>,
    mode: AttackMode,
    is_first_move_context: bool,
) -> BTreeSet<u32> {
    let Some(entry) = rule_entry else {
        return BTreeSet::new();
    };
    match piece_type {
        PieceType::Steward if mode == AttackMode::PreMove && is_first_move_context => {
            BTreeSet::from([1, 2])
        }
        PieceType::Steward => BTreeSet::from([1]),
        _ => entry.attack_range().clone(),
    }
}

/// Enemy cells `piece` can capture from `position`.
///
/// Each range distance is checked on its own: a target counts only if every
/// cell strictly between it and `position` is empty. There is no "first hit
/// stops the scan" rule, so a sparse range such as `{1, 3}` may reach past
/// an empty gap.
#[instrument(skip(piece, rule_entry, board), fields(piece = %piece.id(), %position, ?mode))]
pub fn generate_attacks(
    piece: &Piece,
    rule_entry: Option<&RuleEntry>,
    position: Cell,
    board: &Board,
    mode: AttackMode,
    is_first_move_context: bool,
) -> BTreeSet<Cell> {
    let ranges = effective_range(piece.piece_type(), rule_entry, mode, is_first_move_context);
    let mut targets = BTreeSet::new();

    for direction in Direction::ALL {
        for &distance in &ranges {
            let Some(target) = position.step(direction, distance) else {
                continue;
            };
            let blocked = (1..distance).any(|between| {
                position
                    .step(direction, between)
                    .is_some_and(|cell| board.is_occupied(cell))
            });
            if blocked {
                continue;
            }
            if board
                .piece_at(target)
                .is_some_and(|defender| defender.owner() != piece.owner())
            {
                targets.insert(target);
            }
        }
    }

    debug!(targets = targets.len(), "Generated attacks");
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlacedPiece;
    use crate::types::{PieceId, Side};

    fn board_with(pieces: &[(u8, Side, PieceType, &str)]) -> Board {
        Board::from_placements(pieces.iter().map(|&(id, side, ty, cell)| PlacedPiece {
            piece: Piece::new(PieceId(id), side, ty),
            cell: Some(Cell::parse(cell).unwrap()),
        }))
        .unwrap()
    }

    fn at(name: &str) -> Cell {
        Cell::parse(name).unwrap()
    }

    #[test]
    fn test_friendly_and_empty_targets_are_ignored() {
        let board = board_with(&[
            (0, Side::Player1, PieceType::Sentinel, "I7"),
            (1, Side::Player1, PieceType::Steward, "J8"),
            (2, Side::Player2, PieceType::Steward, "H6"),
        ]);
        let entry = RuleEntry::from_distances(&[1], &[1], &[]);
        let piece = board.piece(PieceId(0)).unwrap();
        let targets = generate_attacks(piece, Some(&entry), at("I7"), &board, AttackMode::PreMove, false);
        assert_eq!(targets, BTreeSet::from([at("H6")]));
    }

    #[test]
    fn test_sparse_range_skips_empty_gap() {
        let board = board_with(&[
            (0, Side::Player1, PieceType::Archer, "I7"),
            (1, Side::Player2, PieceType::Steward, "L10"),
        ]);
        let entry = RuleEntry::from_distances(&[1], &[1, 3], &[]);
        let piece = board.piece(PieceId(0)).unwrap();
        let targets = generate_attacks(piece, Some(&entry), at("I7"), &board, AttackMode::PreMove, false);
        assert_eq!(targets, BTreeSet::from([at("L10")]));
    }

    #[test]
    fn test_adjacent_enemy_blocks_further_target() {
        let board = board_with(&[
            (0, Side::Player1, PieceType::Archer, "I7"),
            (1, Side::Player2, PieceType::Steward, "J8"),
            (2, Side::Player2, PieceType::Steward, "L10"),
        ]);
        let entry = RuleEntry::from_distances(&[1], &[1, 3], &[]);
        let piece = board.piece(PieceId(0)).unwrap();
        let targets = generate_attacks(piece, Some(&entry), at("I7"), &board, AttackMode::PreMove, false);
        assert_eq!(targets, BTreeSet::from([at("J8")]));
    }

    #[test]
    fn test_steward_range_substitution() {
        let entry = RuleEntry::from_distances(&[1], &[5], &[]);
        assert_eq!(
            effective_range(PieceType::Steward, Some(&entry), AttackMode::PreMove, true),
            BTreeSet::from([1, 2])
        );
        assert_eq!(
            effective_range(PieceType::Steward, Some(&entry), AttackMode::PreMove, false),
            BTreeSet::from([1])
        );
        assert_eq!(
            effective_range(PieceType::Steward, Some(&entry), AttackMode::PostMove, true),
            BTreeSet::from([1])
        );
        assert_eq!(
            effective_range(PieceType::Archer, Some(&entry), AttackMode::PostMove, true),
            BTreeSet::from([5])
        );
        assert!(effective_range(PieceType::Steward, None, AttackMode::PreMove, true).is_empty());
    }
}
