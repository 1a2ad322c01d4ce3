//! Move generation: normal, advance and mandatory follow-up destinations.

use crate::board::Board;
use crate::coord::{Cell, Direction};
use crate::rule_table::RuleEntry;
use crate::types::Piece;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Furthest distance of the one-time development move.
pub const DEVELOPMENT_REACH: u32 = 4;

/// Pieces whose longest step is below this keep a standing advance move up to it.
pub const ADVANCE_REACH: u32 = 3;

/// Destinations reachable by a piece, split by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveSet {
    /// Cells reached at a distance listed in the rule's `move_steps`.
    pub normal: BTreeSet<Cell>,
    /// Cells reached through the development or advance bonus.
    pub advance: BTreeSet<Cell>,
}

impl MoveSet {
    /// True if neither set has a destination.
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.advance.is_empty()
    }

    /// True if `cell` is a normal or advance destination.
    pub fn contains(&self, cell: Cell) -> bool {
        self.normal.contains(&cell) || self.advance.contains(&cell)
    }

    /// All destinations, normal first.
    pub fn all(&self) -> impl Iterator<Item = Cell> + '_ {
        self.normal.iter().chain(self.advance.iter()).copied()
    }

    /// Total number of destinations.
    pub fn len(&self) -> usize {
        self.normal.len() + self.advance.len()
    }
}

/// Furthest advance distance available to a piece, or 0 if none.
fn advance_reach(max_step: u32, is_first_move: bool) -> u32 {
    if is_first_move {
        DEVELOPMENT_REACH
    } else if max_step < ADVANCE_REACH {
        ADVANCE_REACH
    } else {
        0
    }
}

fn is_advance_distance(distance: u32, max_step: u32, is_first_move: bool) -> bool {
    if is_first_move {
        (1..=DEVELOPMENT_REACH).contains(&distance)
    } else {
        max_step < ADVANCE_REACH && distance > max_step && distance <= ADVANCE_REACH
    }
}

/// Computes where `piece` may move from its current cell.
///
/// Walks each diagonal outward one cell at a time. Occupied cells are never
/// destinations and stop the walk, except on the first move of a type that
/// passes through its home row, which keeps walking past them.
#[instrument(skip(piece, rule_entry, board), fields(piece = %piece.id(), kind = %piece.piece_type()))]
pub fn generate_moves(
    piece: &Piece,
    rule_entry: &RuleEntry,
    is_first_move: bool,
    board: &Board,
) -> MoveSet {
    let Some(origin) = board.position(piece.id()) else {
        debug!("Piece is not on the board");
        return MoveSet::default();
    };

    let steps = rule_entry.move_steps();
    let max_step = rule_entry.max_step();
    let bound = max_step.max(advance_reach(max_step, is_first_move));
    let passes_through = is_first_move && piece.piece_type().passes_home_row();

    let mut moves = MoveSet::default();
    for direction in Direction::ALL {
        for distance in 1..=bound {
            let Some(cell) = origin.step(direction, distance) else {
                break;
            };
            if board.is_occupied(cell) {
                if passes_through {
                    continue;
                }
                break;
            }
            if steps.contains(&distance) {
                moves.normal.insert(cell);
            } else if is_advance_distance(distance, max_step, is_first_move) {
                moves.advance.insert(cell);
            }
        }
    }

    debug!(
        normal = moves.normal.len(),
        advance = moves.advance.len(),
        "Generated moves"
    );
    moves
}

/// Cells for the one mandatory follow-up move from `origin`.
///
/// A destination must be empty, at a distance listed in `mandatory_move`, and
/// reached along a diagonal with no occupied cell in between.
pub fn mandatory_moves(origin: Cell, rule_entry: &RuleEntry, board: &Board) -> BTreeSet<Cell> {
    let distances = rule_entry.mandatory_move();
    let Some(&bound) = distances.last() else {
        return BTreeSet::new();
    };

    let mut cells = BTreeSet::new();
    for direction in Direction::ALL {
        for distance in 1..=bound {
            let Some(cell) = origin.step(direction, distance) else {
                break;
            };
            if board.is_occupied(cell) {
                break;
            }
            if distances.contains(&distance) {
                cells.insert(cell);
            }
        }
    }
    cells
}
