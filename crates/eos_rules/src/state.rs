//! The state owned by one game: board, phase, active piece and history.

use crate::board::Board;
use crate::coord::Cell;
use crate::phases::{TurnPhase, Victory};
use crate::rules::{CapturedPiece, MoveSet};
use crate::types::{PieceId, PieceType, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One accepted move or capture.
///
/// For a capture `from` is the attacker's cell (it does not move) and `to`
/// is the defender's cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    /// Side that acted.
    pub player: Side,
    /// Acting piece.
    pub piece_id: PieceId,
    /// Type of the acting piece.
    #[serde(rename = "piece_type_name")]
    pub piece_type: PieceType,
    /// Cell the piece acted from.
    pub from: Cell,
    /// Destination or target.
    pub to: Cell,
    /// Turn in which the entry was made.
    pub turn_number: u32,
    /// True for a capture.
    pub is_capture: bool,
    /// Type of the removed piece, for captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_piece_type: Option<PieceType>,
}

/// What the active piece may do next.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidates {
    /// Destinations for a move in the `Action` phase.
    pub moves: MoveSet,
    /// Capturable enemy cells.
    pub attacks: BTreeSet<Cell>,
    /// Destinations for the follow-up move in the `MandatoryMove` phase.
    pub mandatory: BTreeSet<Cell>,
}

impl Candidates {
    /// True if nothing is available.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty() && self.mandatory.is_empty()
    }
}

/// Pieces each side has captured, in capture order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapturedBySide {
    /// Taken by player 1.
    pub player1: Vec<CapturedPiece>,
    /// Taken by player 2.
    pub player2: Vec<CapturedPiece>,
}

impl CapturedBySide {
    /// Pieces captured by `side`.
    pub fn by(&self, side: Side) -> &[CapturedPiece] {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub(crate) fn record(&mut self, side: Side, piece: CapturedPiece) {
        match side {
            Side::Player1 => self.player1.push(piece),
            Side::Player2 => self.player2.push(piece),
        }
    }
}

/// Everything a single game owns.
///
/// Only [`Game`](crate::game::Game) mutates this; everyone else reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) current_turn: Side,
    pub(crate) phase: TurnPhase,
    pub(crate) turn_number: u32,
    pub(crate) active_piece: Option<PieceId>,
    pub(crate) candidates: Candidates,
    pub(crate) mandatory_move_used: bool,
    pub(crate) move_log: Vec<MoveLogEntry>,
    pub(crate) captured: CapturedBySide,
    pub(crate) winner: Option<Victory>,
}

impl GameState {
    /// A fresh game: player 1 to move, turn 1, nothing selected.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            current_turn: Side::Player1,
            phase: TurnPhase::Select,
            turn_number: 1,
            active_piece: None,
            candidates: Candidates::default(),
            mandatory_move_used: false,
            move_log: Vec::new(),
            captured: CapturedBySide::default(),
            winner: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// Current phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Turn counter, starting at 1.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Piece selected this turn.
    pub fn active_piece(&self) -> Option<PieceId> {
        self.active_piece
    }

    /// Candidate moves and targets for the active piece.
    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    /// Whether the follow-up move has been spent this turn.
    pub fn mandatory_move_used(&self) -> bool {
        self.mandatory_move_used
    }

    /// Every accepted move and capture, oldest first.
    pub fn move_log(&self) -> &[MoveLogEntry] {
        &self.move_log
    }

    /// Captures per side.
    pub fn captured_by_each_side(&self) -> &CapturedBySide {
        &self.captured
    }

    /// The decided outcome, if any.
    pub fn winner(&self) -> Option<Victory> {
        self.winner
    }

    /// True once a winner has been decided.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of capture entries in the log.
    pub fn capture_count(&self) -> usize {
        self.move_log.iter().filter(|entry| entry.is_capture).count()
    }
}
