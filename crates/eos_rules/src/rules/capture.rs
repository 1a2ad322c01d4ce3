//! Ranged capture: the defender is removed, the attacker stays put.

use crate::board::{Board, BoardError};
use crate::coord::Cell;
use crate::types::{PieceId, PieceType};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Why a capture could not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CaptureError {
    /// The target cell is empty or holds a piece of the attacker's side.
    #[display("No capturable piece at {}", _0)]
    NoTargetAtCell(#[error(not(source))] Cell),

    /// The attacker is unknown or already captured.
    #[display("Attacker {} is not on the board", _0)]
    UnknownAttacker(#[error(not(source))] PieceId),

    /// The board rejected the removal.
    #[display("{}", _0)]
    Board(BoardError),
}

impl From<BoardError> for CaptureError {
    fn from(err: BoardError) -> Self {
        CaptureError::Board(err)
    }
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// The board after the capture.
    pub board: Board,
    /// The removed piece.
    pub captured: CapturedPiece,
}

/// Identity of a captured piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPiece {
    /// Id of the removed piece.
    pub id: PieceId,
    /// Its type.
    pub piece_type: PieceType,
}

/// Captures the piece on `target` with `attacker`, returning a new board.
///
/// The input board is left untouched.
#[instrument(skip(board))]
pub fn execute_capture(
    attacker: PieceId,
    target: Cell,
    board: &Board,
) -> Result<CaptureOutcome, CaptureError> {
    let mut board = board.clone();
    let captured = capture_in_place(attacker, target, &mut board)?;
    Ok(CaptureOutcome { board, captured })
}

/// Captures in place on a board owned by the caller.
///
/// Checks the target independently of any candidate set the caller may have
/// computed: it must hold a piece of the opposing side.
#[track_caller]
pub(crate) fn capture_in_place(
    attacker: PieceId,
    target: Cell,
    board: &mut Board,
) -> Result<CapturedPiece, CaptureError> {
    let attacker_side = match (board.piece(attacker), board.position(attacker)) {
        (Some(piece), Some(_)) => piece.owner(),
        _ => return Err(CaptureError::UnknownAttacker(attacker)),
    };

    let Some(defender) = board.piece_at(target) else {
        warn!(%target, "Capture requested against an empty cell");
        return Err(CaptureError::NoTargetAtCell(target));
    };
    if defender.owner() == attacker_side {
        warn!(%target, "Capture requested against a friendly piece");
        return Err(CaptureError::NoTargetAtCell(target));
    }
    let captured = CapturedPiece {
        id: defender.id(),
        piece_type: defender.piece_type(),
    };

    board.remove(captured.id)?;
    info!(%attacker, defender = %captured.id, kind = %captured.piece_type, %target, "Piece captured");
    Ok(captured)
}
