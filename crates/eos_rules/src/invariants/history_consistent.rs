//! History consistency invariant: the log explains every missing piece.

use super::Invariant;
use crate::state::GameState;
use crate::types::Side;

/// Invariant: captures recorded in the move log equal pieces missing from
/// the board, and the per-side capture lists agree with the log.
///
/// No piece disappears without a capture entry; no capture is logged without
/// a piece disappearing.
pub struct HistoryConsistentInvariant;

impl Invariant<GameState> for HistoryConsistentInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();
        let missing = board.piece_count() - board.live_pieces().count();
        if state.capture_count() != missing {
            return false;
        }

        Side::BOTH.into_iter().all(|side| {
            let logged: Vec<_> = state
                .move_log()
                .iter()
                .filter(|entry| entry.is_capture && entry.player == side)
                .map(|entry| entry.captured_piece_type)
                .collect();
            let tallied: Vec<_> = state
                .captured_by_each_side()
                .by(side)
                .iter()
                .map(|captured| Some(captured.piece_type))
                .collect();
            logged == tallied
        })
    }

    fn description() -> &'static str {
        "Logged captures match pieces missing from the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::test_support::fresh_state;
    use crate::rules::CapturedPiece;
    use crate::state::MoveLogEntry;
    use crate::types::{PieceId, PieceType};

    #[test]
    fn test_empty_game_holds() {
        assert!(HistoryConsistentInvariant::holds(&fresh_state()));
    }

    #[test]
    fn test_unlogged_removal_violates() {
        let mut state = fresh_state();
        state.board.remove(PieceId(30)).unwrap();
        assert!(!HistoryConsistentInvariant::holds(&state));
    }

    #[test]
    fn test_logged_capture_holds() {
        let mut state = fresh_state();
        let from = state.board.position(PieceId(12)).unwrap();
        let to = state.board.remove(PieceId(30)).unwrap();
        state.move_log.push(MoveLogEntry {
            player: Side::Player1,
            piece_id: PieceId(12),
            piece_type: PieceType::Steward,
            from,
            to,
            turn_number: 1,
            is_capture: true,
            captured_piece_type: Some(PieceType::Steward),
        });
        assert!(!HistoryConsistentInvariant::holds(&state));

        state.captured.record(
            Side::Player1,
            CapturedPiece {
                id: PieceId(30),
                piece_type: PieceType::Steward,
            },
        );
        assert!(HistoryConsistentInvariant::holds(&state));
    }
}
