//! Active piece invariant.

use super::Invariant;
use crate::phases::TurnPhase;
use crate::state::GameState;

/// Invariant: nothing is active in `Select`; in `Action` and `MandatoryMove`
/// the active piece is on the board and belongs to the side to move.
pub struct ActivePieceInvariant;

impl Invariant<GameState> for ActivePieceInvariant {
    fn holds(state: &GameState) -> bool {
        match state.phase() {
            TurnPhase::Select => state.active_piece().is_none(),
            TurnPhase::Action | TurnPhase::MandatoryMove => {
                state.active_piece().is_some_and(|id| {
                    state.board().is_on_board(id)
                        && state
                            .board()
                            .piece(id)
                            .is_some_and(|piece| piece.owner() == state.current_turn())
                })
            }
            TurnPhase::Locked => true,
        }
    }

    fn description() -> &'static str {
        "The active piece is on the board and owned by the side to move"
    }
}
