//! Occupancy invariant: position table and occupancy index agree.

use super::Invariant;
use crate::state::GameState;
use tracing::warn;

/// Invariant: every live piece stands on exactly the cell that names it.
///
/// Implies that no cell holds two pieces.
pub struct SingleOccupancyInvariant;

impl Invariant<GameState> for SingleOccupancyInvariant {
    fn holds(state: &GameState) -> bool {
        match state.board().check_consistency() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Occupancy invariant violated");
                false
            }
        }
    }

    fn description() -> &'static str {
        "Position table and occupancy index agree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Cell;
    use crate::invariants::test_support::fresh_state;
    use crate::types::PieceId;

    #[test]
    fn test_fresh_board_holds() {
        assert!(SingleOccupancyInvariant::holds(&fresh_state()));
    }

    #[test]
    fn test_holds_after_relocation() {
        let mut state = fresh_state();
        state
            .board
            .relocate(PieceId(10), Cell::parse("B4").unwrap())
            .unwrap();
        assert!(SingleOccupancyInvariant::holds(&state));
    }
}
