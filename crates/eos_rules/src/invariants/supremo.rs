//! Supremo invariant.

use super::Invariant;
use crate::state::GameState;
use crate::types::Side;

/// Invariant: no side has more than one Supremo, and while the game is
/// undecided each side has exactly one.
pub struct SupremoInvariant;

impl Invariant<GameState> for SupremoInvariant {
    fn holds(state: &GameState) -> bool {
        Side::BOTH.into_iter().all(|side| {
            let count = state.board().supremo_count(side);
            if state.is_over() { count <= 1 } else { count == 1 }
        })
    }

    fn description() -> &'static str {
        "Each side has exactly one Supremo while the game is undecided"
    }
}
