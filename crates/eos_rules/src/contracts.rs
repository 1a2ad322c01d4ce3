//! Preconditions and postconditions for the four player verbs.
//!
//! A contract is Hoare-style: `pre` must hold for the request to be legal,
//! `post` must hold between the state before and after the transition.
//! Preconditions fail with [`IllegalAction`]; postcondition failures are
//! engine faults and halt the game.

use crate::action::IllegalAction;
use crate::coord::Cell;
use crate::invariants::{GameInvariants, InvariantSet, InvariantViolation};
use crate::phases::TurnPhase;
use crate::state::GameState;
use crate::types::PieceId;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), IllegalAction>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), Vec<InvariantViolation>>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: no winner has been decided.
pub struct GameNotOver;

impl GameNotOver {
    /// Fails with [`IllegalAction::GameOver`] once a winner is set.
    pub fn check(state: &GameState) -> Result<(), IllegalAction> {
        if state.is_over() {
            Err(IllegalAction::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the current phase accepts the verb.
pub struct PhaseAllows;

impl PhaseAllows {
    /// Fails with [`IllegalAction::WrongPhase`] outside `allowed`.
    pub fn check(
        state: &GameState,
        verb: &'static str,
        allowed: &[TurnPhase],
    ) -> Result<(), IllegalAction> {
        if allowed.contains(&state.phase()) {
            Ok(())
        } else {
            Err(IllegalAction::WrongPhase {
                verb,
                phase: state.phase(),
            })
        }
    }
}

/// Precondition: the piece exists, is on the board and belongs to the side to move.
pub struct OwnLivePiece;

impl OwnLivePiece {
    /// Validates the request against `state`.
    #[instrument(skip(state))]
    pub fn check(piece: PieceId, state: &GameState) -> Result<(), IllegalAction> {
        let Some(record) = state.board().piece(piece) else {
            return Err(IllegalAction::UnknownPiece { piece });
        };
        if !state.board().is_on_board(piece) {
            return Err(IllegalAction::PieceCaptured { piece });
        }
        if record.owner() != state.current_turn() {
            return Err(IllegalAction::NotYourPiece { piece });
        }
        Ok(())
    }
}

/// Precondition: the destination is a candidate for the current phase.
pub struct MoveCandidate;

impl MoveCandidate {
    /// Validates the request against `state`.
    #[instrument(skip(state))]
    pub fn check(to: Cell, state: &GameState) -> Result<(), IllegalAction> {
        let candidates = state.candidates();
        let legal = match state.phase() {
            TurnPhase::MandatoryMove => {
                if state.mandatory_move_used() {
                    return Err(IllegalAction::MandatoryMoveUsed);
                }
                candidates.mandatory.contains(&to)
            }
            _ => candidates.moves.contains(to),
        };
        if legal {
            Ok(())
        } else {
            Err(IllegalAction::NotACandidate { cell: to })
        }
    }
}

/// Precondition: the target is a capturable cell for the active piece.
pub struct AttackCandidate;

impl AttackCandidate {
    /// Validates the request against `state`.
    #[instrument(skip(state))]
    pub fn check(target: Cell, state: &GameState) -> Result<(), IllegalAction> {
        if state.candidates().attacks.contains(&target) {
            Ok(())
        } else {
            Err(IllegalAction::NotACandidate { cell: target })
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Postcondition helpers
// ─────────────────────────────────────────────────────────────

struct PostCheck {
    violations: Vec<InvariantViolation>,
}

impl PostCheck {
    fn new(after: &GameState) -> Self {
        let violations = GameInvariants::check_all(after).err().unwrap_or_default();
        Self { violations }
    }

    fn expect(mut self, condition: bool, description: &str) -> Self {
        if !condition {
            warn!(description, "Postcondition failed");
            self.violations.push(InvariantViolation::new(description));
        }
        self
    }

    fn finish(self) -> Result<(), Vec<InvariantViolation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Verb Contracts
// ─────────────────────────────────────────────────────────────

/// Contract for `select`.
///
/// Pre: game not over, phase is `Select`, piece is a live piece of the side
/// to move. Post: board and log untouched, piece active in `Action`.
pub struct SelectContract;

impl Contract<GameState, PieceId> for SelectContract {
    fn pre(state: &GameState, piece: &PieceId) -> Result<(), IllegalAction> {
        GameNotOver::check(state)?;
        PhaseAllows::check(state, "select", &[TurnPhase::Select])?;
        OwnLivePiece::check(*piece, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
        PostCheck::new(after)
            .expect(before.board() == after.board(), "Selection leaves the board unchanged")
            .expect(
                before.move_log().len() == after.move_log().len(),
                "Selection does not log",
            )
            .expect(
                after.phase() == TurnPhase::Action && after.active_piece().is_some(),
                "Selection enters Action with an active piece",
            )
            .finish()
    }
}

/// Contract for `move`.
///
/// Pre: game not over, phase is `Action` or `MandatoryMove`, destination is a
/// candidate. Post: exactly one non-capture entry logged, same piece count.
pub struct MoveContract;

impl Contract<GameState, Cell> for MoveContract {
    fn pre(state: &GameState, to: &Cell) -> Result<(), IllegalAction> {
        GameNotOver::check(state)?;
        PhaseAllows::check(state, "move", &[TurnPhase::Action, TurnPhase::MandatoryMove])?;
        MoveCandidate::check(*to, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
        PostCheck::new(after)
            .expect(
                after.move_log().len() == before.move_log().len() + 1,
                "A move appends exactly one log entry",
            )
            .expect(
                after.capture_count() == before.capture_count(),
                "A move captures nothing",
            )
            .expect(
                after.active_piece() == before.active_piece(),
                "The active piece is fixed for the turn",
            )
            .expect(
                after.current_turn() == before.current_turn(),
                "A move does not change the side to move",
            )
            .finish()
    }
}

/// Contract for `attack`.
///
/// Pre: game not over, phase is `Action` or `MandatoryMove`, target is a
/// candidate. Post: exactly one piece removed and one capture logged.
pub struct AttackContract;

impl Contract<GameState, Cell> for AttackContract {
    fn pre(state: &GameState, target: &Cell) -> Result<(), IllegalAction> {
        GameNotOver::check(state)?;
        PhaseAllows::check(state, "attack", &[TurnPhase::Action, TurnPhase::MandatoryMove])?;
        AttackCandidate::check(*target, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
        let live_before = before.board().live_pieces().count();
        let live_after = after.board().live_pieces().count();
        PostCheck::new(after)
            .expect(live_after + 1 == live_before, "An attack removes exactly one piece")
            .expect(
                after.capture_count() == before.capture_count() + 1,
                "An attack logs exactly one capture",
            )
            .expect(
                after.active_piece() == before.active_piece(),
                "The active piece is fixed for the turn",
            )
            .finish()
    }
}

/// Contract for `end_turn`.
///
/// Pre: game not over, phase is `Locked`. Post: the other side is to move in
/// `Select`, the turn counter advanced by one, board untouched.
pub struct EndTurnContract;

impl Contract<GameState, ()> for EndTurnContract {
    fn pre(state: &GameState, _action: &()) -> Result<(), IllegalAction> {
        GameNotOver::check(state)?;
        PhaseAllows::check(state, "end_turn", &[TurnPhase::Locked])
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
        PostCheck::new(after)
            .expect(
                after.current_turn() == before.current_turn().opponent(),
                "Ending the turn switches sides",
            )
            .expect(
                after.turn_number() == before.turn_number() + 1,
                "Ending the turn advances the counter",
            )
            .expect(before.board() == after.board(), "Ending the turn leaves the board unchanged")
            .expect(after.phase() == TurnPhase::Select, "A new turn starts in Select")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::test_support::fresh_state;

    #[test]
    fn test_select_pre_rejects_opponent_piece() {
        let state = fresh_state();
        assert_eq!(
            SelectContract::pre(&state, &PieceId(28)),
            Err(IllegalAction::NotYourPiece { piece: PieceId(28) })
        );
        assert_eq!(
            SelectContract::pre(&state, &PieceId(99)),
            Err(IllegalAction::UnknownPiece { piece: PieceId(99) })
        );
        assert!(SelectContract::pre(&state, &PieceId(10)).is_ok());
    }

    #[test]
    fn test_move_pre_rejects_wrong_phase() {
        let state = fresh_state();
        let to = Cell::parse("B4").unwrap();
        assert_eq!(
            MoveContract::pre(&state, &to),
            Err(IllegalAction::WrongPhase {
                verb: "move",
                phase: TurnPhase::Select
            })
        );
    }

    #[test]
    fn test_end_turn_post_requires_side_switch() {
        let before = fresh_state();
        let after = before.clone();
        let violations = EndTurnContract::post(&before, &after).unwrap_err();
        assert!(
            violations
                .iter()
                .any(|v| v.description == "Ending the turn switches sides")
        );
    }
}
