//! Properties every game state must satisfy.
//!
//! Each invariant is a zero-sized type that can be checked on its own or
//! composed with others into an [`InvariantSet`] via tuples. The engine runs
//! [`GameInvariants`] after every accepted action.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Joins violations into one message.
    pub fn join(violations: &[InvariantViolation]) -> String {
        violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        check::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        check::<S, I3>(state, &mut violations);
        check::<S, I4>(state, &mut violations);
        finish(violations)
    }
}

pub mod active_piece;
pub mod history_consistent;
pub mod single_occupancy;
pub mod supremo;

pub use active_piece::ActivePieceInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use single_occupancy::SingleOccupancyInvariant;
pub use supremo::SupremoInvariant;

/// Every game invariant as one composable set.
pub type GameInvariants = (
    SingleOccupancyInvariant,
    SupremoInvariant,
    HistoryConsistentInvariant,
    ActivePieceInvariant,
);

#[cfg(test)]
pub(crate) mod test_support {
    use crate::layout::Layout;
    use crate::state::GameState;

    pub fn fresh_state() -> GameState {
        GameState::new(Layout::standard().unwrap().build_board().unwrap())
    }
}
