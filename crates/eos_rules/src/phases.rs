//! Turn phases and game outcomes.

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Phase of the current turn.
///
/// ```text
/// Select ─select─▶ Action ─move/attack─▶ MandatoryMove ⟲ ─▶ Locked ─end_turn─▶ Select
///                         └───────────────────────────────▶ Locked
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// No piece chosen yet.
    #[default]
    Select,
    /// A piece is selected and may move or attack.
    Action,
    /// The active piece must keep capturing or make its follow-up move.
    MandatoryMove,
    /// Nothing left to do but end the turn.
    Locked,
}

/// Who won, once the game is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// One side won.
    Player(Side),
    /// Nobody won.
    Draw,
}

impl Winner {
    /// Returns the winning side, if there is one.
    pub fn side(&self) -> Option<Side> {
        match self {
            Winner::Player(side) => Some(*side),
            Winner::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Winner::Draw)
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Player(side) => write!(f, "{} wins", side),
            Winner::Draw => write!(f, "Draw"),
        }
    }
}

/// How the game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// The loser's Supremo was captured.
    SupremoCaptured,
    /// The loser has no pieces left.
    Elimination,
    /// Both Supremos are gone.
    MutualSupremoCapture,
    /// The loser resigned (session level).
    Resignation,
    /// The loser ran out of time (session level).
    Timeout,
}

/// A decided game: winner plus the condition that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Victory {
    /// The result.
    pub winner: Winner,
    /// What produced it.
    pub condition: WinCondition,
}

impl Victory {
    /// A win for `side`.
    pub fn player(side: Side, condition: WinCondition) -> Self {
        Self {
            winner: Winner::Player(side),
            condition,
        }
    }

    /// A draw.
    pub fn draw(condition: WinCondition) -> Self {
        Self {
            winner: Winner::Draw,
            condition,
        }
    }
}

impl std::fmt::Display for Victory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.winner, self.condition)
    }
}
