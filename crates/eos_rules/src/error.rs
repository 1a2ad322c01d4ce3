//! Top-level engine error.

use crate::action::IllegalAction;
use crate::board::BoardError;
use crate::coord::CoordinateError;
use crate::layout::LayoutError;
use crate::rule_table::RuleTableError;
use crate::rules::CaptureError;
use derive_more::{Display, Error};

/// Any failure surfaced by the engine.
#[derive(Debug, Clone, Display, Error)]
pub enum EngineError {
    /// A cell string could not be parsed.
    #[display("{}", _0)]
    InvalidCoordinate(CoordinateError),

    /// The request is not legal now; nothing changed.
    #[display("Illegal action: {}", _0)]
    IllegalAction(IllegalAction),

    /// The capture could not be executed.
    #[display("{}", _0)]
    Capture(CaptureError),

    /// The board detected corruption.
    #[display("{}", _0)]
    Board(BoardError),

    /// A state check failed after an accepted action; the game refuses
    /// every further verb.
    #[display("Engine halted after {}: {}", action, reason)]
    Halted {
        /// The action that produced the bad state.
        action: String,
        /// The violated checks.
        reason: String,
    },

    /// A starting board or snapshot failed validation and was not adopted.
    #[display("Invalid game state: {}", reason)]
    InvalidState {
        /// Why it was rejected.
        reason: String,
    },

    /// The rule table could not be loaded.
    #[display("{}", _0)]
    RuleTable(RuleTableError),

    /// The layout could not be loaded.
    #[display("{}", _0)]
    Layout(LayoutError),
}

impl EngineError {
    /// Returns the illegal-action reason, if that is what this is.
    pub fn as_illegal(&self) -> Option<&IllegalAction> {
        match self {
            EngineError::IllegalAction(reason) => Some(reason),
            _ => None,
        }
    }

    /// True if the engine refuses further verbs.
    pub fn is_halted(&self) -> bool {
        matches!(self, EngineError::Halted { .. })
    }
}

impl From<CoordinateError> for EngineError {
    fn from(err: CoordinateError) -> Self {
        EngineError::InvalidCoordinate(err)
    }
}

impl From<IllegalAction> for EngineError {
    fn from(err: IllegalAction) -> Self {
        EngineError::IllegalAction(err)
    }
}

impl From<CaptureError> for EngineError {
    fn from(err: CaptureError) -> Self {
        EngineError::Capture(err)
    }
}

impl From<BoardError> for EngineError {
    fn from(err: BoardError) -> Self {
        EngineError::Board(err)
    }
}

impl From<RuleTableError> for EngineError {
    fn from(err: RuleTableError) -> Self {
        EngineError::RuleTable(err)
    }
}

impl From<LayoutError> for EngineError {
    fn from(err: LayoutError) -> Self {
        EngineError::Layout(err)
    }
}
