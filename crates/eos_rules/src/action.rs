//! Player actions and the reasons they can be refused.
//!
//! Actions are plain data: they can be validated against a state without
//! applying them, serialized for the wire, and replayed.

use crate::coord::Cell;
use crate::phases::TurnPhase;
use crate::types::PieceId;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// One of the four player verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Choose the piece to act with this turn.
    Select {
        /// Piece to activate.
        piece: PieceId,
    },
    /// Move the active piece.
    Move {
        /// Destination cell.
        to: Cell,
    },
    /// Capture with the active piece.
    Attack {
        /// Cell holding the defender.
        target: Cell,
    },
    /// Hand the turn to the opponent.
    EndTurn,
}

impl Action {
    /// Short verb name, used in logs and errors.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Select { .. } => "select",
            Action::Move { .. } => "move",
            Action::Attack { .. } => "attack",
            Action::EndTurn => "end_turn",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Select { piece } => write!(f, "select {}", piece),
            Action::Move { to } => write!(f, "move to {}", to),
            Action::Attack { target } => write!(f, "attack {}", target),
            Action::EndTurn => write!(f, "end turn"),
        }
    }
}

/// A request that is not legal in the current state.
///
/// Returning one of these never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum IllegalAction {
    /// The verb is not accepted in this phase.
    #[display("Cannot {} during the {} phase", verb, phase)]
    WrongPhase {
        /// Rejected verb.
        verb: &'static str,
        /// Current phase.
        phase: TurnPhase,
    },

    /// The piece belongs to the other side.
    #[display("Piece {} does not belong to the side to move", piece)]
    NotYourPiece {
        /// Requested piece.
        piece: PieceId,
    },

    /// No piece has this id.
    #[display("Unknown piece {}", piece)]
    UnknownPiece {
        /// Requested piece.
        piece: PieceId,
    },

    /// The piece has already been captured.
    #[display("Piece {} has been captured", piece)]
    PieceCaptured {
        /// Requested piece.
        piece: PieceId,
    },

    /// The piece has no move and no attack.
    #[display("Piece {} has no legal moves or attacks", piece)]
    NoLegalActions {
        /// Requested piece.
        piece: PieceId,
    },

    /// The cell is not among the active piece's candidates.
    #[display("{} is not a legal destination or target", cell)]
    NotACandidate {
        /// Requested cell.
        cell: Cell,
    },

    /// The follow-up move has already been made this turn.
    #[display("The mandatory move has already been used this turn")]
    MandatoryMoveUsed,

    /// A winner has been decided.
    #[display("Game is already over")]
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let action = Action::Move {
            to: Cell::parse("C3").unwrap(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"move","to":"C3"}"#);

        let select: Action = serde_json::from_str(r#"{"type":"select","piece":9}"#).unwrap();
        assert_eq!(select, Action::Select { piece: PieceId(9) });

        let end: Action = serde_json::from_str(r#"{"type":"end_turn"}"#).unwrap();
        assert_eq!(end, Action::EndTurn);
    }

    #[test]
    fn test_illegal_action_messages() {
        let err = IllegalAction::WrongPhase {
            verb: "select",
            phase: TurnPhase::Action,
        };
        assert_eq!(err.to_string(), "Cannot select during the Action phase");
        assert_eq!(
            IllegalAction::NotACandidate {
                cell: Cell::parse("J8").unwrap()
            }
            .to_string(),
            "J8 is not a legal destination or target"
        );
    }
}
