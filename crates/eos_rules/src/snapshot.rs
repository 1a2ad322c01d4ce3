//! Turn-sync snapshots.
//!
//! A [`Snapshot`] is the whole game state in wire form. The authoritative
//! side emits one after every accepted action; a client adopts it wholesale
//! with [`Game::resync`] (or builds a fresh game with
//! [`Game::from_snapshot`]) after validation. Candidate sets are not sent:
//! they are recomputed from the phase and active piece.

use crate::board::Board;
use crate::error::EngineError;
use crate::game::Game;
use crate::phases::{TurnPhase, Victory};
use crate::rule_table::RuleTable;
use crate::state::{Candidates, CapturedBySide, GameState, MoveLogEntry};
use crate::types::{PieceId, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Full serializable game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Pieces and their cells (`null` once captured).
    pub board: Board,
    /// Side to move.
    pub current_turn: Side,
    /// Current phase.
    pub turn_phase: TurnPhase,
    /// Turn counter, starting at 1.
    pub turn_number: u32,
    /// Piece selected this turn.
    pub active_piece: Option<PieceId>,
    /// Whether the follow-up move has been spent this turn.
    pub mandatory_move_used: bool,
    /// Every accepted move and capture.
    pub move_log: Vec<MoveLogEntry>,
    /// Captures per side.
    pub captured_by_each_side: CapturedBySide,
    /// The decided outcome, if any.
    pub winner: Option<Victory>,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self {
            board: state.board().clone(),
            current_turn: state.current_turn(),
            turn_phase: state.phase(),
            turn_number: state.turn_number(),
            active_piece: state.active_piece(),
            mandatory_move_used: state.mandatory_move_used(),
            move_log: state.move_log().to_vec(),
            captured_by_each_side: state.captured_by_each_side().clone(),
            winner: state.winner(),
        }
    }
}

impl From<Snapshot> for GameState {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            board: snapshot.board,
            current_turn: snapshot.current_turn,
            phase: snapshot.turn_phase,
            turn_number: snapshot.turn_number,
            active_piece: snapshot.active_piece,
            candidates: Candidates::default(),
            mandatory_move_used: snapshot.mandatory_move_used,
            move_log: snapshot.move_log,
            captured: snapshot.captured_by_each_side,
            winner: snapshot.winner,
        }
    }
}

impl Game {
    /// The current state in wire form.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    /// Builds a game from a snapshot, recomputing candidates and validating
    /// every invariant.
    #[instrument(skip(rules, snapshot), fields(turn = snapshot.turn_number, phase = %snapshot.turn_phase))]
    pub fn from_snapshot(rules: Arc<RuleTable>, snapshot: Snapshot) -> Result<Self, EngineError> {
        let mut game = Game::standby(rules, GameState::from(snapshot));
        game.state.candidates = game.candidates_for_phase();
        if let Err(e) = game.validate() {
            warn!(error = %e, "Rejected snapshot");
            return Err(e);
        }
        info!("Game restored from snapshot");
        Ok(game)
    }

    /// Replaces this game's state with `snapshot` if it validates.
    ///
    /// On success the game is no longer halted; on failure nothing changes.
    pub fn resync(&mut self, snapshot: Snapshot) -> Result<(), EngineError> {
        *self = Game::from_snapshot(Arc::clone(self.rules()), snapshot)?;
        Ok(())
    }
}
