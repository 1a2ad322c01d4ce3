//! The turn state machine.
//!
//! [`Game`] owns one [`GameState`] and exposes the four player verbs as its
//! only mutators (plus [`Game::declare_outcome`] for resignation and
//! timeout). Each verb checks its [`Contract`] precondition, applies the
//! transition, then checks the postcondition. A failed postcondition halts
//! the game: every later verb returns [`EngineError::Halted`].

use crate::action::{Action, IllegalAction};
use crate::board::{Board, BoardError};
use crate::contracts::{AttackContract, Contract, EndTurnContract, GameNotOver, MoveContract, SelectContract};
use crate::coord::Cell;
use crate::error::EngineError;
use crate::invariants::InvariantViolation;
use crate::layout::Layout;
use crate::phases::{TurnPhase, Victory, WinCondition};
use crate::rule_table::RuleTable;
use crate::rules::{
    AttackMode, MoveSet, capture_in_place, check_winner, generate_attacks, generate_moves,
    mandatory_moves,
};
use crate::state::{Candidates, GameState, MoveLogEntry};
use crate::types::{PieceId, PieceType, Side};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Why the engine stopped accepting verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Halt {
    action: String,
    reason: String,
}

/// One game of EOS.
#[derive(Debug, Clone)]
pub struct Game {
    rules: Arc<RuleTable>,
    pub(crate) state: GameState,
    halt: Option<Halt>,
}

fn rejected(verb: &'static str, reason: IllegalAction) -> EngineError {
    warn!(verb, %reason, "Action rejected");
    reason.into()
}

impl Game {
    /// Starts a game on `board` with player 1 to move.
    ///
    /// The board must satisfy every game invariant (one Supremo per side,
    /// consistent tables).
    #[instrument(skip(rules, board), fields(pieces = board.piece_count()))]
    pub fn new(rules: Arc<RuleTable>, board: Board) -> Result<Self, EngineError> {
        let game = Self::standby(rules, GameState::new(board));
        game.validate()?;
        info!("Game started");
        Ok(game)
    }

    /// Wraps a state without validating it.
    pub(crate) fn standby(rules: Arc<RuleTable>, state: GameState) -> Self {
        Self {
            rules,
            state,
            halt: None,
        }
    }

    /// A game with the standard rule table and layout.
    pub fn standard() -> Result<Self, EngineError> {
        let rules = Arc::new(RuleTable::standard()?);
        let board = Layout::standard()?.build_board()?;
        Self::new(rules, board)
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The rule table this game was created with.
    pub fn rules(&self) -> &Arc<RuleTable> {
        &self.rules
    }

    /// True once a postcondition has failed.
    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Applies a player action.
    pub fn apply(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::Select { piece } => self.select(piece),
            Action::Move { to } => self.move_to(to),
            Action::Attack { target } => self.attack(target),
            Action::EndTurn => self.end_turn(),
        }
    }

    /// Activates `piece` for this turn.
    #[instrument(skip(self), fields(side = %self.state.current_turn))]
    pub fn select(&mut self, piece: PieceId) -> Result<(), EngineError> {
        self.ensure_running()?;
        SelectContract::pre(&self.state, &piece).map_err(|reason| rejected("select", reason))?;

        let candidates = self.pre_move_candidates(piece);
        if candidates.is_empty() {
            return Err(rejected("select", IllegalAction::NoLegalActions { piece }));
        }

        let before = self.state.clone();
        debug!(
            moves = candidates.moves.len(),
            attacks = candidates.attacks.len(),
            "Piece selected"
        );
        self.state.active_piece = Some(piece);
        self.state.candidates = candidates;
        self.state.phase = TurnPhase::Action;
        self.verify::<SelectContract, PieceId>(&before, Action::Select { piece })
    }

    /// Moves the active piece to `to`.
    ///
    /// In `Action` the destination must be a normal or advance candidate; in
    /// `MandatoryMove` it must be a follow-up candidate and the follow-up
    /// must not have been used yet this turn.
    #[instrument(skip(self), fields(side = %self.state.current_turn))]
    pub fn move_to(&mut self, to: Cell) -> Result<(), EngineError> {
        self.ensure_running()?;
        MoveContract::pre(&self.state, &to).map_err(|reason| rejected("move", reason))?;
        let id = self.active_piece("move")?;
        let is_follow_up = self.state.phase == TurnPhase::MandatoryMove;
        let piece_type = self.piece_type(id)?;

        let before = self.state.clone();
        let from = self.state.board.relocate(id, to)?;
        if let Some(piece) = self.state.board.piece_mut(id) {
            piece.mark_moved();
        }
        self.state.move_log.push(MoveLogEntry {
            player: self.state.current_turn,
            piece_id: id,
            piece_type,
            from,
            to,
            turn_number: self.state.turn_number,
            is_capture: false,
            captured_piece_type: None,
        });
        if is_follow_up {
            self.state.mandatory_move_used = true;
        }

        let next = self.chain_candidates(id);
        if next.attacks.is_empty() {
            self.lock();
        } else {
            self.state.phase = TurnPhase::MandatoryMove;
            self.state.candidates = next;
        }
        info!(piece = %id, %from, %to, phase = %self.state.phase, "Piece moved");
        self.verify::<MoveContract, Cell>(&before, Action::Move { to })
    }

    /// Captures the enemy piece on `target` with the active piece.
    #[instrument(skip(self), fields(side = %self.state.current_turn))]
    pub fn attack(&mut self, target: Cell) -> Result<(), EngineError> {
        self.ensure_running()?;
        AttackContract::pre(&self.state, &target).map_err(|reason| rejected("attack", reason))?;
        let id = self.active_piece("attack")?;
        let piece_type = self.piece_type(id)?;
        let Some(from) = self.state.board.position(id) else {
            return Err(BoardError::new(format!("active piece {} is not on the board", id)).into());
        };

        let before = self.state.clone();
        let side = self.state.current_turn;
        let captured = capture_in_place(id, target, &mut self.state.board)?;
        self.state.move_log.push(MoveLogEntry {
            player: side,
            piece_id: id,
            piece_type,
            from,
            to: target,
            turn_number: self.state.turn_number,
            is_capture: true,
            captured_piece_type: Some(captured.piece_type),
        });
        self.state.captured.record(side, captured);

        if let Some(victory) = check_winner(&self.state.board) {
            self.finish(victory);
        } else {
            let next = self.chain_candidates(id);
            if next.is_empty() {
                self.lock();
            } else {
                self.state.phase = TurnPhase::MandatoryMove;
                self.state.candidates = next;
            }
        }
        self.verify::<AttackContract, Cell>(&before, Action::Attack { target })
    }

    /// Passes the turn to the other side.
    #[instrument(skip(self), fields(side = %self.state.current_turn))]
    pub fn end_turn(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;
        EndTurnContract::pre(&self.state, &()).map_err(|reason| rejected("end_turn", reason))?;

        let before = self.state.clone();
        self.state.current_turn = self.state.current_turn.opponent();
        self.state.mandatory_move_used = false;
        self.state.active_piece = None;
        self.state.candidates = Candidates::default();
        self.state.turn_number += 1;
        self.state.phase = TurnPhase::Select;
        info!(
            next = %self.state.current_turn,
            turn = self.state.turn_number,
            "Turn ended"
        );
        self.verify::<EndTurnContract, ()>(&before, Action::EndTurn)
    }

    /// Ends the game from outside the rules (resignation, timeout).
    #[instrument(skip(self))]
    pub fn declare_outcome(&mut self, victory: Victory) -> Result<(), EngineError> {
        self.ensure_running()?;
        GameNotOver::check(&self.state).map_err(|reason| rejected("declare_outcome", reason))?;
        self.finish(victory);
        Ok(())
    }

    /// Every action the side to move may take right now.
    ///
    /// Empty once the game is over or halted.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.halt.is_some() || self.state.is_over() {
            return Vec::new();
        }
        let candidates = &self.state.candidates;
        match self.state.phase {
            TurnPhase::Select => self
                .state
                .board
                .live_pieces()
                .filter(|(piece, _)| piece.owner() == self.state.current_turn)
                .map(|(piece, _)| piece.id())
                .filter(|&id| !self.pre_move_candidates(id).is_empty())
                .map(|piece| Action::Select { piece })
                .collect(),
            TurnPhase::Action => candidates
                .moves
                .all()
                .map(|to| Action::Move { to })
                .chain(candidates.attacks.iter().map(|&target| Action::Attack { target }))
                .collect(),
            TurnPhase::MandatoryMove => candidates
                .attacks
                .iter()
                .map(|&target| Action::Attack { target })
                .chain(
                    candidates
                        .mandatory
                        .iter()
                        .filter(|_| !self.state.mandatory_move_used)
                        .map(|&to| Action::Move { to }),
                )
                .collect(),
            TurnPhase::Locked => vec![Action::EndTurn],
        }
    }

    /// Moves and pre-move attacks for `id` as if it were selected now.
    pub fn pre_move_candidates(&self, id: PieceId) -> Candidates {
        let board = &self.state.board;
        let (Some(piece), Some(position)) = (board.piece(id), board.position(id)) else {
            return Candidates::default();
        };
        let first = !piece.has_moved();
        let piece_type = piece.piece_type();
        Candidates {
            moves: generate_moves(piece, self.rules.resolve(piece_type), first, board),
            attacks: generate_attacks(
                piece,
                self.rules.entry(piece_type),
                position,
                board,
                AttackMode::PreMove,
                first,
            ),
            mandatory: BTreeSet::new(),
        }
    }

    /// Post-move attacks plus the follow-up move if it is still unused.
    fn chain_candidates(&self, id: PieceId) -> Candidates {
        let board = &self.state.board;
        let (Some(piece), Some(position)) = (board.piece(id), board.position(id)) else {
            return Candidates::default();
        };
        let piece_type = piece.piece_type();
        let attacks = generate_attacks(
            piece,
            self.rules.entry(piece_type),
            position,
            board,
            AttackMode::PostMove,
            !piece.has_moved(),
        );
        let mandatory = if self.state.mandatory_move_used {
            BTreeSet::new()
        } else {
            mandatory_moves(position, self.rules.resolve(piece_type), board)
        };
        Candidates {
            moves: MoveSet::default(),
            attacks,
            mandatory,
        }
    }

    /// Candidates implied by the state's phase and active piece.
    pub(crate) fn candidates_for_phase(&self) -> Candidates {
        match (self.state.phase, self.state.active_piece) {
            (TurnPhase::Action, Some(id)) => self.pre_move_candidates(id),
            (TurnPhase::MandatoryMove, Some(id)) => self.chain_candidates(id),
            _ => Candidates::default(),
        }
    }

    fn active_piece(&self, verb: &'static str) -> Result<PieceId, EngineError> {
        self.state.active_piece.ok_or_else(|| {
            rejected(
                verb,
                IllegalAction::WrongPhase {
                    verb,
                    phase: self.state.phase,
                },
            )
        })
    }

    fn piece_type(&self, id: PieceId) -> Result<PieceType, EngineError> {
        self.state
            .board
            .piece(id)
            .map(|piece| piece.piece_type())
            .ok_or_else(|| BoardError::new(format!("unknown piece {}", id)).into())
    }

    fn lock(&mut self) {
        self.state.phase = TurnPhase::Locked;
        self.state.candidates = Candidates::default();
    }

    fn finish(&mut self, victory: Victory) {
        self.state.winner = Some(victory);
        self.lock();
        info!(%victory, turn = self.state.turn_number, "Game decided");
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        match &self.halt {
            Some(halt) => Err(EngineError::Halted {
                action: halt.action.clone(),
                reason: halt.reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn verify<C, A>(&mut self, before: &GameState, action: Action) -> Result<(), EngineError>
    where
        C: Contract<GameState, A>,
    {
        match C::post(before, &self.state) {
            Ok(()) => Ok(()),
            Err(violations) => {
                let reason = InvariantViolation::join(&violations);
                error!(%action, %reason, "Postcondition failed; halting game");
                let halt = Halt {
                    action: action.to_string(),
                    reason,
                };
                let err = EngineError::Halted {
                    action: halt.action.clone(),
                    reason: halt.reason.clone(),
                };
                self.halt = Some(halt);
                Err(err)
            }
        }
    }

    /// Checks the whole state: invariants, winner consistency and candidates.
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        use crate::invariants::{GameInvariants, InvariantSet};

        let invalid = |reason: String| EngineError::InvalidState { reason };

        GameInvariants::check_all(&self.state)
            .map_err(|violations| invalid(InvariantViolation::join(&violations)))?;
        if self.state.turn_number == 0 {
            return Err(invalid("turn numbers start at 1".into()));
        }

        let decided = check_winner(&self.state.board);
        match (self.state.winner, decided) {
            (None, Some(victory)) => {
                return Err(invalid(format!("board is decided ({}) but no winner is set", victory)));
            }
            (Some(claimed), Some(victory)) if claimed != victory => {
                return Err(invalid(format!(
                    "winner {} contradicts the board ({})",
                    claimed, victory
                )));
            }
            (Some(claimed), None)
                if !matches!(
                    claimed.condition,
                    WinCondition::Resignation | WinCondition::Timeout
                ) =>
            {
                return Err(invalid(format!(
                    "winner {} is not supported by the board",
                    claimed
                )));
            }
            _ => {}
        }
        if self.state.winner.is_some() && self.state.phase != TurnPhase::Locked {
            return Err(invalid("a decided game must be Locked".into()));
        }

        if matches!(self.state.phase, TurnPhase::Action | TurnPhase::MandatoryMove)
            && self.state.candidates.is_empty()
        {
            return Err(invalid(format!(
                "{} phase with no candidates for the active piece",
                self.state.phase
            )));
        }
        Ok(())
    }

    /// Side to move, for callers that only hold a `Game`.
    pub fn current_turn(&self) -> Side {
        self.state.current_turn
    }
}
