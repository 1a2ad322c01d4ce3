//! EOS rules engine.
//!
//! A pure, synchronous implementation of the EOS rules: a 17 × 13 diagonal
//! lattice, seven piece types driven by an external rule table, ranged
//! captures with mandatory chains, and a four-phase turn state machine.
//! The same crate serves the authoritative server and client-side
//! prediction.
//!
//! # Architecture
//!
//! - **Coordinates**: [`Cell`] parsing, validation and diagonal stepping
//! - **Data**: [`RuleTable`] (per-type distances) and [`Layout`] (starting board)
//! - **Rules**: move generation, attack resolution, capture and win detection
//! - **Turn state machine**: [`Game`] with its [`GameState`], guarded by
//!   [`contracts`] and [`invariants`]
//! - **Sync**: [`Snapshot`] for wholesale state transfer
//! - **Scoring**: point totals from a finished log
//!
//! # Example
//!
//! ```
//! use eos_rules::{Action, Cell, Game, PieceId, TurnPhase};
//!
//! # fn main() -> Result<(), eos_rules::EngineError> {
//! let mut game = Game::standard()?;
//! game.apply(Action::Select { piece: PieceId(10) })?;
//! game.apply(Action::Move { to: Cell::parse("C3")? })?;
//! assert_eq!(game.state().phase(), TurnPhase::Locked);
//! game.apply(Action::EndTurn)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod coord;
mod error;
mod game;
mod layout;
mod phases;
mod rule_table;
mod scoring;
mod snapshot;
mod state;
mod types;

pub mod contracts;
pub mod invariants;
pub mod rules;

// Crate-level exports - Coordinates
pub use coord::{CELL_COUNT, COLUMNS, Cell, CoordinateError, Direction, ROWS};

// Crate-level exports - Domain types
pub use types::{Piece, PieceId, PieceType, Side, base_type_name};

// Crate-level exports - Board
pub use board::{Board, BoardError, BoardRecord, PlacedPiece};

// Crate-level exports - Loaded data
pub use layout::{Layout, LayoutEntry, LayoutError};
pub use rule_table::{RuleEntry, RuleTable, RuleTableError};

// Crate-level exports - Rules
pub use rules::{
    AttackMode, CaptureError, CaptureOutcome, CapturedPiece, MoveSet, check_winner,
    execute_capture, generate_attacks, generate_moves,
};

// Crate-level exports - Turn state machine
pub use action::{Action, IllegalAction};
pub use error::EngineError;
pub use game::Game;
pub use phases::{TurnPhase, Victory, WinCondition, Winner};
pub use state::{Candidates, CapturedBySide, GameState, MoveLogEntry};

// Crate-level exports - Sync and scoring
pub use scoring::{CAPTURABLE_PIECES, FinalScore, ScoringTable, final_score, score};
pub use snapshot::Snapshot;
