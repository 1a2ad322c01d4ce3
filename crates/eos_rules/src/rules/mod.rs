//! Move, attack, capture and win rules.
//!
//! Every function here is pure over a [`Board`](crate::board::Board) and a
//! [`RuleEntry`](crate::rule_table::RuleEntry); the turn state machine in
//! [`crate::game`] decides when they apply.

mod attacks;
mod capture;
mod movegen;
mod win;

pub use attacks::{AttackMode, effective_range, generate_attacks};
pub use capture::{CaptureError, CaptureOutcome, CapturedPiece, execute_capture};
pub(crate) use capture::capture_in_place;
pub use movegen::{ADVANCE_REACH, DEVELOPMENT_REACH, MoveSet, generate_moves, mandatory_moves};
pub use win::check_winner;
