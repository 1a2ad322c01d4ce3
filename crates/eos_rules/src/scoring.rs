//! Point totals computed from a move log.
//!
//! Scores are reported outward only; nothing in the rules reads them.

use crate::phases::{Victory, WinCondition, Winner};
use crate::state::MoveLogEntry;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Pieces a side can capture: everything but the Supremo.
pub const CAPTURABLE_PIECES: u32 = 17;

/// End-of-game bonus weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    /// Bonus for winning by elimination.
    pub elimination_bonus: u32,
    /// Bonus for winning by Supremo capture, resignation or timeout.
    pub supremo_bonus: u32,
    /// Weight of the captured-pieces ratio.
    pub ratio_weight: f64,
    /// Denominator of the ratio.
    pub capturable_pieces: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            elimination_bonus: 50,
            supremo_bonus: 30,
            ratio_weight: 20.0,
            capturable_pieces: CAPTURABLE_PIECES,
        }
    }
}

/// Breakdown of a side's final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    /// Sum of captor and defender values over the side's captures.
    pub capture_points: u32,
    /// Number of captures the side made.
    pub captures: u32,
    /// Bonus for the way the game was won (0 for the loser and draws).
    pub win_bonus: u32,
    /// Captured-ratio bonus before rounding.
    pub ratio_bonus: f64,
    /// Rounded total.
    pub total: u32,
}

/// Capture points for `side`: each capture is worth the captor's value plus
/// the defender's value.
pub fn score(move_log: &[MoveLogEntry], side: Side) -> u32 {
    captures_by(move_log, side)
        .map(|entry| {
            entry.piece_type.value() + entry.captured_piece_type.map_or(0, |ty| ty.value())
        })
        .sum()
}

fn captures_by(move_log: &[MoveLogEntry], side: Side) -> impl Iterator<Item = &MoveLogEntry> {
    move_log
        .iter()
        .filter(move |entry| entry.is_capture && entry.player == side)
}

/// Capture points plus win and ratio bonuses.
#[instrument(skip(move_log, table), fields(entries = move_log.len()))]
pub fn final_score(
    move_log: &[MoveLogEntry],
    side: Side,
    victory: Option<&Victory>,
    table: &ScoringTable,
) -> FinalScore {
    let capture_points = score(move_log, side);
    let captures = captures_by(move_log, side).count() as u32;

    let win_bonus = match victory {
        Some(Victory {
            winner: Winner::Player(winner),
            condition,
        }) if *winner == side => match condition {
            WinCondition::Elimination => table.elimination_bonus,
            WinCondition::SupremoCaptured | WinCondition::Resignation | WinCondition::Timeout => {
                table.supremo_bonus
            }
            WinCondition::MutualSupremoCapture => 0,
        },
        _ => 0,
    };

    let ratio_bonus = if table.capturable_pieces == 0 {
        0.0
    } else {
        table.ratio_weight * f64::from(captures) / f64::from(table.capturable_pieces)
    };

    let total = (f64::from(capture_points) + f64::from(win_bonus) + ratio_bonus).round() as u32;
    FinalScore {
        capture_points,
        captures,
        win_bonus,
        ratio_bonus,
        total,
    }
}
