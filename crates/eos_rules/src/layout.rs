//! Initial piece layout, loaded once when a game is constructed.

use crate::board::{Board, PlacedPiece};
use crate::coord::Cell;
use crate::types::{Piece, PieceId, PieceType, Side};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

const STANDARD_LAYOUT: &str = include_str!("../rules/default_layout.toml");

/// One starting placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Stable piece id.
    pub id: u8,
    /// Owning side.
    pub side: Side,
    /// Piece name; suffixes such as `"Archer 2"` are allowed.
    pub piece: String,
    /// Starting cell.
    pub cell: Cell,
}

/// A complete starting layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// All placements.
    #[serde(rename = "piece")]
    pub pieces: Vec<LayoutEntry>,
}

/// Layout load or validation failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Layout error: {} at {}:{}", message, file, line)]
pub struct LayoutError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LayoutError {
    /// Creates a new layout error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl Layout {
    /// The standard 36-piece layout.
    #[instrument]
    pub fn standard() -> Result<Self, LayoutError> {
        Self::from_toml_str(STANDARD_LAYOUT)
    }

    /// Parses a layout from TOML (`[[piece]]` tables).
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, LayoutError> {
        toml::from_str(content).map_err(|e| LayoutError::new(format!("Failed to parse layout: {}", e)))
    }

    /// Loads a layout from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        debug!("Loading layout from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LayoutError::new(format!("Failed to read layout: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Validates the layout and builds the starting board.
    ///
    /// Every side must own exactly one Supremo; ids, cells and occupancy are
    /// checked by [`Board::from_placements`].
    #[instrument(skip(self), fields(pieces = self.pieces.len()))]
    pub fn build_board(&self) -> Result<Board, LayoutError> {
        let mut placements = Vec::with_capacity(self.pieces.len());
        for entry in &self.pieces {
            let piece_type = PieceType::from_name(&entry.piece).ok_or_else(|| {
                LayoutError::new(format!("Unknown piece type {:?} for id {}", entry.piece, entry.id))
            })?;
            placements.push(PlacedPiece {
                piece: Piece::new(PieceId(entry.id), entry.side, piece_type),
                cell: Some(entry.cell),
            });
        }

        let board = Board::from_placements(placements)
            .map_err(|e| LayoutError::new(format!("Invalid layout: {}", e.message)))?;

        for side in Side::BOTH {
            let supremos = board.supremo_count(side);
            if supremos != 1 {
                return Err(LayoutError::new(format!(
                    "{} must start with exactly one Supremo, found {}",
                    side, supremos
                )));
            }
        }

        info!(pieces = board.piece_count(), "Layout built");
        Ok(board)
    }
}
