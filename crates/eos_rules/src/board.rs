//! Arena-backed board with an O(1) occupancy index.
//!
//! Pieces live in a fixed arena addressed by [`PieceId`]. Two tables are kept
//! in lockstep: `positions` (id → cell) and `occupancy` (cell → id). Every
//! mutation goes through [`Board::relocate`] or [`Board::remove`], which
//! update both or neither.

use crate::coord::{CELL_COUNT, COLUMNS, Cell, ROWS};
use crate::types::{Piece, PieceId, PieceType, Side};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Board corruption or misuse, tagged with the mutation site that found it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Board error: {} at {}:{}", message, file, line)]
pub struct BoardError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
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

/// The board: piece arena plus position and occupancy tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardRecord", try_from = "BoardRecord")]
pub struct Board {
    pieces: Vec<Piece>,
    positions: Vec<Option<Cell>>,
    occupancy: Vec<Option<PieceId>>,
}

/// Serialized form of a piece together with its cell (`None` once captured).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    /// The piece record.
    #[serde(flatten)]
    pub piece: Piece,
    /// Current cell, or `None` if captured.
    pub cell: Option<Cell>,
}

/// Wire form of a [`Board`]: the id → cell mapping with piece records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    /// Every piece ever created, in id order.
    pub pieces: Vec<PlacedPiece>,
}

impl Board {
    /// Builds a board from placed pieces.
    ///
    /// Ids must be exactly `0..n` (in any order), cells must be playable and
    /// no two live pieces may share a cell.
    #[track_caller]
    pub fn from_placements(
        placements: impl IntoIterator<Item = PlacedPiece>,
    ) -> Result<Self, BoardError> {
        let mut placements: Vec<PlacedPiece> = placements.into_iter().collect();
        placements.sort_by_key(|p| p.piece.id());

        if placements.len() > usize::from(u8::MAX) + 1 {
            return Err(BoardError::new(format!(
                "too many pieces: {}",
                placements.len()
            )));
        }

        let mut board = Self {
            pieces: Vec::with_capacity(placements.len()),
            positions: Vec::with_capacity(placements.len()),
            occupancy: vec![None; CELL_COUNT],
        };

        for (expected, placed) in placements.into_iter().enumerate() {
            let id = placed.piece.id();
            if id.index() != expected {
                return Err(BoardError::new(format!(
                    "piece ids must be dense from 0; found {} at slot {}",
                    id, expected
                )));
            }
            if let Some(cell) = placed.cell {
                if !cell.is_valid() {
                    return Err(BoardError::new(format!(
                        "piece {} placed on unplayable cell {}",
                        id, cell
                    )));
                }
                if let Some(other) = board.occupancy[cell.index()] {
                    return Err(BoardError::new(format!(
                        "pieces {} and {} both occupy {}",
                        other, id, cell
                    )));
                }
                board.occupancy[cell.index()] = Some(id);
            }
            board.positions.push(placed.cell);
            board.pieces.push(placed.piece);
        }

        Ok(board)
    }

    /// Returns the piece record for `id`, captured or not.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index())
    }

    /// Current cell of `id`, or `None` if captured or unknown.
    pub fn position(&self, id: PieceId) -> Option<Cell> {
        self.positions.get(id.index()).copied().flatten()
    }

    /// Id of the piece on `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<PieceId> {
        self.occupancy[cell.index()]
    }

    /// The piece on `cell`, if any.
    pub fn piece_at(&self, cell: Cell) -> Option<&Piece> {
        self.occupant(cell).and_then(|id| self.piece(id))
    }

    /// True if any piece stands on `cell`.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// True if `id` is still on the board.
    pub fn is_on_board(&self, id: PieceId) -> bool {
        self.position(id).is_some()
    }

    /// Total number of pieces ever created on this board.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Live pieces with their cells, in id order.
    pub fn live_pieces(&self) -> impl Iterator<Item = (&Piece, Cell)> {
        self.pieces
            .iter()
            .zip(self.positions.iter())
            .filter_map(|(piece, cell)| cell.map(|c| (piece, c)))
    }

    /// Number of live pieces owned by `side`.
    pub fn count(&self, side: Side) -> usize {
        self.live_pieces()
            .filter(|(piece, _)| piece.owner() == side)
            .count()
    }

    /// Number of live Supremo pieces owned by `side`.
    pub fn supremo_count(&self, side: Side) -> usize {
        self.live_pieces()
            .filter(|(piece, _)| piece.owner() == side && piece.piece_type() == PieceType::Supremo)
            .count()
    }

    /// True if `side` still has its Supremo.
    pub fn has_supremo(&self, side: Side) -> bool {
        self.supremo_count(side) > 0
    }

    /// Moves `id` to the empty cell `to`, updating both tables.
    ///
    /// Errors carry the location of the caller that requested the mutation.
    #[track_caller]
    pub(crate) fn relocate(&mut self, id: PieceId, to: Cell) -> Result<Cell, BoardError> {
        let Some(from) = self.position(id) else {
            return Err(BoardError::new(format!("piece {} is not on the board", id)));
        };
        if let Some(other) = self.occupant(to) {
            warn!(%id, %other, %to, "Relocation onto occupied cell");
            return Err(BoardError::new(format!(
                "cannot move {} onto {}: occupied by {}",
                id, to, other
            )));
        }
        self.occupancy[from.index()] = None;
        self.occupancy[to.index()] = Some(id);
        self.positions[id.index()] = Some(to);
        debug!(%id, %from, %to, "Piece relocated");
        Ok(from)
    }

    /// Takes `id` off the board, returning the cell it stood on.
    #[track_caller]
    pub(crate) fn remove(&mut self, id: PieceId) -> Result<Cell, BoardError> {
        let Some(cell) = self.position(id) else {
            return Err(BoardError::new(format!("piece {} is not on the board", id)));
        };
        self.occupancy[cell.index()] = None;
        self.positions[id.index()] = None;
        debug!(%id, %cell, "Piece removed");
        Ok(cell)
    }

    /// Verifies that the position table and occupancy index agree.
    pub fn check_consistency(&self) -> Result<(), BoardError> {
        if self.positions.len() != self.pieces.len() {
            return Err(BoardError::new("position table and arena differ in length"));
        }
        for (index, cell) in self.positions.iter().enumerate() {
            if let Some(cell) = cell {
                match self.occupancy[cell.index()] {
                    Some(id) if id.index() == index => {}
                    other => {
                        return Err(BoardError::new(format!(
                            "piece #{} thinks it is on {} but the cell holds {:?}",
                            index, cell, other
                        )));
                    }
                }
            }
        }
        for cell in Cell::all() {
            if let Some(id) = self.occupancy[cell.index()]
                && self.position(id) != Some(cell)
            {
                return Err(BoardError::new(format!(
                    "cell {} claims {} but that piece is elsewhere",
                    cell, id
                )));
            }
        }
        Ok(())
    }

    /// Formats the board as a human-readable grid, top row first.
    ///
    /// Player 1 pieces are upper case, player 2 pieces lower case, empty
    /// playable cells are `.` and unplayable cells are blank.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in (1..=ROWS).rev() {
            result.push_str(&format!("{:>2} ", row));
            for col in 0..COLUMNS {
                let symbol = match Cell::new(col, row) {
                    Some(cell) if cell.is_valid() => match self.piece_at(cell) {
                        Some(piece) => glyph(piece),
                        None => '.',
                    },
                    _ => ' ',
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result.push_str("   ");
        for col in 0..COLUMNS {
            result.push(char::from(b'A' + col));
        }
        result
    }
}

fn glyph(piece: &Piece) -> char {
    let c = match piece.piece_type() {
        PieceType::Supremo => 'X',
        PieceType::Oracle => 'O',
        PieceType::Champion => 'C',
        PieceType::Sentinel => 'N',
        PieceType::Archer => 'A',
        PieceType::Rider => 'R',
        PieceType::Steward => 'S',
    };
    match piece.owner() {
        Side::Player1 => c,
        Side::Player2 => c.to_ascii_lowercase(),
    }
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        let pieces = board
            .pieces
            .into_iter()
            .zip(board.positions)
            .map(|(piece, cell)| PlacedPiece { piece, cell })
            .collect();
        Self { pieces }
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = BoardError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        Board::from_placements(record.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: u8, owner: Side, ty: PieceType, cell: &str) -> PlacedPiece {
        PlacedPiece {
            piece: Piece::new(PieceId(id), owner, ty),
            cell: Some(Cell::parse(cell).unwrap()),
        }
    }

    #[test]
    fn test_from_placements_indexes_occupancy() {
        let board = Board::from_placements(vec![
            placed(1, Side::Player2, PieceType::Supremo, "I13"),
            placed(0, Side::Player1, PieceType::Supremo, "I1"),
        ])
        .unwrap();
        assert_eq!(board.occupant(Cell::parse("I1").unwrap()), Some(PieceId(0)));
        assert_eq!(board.position(PieceId(1)), Cell::parse("I13").ok());
        assert!(board.check_consistency().is_ok());
    }

    #[test]
    fn test_rejects_shared_cell() {
        let err = Board::from_placements(vec![
            placed(0, Side::Player1, PieceType::Supremo, "I1"),
            placed(1, Side::Player2, PieceType::Supremo, "I1"),
        ])
        .unwrap_err();
        assert!(err.message.contains("both occupy"));
    }

    #[test]
    fn test_rejects_unplayable_cell_and_sparse_ids() {
        assert!(
            Board::from_placements(vec![placed(0, Side::Player1, PieceType::Supremo, "A2")])
                .is_err()
        );
        assert!(
            Board::from_placements(vec![placed(3, Side::Player1, PieceType::Supremo, "A1")])
                .is_err()
        );
    }

    #[test]
    fn test_relocate_and_remove_keep_tables_in_sync() {
        let mut board = Board::from_placements(vec![
            placed(0, Side::Player1, PieceType::Supremo, "I1"),
            placed(1, Side::Player2, PieceType::Supremo, "I13"),
        ])
        .unwrap();
        let to = Cell::parse("H2").unwrap();
        board.relocate(PieceId(0), to).unwrap();
        assert_eq!(board.occupant(to), Some(PieceId(0)));
        assert!(!board.is_occupied(Cell::parse("I1").unwrap()));

        assert!(board.relocate(PieceId(1), to).is_err());

        board.remove(PieceId(1)).unwrap();
        assert!(!board.is_on_board(PieceId(1)));
        assert!(!board.has_supremo(Side::Player2));
        assert!(board.check_consistency().is_ok());
    }

    #[test]
    fn test_serde_round_trip_keeps_captures() {
        let mut board = Board::from_placements(vec![
            placed(0, Side::Player1, PieceType::Supremo, "I1"),
            placed(1, Side::Player2, PieceType::Archer, "I13"),
        ])
        .unwrap();
        board.remove(PieceId(1)).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }
}
