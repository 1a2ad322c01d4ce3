//! Cell addressing on the 17×13 diagonal lattice.
//!
//! Columns run `A`..=`Q` (0..=16) and rows `1`..=`13`. Only cells whose
//! `column + row` is odd are playable, which gives the alternating
//! 9-cell / 8-cell row pattern of the board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of columns on the board.
pub const COLUMNS: u8 = 17;

/// Number of rows on the board.
pub const ROWS: u8 = 13;

/// Number of addressable cells (playable or not), used to size dense tables.
pub const CELL_COUNT: usize = COLUMNS as usize * ROWS as usize;

/// A lattice position.
///
/// A `Cell` is always inside the grid bounds. It may still sit off the
/// playable diamond lattice; use [`Cell::is_valid`] to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    col: u8,
    row: u8,
}

/// Error produced when a cell string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CoordinateError {
    /// The input was empty.
    #[display("Invalid coordinate: empty input")]
    Empty,

    /// The column letter is outside `A`..=`Q`.
    #[display("Invalid coordinate {:?}: column must be A-Q", input)]
    Column {
        /// The rejected input.
        input: String,
    },

    /// The row number is missing, malformed, or outside `1`..=`13`.
    #[display("Invalid coordinate {:?}: row must be 1-13", input)]
    Row {
        /// The rejected input.
        input: String,
    },
}

/// One of the four diagonal directions a piece can travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `(+1, +1)`
    NorthEast,
    /// `(-1, +1)`
    NorthWest,
    /// `(+1, -1)`
    SouthEast,
    /// `(-1, -1)`
    SouthWest,
}

impl Direction {
    /// All four diagonals.
    pub const ALL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Unit offset `(d_col, d_row)` for this direction.
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }
}

impl Cell {
    /// Creates a cell from a zero-based column and one-based row.
    ///
    /// Returns `None` when either coordinate is outside the grid.
    pub fn new(col: u8, row: u8) -> Option<Self> {
        if col < COLUMNS && (1..=ROWS).contains(&row) {
            Some(Self { col, row })
        } else {
            None
        }
    }

    /// Zero-based column (`A` = 0).
    pub fn col(self) -> u8 {
        self.col
    }

    /// One-based row.
    pub fn row(self) -> u8 {
        self.row
    }

    /// True if the cell lies on the playable diamond lattice.
    pub fn is_valid(self) -> bool {
        self.col < COLUMNS && (1..=ROWS).contains(&self.row) && (self.col + self.row) % 2 == 1
    }

    /// Dense index in `0..CELL_COUNT`, row-major.
    pub fn index(self) -> usize {
        (self.row as usize - 1) * COLUMNS as usize + self.col as usize
    }

    /// Moves `distance` cells along `direction`.
    ///
    /// Returns `None` if the result leaves the grid. There is no wraparound.
    pub fn step(self, direction: Direction, distance: u32) -> Option<Cell> {
        let (dc, dr) = direction.delta();
        let distance = i16::try_from(distance).ok()?;
        let col = i16::from(self.col) + dc * distance;
        let row = i16::from(self.row) + dr * distance;
        let col = u8::try_from(col).ok()?;
        let row = u8::try_from(row).ok()?;
        Cell::new(col, row)
    }

    /// Diagonal distance to `other`, if the two cells share a diagonal.
    pub fn diagonal_distance(self, other: Cell) -> Option<u32> {
        let dc = (i16::from(self.col) - i16::from(other.col)).unsigned_abs();
        let dr = (i16::from(self.row) - i16::from(other.row)).unsigned_abs();
        (dc == dr).then_some(u32::from(dc))
    }

    /// Every in-bounds cell, row by row.
    pub fn all() -> impl Iterator<Item = Cell> {
        (1..=ROWS).flat_map(|row| (0..COLUMNS).map(move |col| Cell { col, row }))
    }

    /// Every playable cell, row by row.
    pub fn playable() -> impl Iterator<Item = Cell> {
        Self::all().filter(|cell| cell.is_valid())
    }

    /// Parses the external form, e.g. `"A1"` or `"q13"`.
    #[instrument]
    pub fn parse(input: &str) -> Result<Cell, CoordinateError> {
        let mut chars = input.chars();
        let letter = chars.next().ok_or(CoordinateError::Empty)?;
        let letter = letter.to_ascii_uppercase();
        if !('A'..='Q').contains(&letter) {
            return Err(CoordinateError::Column {
                input: input.to_string(),
            });
        }
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordinateError::Row {
                input: input.to_string(),
            });
        }
        let row: u8 = digits.parse().map_err(|_| CoordinateError::Row {
            input: input.to_string(),
        })?;
        let col = letter as u8 - b'A';
        Cell::new(col, row).ok_or_else(|| CoordinateError::Row {
            input: input.to_string(),
        })
    }

    /// Formats the cell in its external form.
    pub fn format(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", char::from(b'A' + self.col), self.row)
    }
}

impl std::str::FromStr for Cell {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cell::parse(s)
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cell::parse(&value)
    }
}
