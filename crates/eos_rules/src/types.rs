//! Core domain types for EOS.

use serde::{Deserialize, Serialize};

/// One of the two sides of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Moves first; starts on rows 1-3.
    Player1,
    /// Moves second; starts on rows 11-13.
    Player2,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    /// Both sides, in turn order.
    pub const BOTH: [Side; 2] = [Side::Player1, Side::Player2];
}

/// The seven piece types.
///
/// Variants are ordered from most to least valuable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum PieceType {
    /// King-equivalent; losing it loses the game.
    Supremo,
    /// Long-range mover.
    Oracle,
    /// Heavy fighter.
    Champion,
    /// Guard.
    Sentinel,
    /// Ranged attacker.
    Archer,
    /// Fast mover.
    Rider,
    /// Pawn-equivalent.
    Steward,
}

impl PieceType {
    /// Point value used by scoring (Supremo = 7 ... Steward = 1).
    pub fn value(self) -> u32 {
        match self {
            PieceType::Supremo => 7,
            PieceType::Oracle => 6,
            PieceType::Champion => 5,
            PieceType::Sentinel => 4,
            PieceType::Archer => 3,
            PieceType::Rider => 2,
            PieceType::Steward => 1,
        }
    }

    /// Whether this type may pass through occupied cells on its first move.
    ///
    /// Every home-row type jumps its own front line once; Stewards form
    /// that front line and never do.
    pub fn passes_home_row(self) -> bool {
        !matches!(self, PieceType::Steward)
    }

    /// Looks up a type from a rule-table or layout name.
    ///
    /// Clone and numeric suffixes are ignored, so `"Archer 2a"` resolves to
    /// [`PieceType::Archer`]. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let base = base_type_name(name);
        <PieceType as strum::IntoEnumIterator>::iter()
            .find(|ty| <&'static str>::from(*ty).eq_ignore_ascii_case(base))
    }

    /// The canonical name used in logs and rule tables.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Strips clone and numeric suffixes from a piece name.
///
/// `"Archer 2a"` and `"Archer_2"` both become `"Archer"`.
pub fn base_type_name(name: &str) -> &str {
    let name = name.trim();
    let end = name
        .find(|c: char| c.is_whitespace() || c == '_' || c == '-' || c.is_ascii_digit())
        .unwrap_or(name.len());
    &name[..end]
}

/// Stable identity of a piece for its whole lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{}", _0)]
#[serde(transparent)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Arena index of this piece.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A single piece record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Piece {
    id: PieceId,
    owner: Side,
    #[serde(rename = "type")]
    piece_type: PieceType,
    #[new(default)]
    #[serde(default)]
    has_moved: bool,
    #[new(default)]
    #[serde(default)]
    move_count: u32,
}

impl Piece {
    /// The piece's stable id.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// The side owning this piece.
    pub fn owner(&self) -> Side {
        self.owner
    }

    /// The rule-table type governing this piece.
    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    /// True once the piece has moved at least once.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Number of moves made by this piece (captures do not count).
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Records that the piece has moved once more.
    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
        self.move_count += 1;
    }
}
