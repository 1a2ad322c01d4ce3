//! Win detection.

use crate::board::Board;
use crate::phases::{Victory, WinCondition};
use crate::types::Side;
use tracing::instrument;

/// Checks whether `board` decides the game.
///
/// Supremo check first: both gone is a draw, one gone is a win for the other
/// side (reported as elimination if the loser has nothing left at all).
/// Then elimination: a side with zero pieces loses.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Victory> {
    let p1 = board.has_supremo(Side::Player1);
    let p2 = board.has_supremo(Side::Player2);

    match (p1, p2) {
        (false, false) => return Some(Victory::draw(WinCondition::MutualSupremoCapture)),
        (true, false) => return Some(loss_of(Side::Player2, board)),
        (false, true) => return Some(loss_of(Side::Player1, board)),
        (true, true) => {}
    }

    Side::BOTH
        .into_iter()
        .find(|&side| board.count(side) == 0)
        .map(|loser| Victory::player(loser.opponent(), WinCondition::Elimination))
}

fn loss_of(loser: Side, board: &Board) -> Victory {
    let condition = if board.count(loser) == 0 {
        WinCondition::Elimination
    } else {
        WinCondition::SupremoCaptured
    };
    Victory::player(loser.opponent(), condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlacedPiece;
    use crate::coord::Cell;
    use crate::phases::Winner;
    use crate::types::{Piece, PieceId, PieceType};

    fn board(pieces: &[(Side, PieceType, Option<&str>)]) -> Board {
        Board::from_placements(pieces.iter().enumerate().map(|(i, &(side, ty, cell))| {
            PlacedPiece {
                piece: Piece::new(PieceId(i as u8), side, ty),
                cell: cell.map(|c| Cell::parse(c).unwrap()),
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_no_winner_with_both_supremos() {
        let b = board(&[
            (Side::Player1, PieceType::Supremo, Some("I1")),
            (Side::Player2, PieceType::Supremo, Some("I13")),
        ]);
        assert_eq!(check_winner(&b), None);
    }

    #[test]
    fn test_supremo_capture_wins() {
        let b = board(&[
            (Side::Player1, PieceType::Supremo, Some("I1")),
            (Side::Player2, PieceType::Supremo, None),
            (Side::Player2, PieceType::Archer, Some("E13")),
        ]);
        assert_eq!(
            check_winner(&b),
            Some(Victory::player(Side::Player1, WinCondition::SupremoCaptured))
        );
    }

    #[test]
    fn test_both_supremos_gone_is_draw() {
        let b = board(&[
            (Side::Player1, PieceType::Supremo, None),
            (Side::Player2, PieceType::Supremo, None),
            (Side::Player2, PieceType::Archer, Some("E13")),
        ]);
        assert_eq!(check_winner(&b).map(|v| v.winner), Some(Winner::Draw));
    }

    #[test]
    fn test_elimination() {
        let b = board(&[
            (Side::Player1, PieceType::Supremo, Some("I1")),
            (Side::Player2, PieceType::Supremo, None),
        ]);
        assert_eq!(
            check_winner(&b),
            Some(Victory::player(Side::Player1, WinCondition::Elimination))
        );
    }
}
