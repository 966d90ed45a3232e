//! Minimum-contract legality rule.

use super::MoveRule;
use crate::board::{Board, PieceRecord};
use board_core::Square;

/// The base legality contract shared by every piece kind.
///
/// A destination is allowed when it differs from the piece's current
/// square and is not held by a friendly piece. On-board range is
/// guaranteed by [`Square`] construction. Per-kind movement geometry
/// and path clearance are deliberately not checked here; a rook may
/// "jump" under this rule until a geometry-aware rule replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseRule;

impl MoveRule for BaseRule {
    fn is_legal(&self, board: &Board, piece: &PieceRecord, to: Square) -> bool {
        if piece.square() == to {
            return false;
        }
        match board.piece_at(to) {
            Some(occupant) => !occupant.same_color(piece),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn fresh_board() -> Board {
        let mut board = Board::new();
        board.setup_initial_position();
        board
    }

    #[test]
    fn allows_empty_destination() {
        let board = fresh_board();
        let pawn = board.piece_at(sq("e2")).unwrap();
        assert!(BaseRule.is_legal(&board, pawn, sq("e4")));
    }

    #[test]
    fn rejects_own_square() {
        let board = fresh_board();
        let pawn = board.piece_at(sq("e2")).unwrap();
        assert!(!BaseRule.is_legal(&board, pawn, sq("e2")));
    }

    #[test]
    fn rejects_friendly_occupant() {
        let board = fresh_board();
        let rook = board.piece_at(sq("a1")).unwrap();
        assert!(!BaseRule.is_legal(&board, rook, sq("a2")));
    }

    #[test]
    fn allows_enemy_occupant() {
        let board = fresh_board();
        let rook = board.piece_at(sq("a1")).unwrap();
        assert!(BaseRule.is_legal(&board, rook, sq("a7")));
    }

    #[test]
    fn ignores_path_blocking() {
        // a1 rook to a4 with its own pawn on a2: the base rule does not
        // trace sliding paths, so only the destination matters.
        let board = fresh_board();
        let rook = board.piece_at(sq("a1")).unwrap();
        assert!(BaseRule.is_legal(&board, rook, sq("a4")));
    }
}
