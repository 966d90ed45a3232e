//! Pluggable destination-legality rules.
//!
//! The move pipeline delegates its piece-legality step to a
//! [`MoveRule`]. The engine itself is rule-agnostic: swapping the rule
//! changes which destinations a piece may reach without touching the
//! validation or execution machinery. Full movement geometry (sliding
//! paths, blocking, pawn mechanics, castling rights, check) plugs in
//! here.

mod base;

pub use base::BaseRule;

use crate::board::{Board, PieceRecord};
use board_core::Square;

/// Destination-legality predicate for a single piece.
///
/// Implementations see the full board occupancy and the moving piece's
/// record, and decide whether `to` is a reachable destination. They do
/// not re-check turn order, ownership, or game state; the pipeline
/// handles those before consulting the rule.
pub trait MoveRule {
    /// Returns true if `piece` may move to `to` on this board.
    fn is_legal(&self, board: &Board, piece: &PieceRecord, to: Square) -> bool;
}
