//! Move ledger records, special-move detection, and algebraic notation.
//!
//! A [`MoveRecord`] is an immutable, append-only history entry. The
//! notation generator inspects pre-move occupancy, so it must run
//! before the move executes.

use crate::board::{Board, PieceId, PieceRecord};
use crate::game::PlayerId;
use board_core::{File, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One executed move in a game's chronological ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    piece: PieceId,
    player: PlayerId,
    from: Square,
    to: Square,
    notation: String,
    played_at: DateTime<Utc>,
}

impl MoveRecord {
    pub(crate) fn new(
        piece: PieceId,
        player: PlayerId,
        from: Square,
        to: Square,
        notation: String,
    ) -> Self {
        MoveRecord {
            piece,
            player,
            from,
            to,
            notation,
            played_at: Utc::now(),
        }
    }

    /// Id of the piece that moved.
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// Id of the player who made the move.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Origin square.
    pub fn from(&self) -> Square {
        self.from
    }

    /// Destination square.
    pub fn to(&self) -> Square {
        self.to
    }

    /// Algebraic notation generated when the move executed.
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// Time the move was recorded.
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

/// True if the destination holds a piece (of either color).
pub fn is_capture(board: &Board, to: Square) -> bool {
    board.piece_at(to).is_some()
}

/// Detects a castling move by shape: a king leaving its home file `e`
/// for one of the castling target files (`g` kingside, `c` queenside).
pub fn is_castling(kind: PieceKind, from: Square, to: Square) -> bool {
    kind == PieceKind::King
        && from.file() == File::E
        && matches!(to.file(), File::G | File::C)
}

/// Detects an en-passant-shaped move: a pawn changing file into an
/// empty square. The pawn it would capture sits beside the destination,
/// not on it; removing that pawn is left to the full-rules extension.
pub fn is_en_passant(board: &Board, kind: PieceKind, from: Square, to: Square) -> bool {
    kind == PieceKind::Pawn && from.file() != to.file() && board.is_empty(to)
}

/// Builds the algebraic notation for a move, from pre-move occupancy.
///
/// Piece letter prefix (omitted for pawns), `x` for captures with the
/// origin file prefixed for pawn captures, then the destination square.
/// Castling replaces the whole string with `O-O` / `O-O-O`. Check and
/// checkmate suffixes hang off detection hooks that are not implemented
/// yet, so they are never emitted.
pub fn algebraic_notation(board: &Board, piece: &PieceRecord, from: Square, to: Square) -> String {
    if is_castling(piece.kind(), from, to) {
        return match to.file() {
            File::G => "O-O".to_string(),
            _ => "O-O-O".to_string(),
        };
    }

    let mut notation = String::new();
    if let Some(letter) = piece.kind().notation_letter() {
        notation.push(letter);
    }

    if is_capture(board, to) {
        if piece.kind() == PieceKind::Pawn {
            notation.push(from.file().to_char());
        }
        notation.push('x');
    }

    notation.push_str(&to.to_algebraic());

    if puts_opponent_in_check(board, piece, to) {
        notation.push(if is_checkmate(board, piece, to) { '#' } else { '+' });
    }

    notation
}

// Check detection needs per-piece attack sets; until the legality
// extension lands, these report false and no suffix is emitted.
fn puts_opponent_in_check(_board: &Board, _piece: &PieceRecord, _to: Square) -> bool {
    false
}

fn is_checkmate(_board: &Board, _piece: &PieceRecord, _to: Square) -> bool {
    false
}
