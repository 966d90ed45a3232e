//! Piece kind representation.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The six kinds of pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the FEN character for this kind with the given color.
    ///
    /// White pieces are uppercase, black pieces lowercase.
    pub const fn fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns the algebraic notation prefix letter, or `None` for pawns.
    #[inline]
    pub const fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Rook => Some('R'),
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_chars() {
        assert_eq!(PieceKind::Pawn.fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.fen_char(Color::Black), 'n');
    }

    #[test]
    fn from_fen_char() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('n'),
            Some((PieceKind::Knight, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn notation_letters() {
        assert_eq!(PieceKind::Pawn.notation_letter(), None);
        assert_eq!(PieceKind::Knight.notation_letter(), Some('N'));
        assert_eq!(PieceKind::King.notation_letter(), Some('K'));
        assert_eq!(PieceKind::Rook.notation_letter(), Some('R'));
    }
}
