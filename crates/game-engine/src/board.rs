//! Piece registry and derived position cache.
//!
//! A [`Board`] owns every piece of one game. Captured pieces are never
//! deleted; they keep their last coordinate but carry a `captured`
//! flag and are invisible to occupancy queries. The position cache is
//! a pure derived view over the non-captured pieces and is rebuilt in
//! full after every occupancy mutation — with at most 32 pieces the
//! rebuild is cheap, and full recomputation cannot drift.

use crate::error::MoveError;
use board_core::{Color, File, PieceKind, Rank, Square};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Board-local piece identifier, assigned sequentially at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One piece owned by a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceRecord {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    square: Square,
    captured: bool,
}

impl PieceRecord {
    /// Returns this piece's id.
    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Returns the piece kind.
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the piece color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the current coordinate.
    ///
    /// For a captured piece this is the stale coordinate it held when
    /// it left the board; occupancy queries ignore it.
    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    /// Returns true if this piece has been captured.
    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Returns true if `other` belongs to the same side.
    #[inline]
    pub fn same_color(&self, other: &PieceRecord) -> bool {
        self.color == other.color
    }
}

/// Cache entry describing the occupant of one square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSummary {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    pub id: PieceId,
}

/// The piece registry and its derived position cache.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pieces: Vec<PieceRecord>,
    next_id: u32,
    /// Derived view: `"<file><rank>"` -> occupant summary. Never the
    /// source of truth; rebuilt after every occupancy mutation.
    position_cache: HashMap<String, PieceSummary>,
}

impl Board {
    /// Creates an empty board with no pieces.
    pub fn new() -> Self {
        Board::default()
    }

    /// Sets up the standard 32-piece starting layout.
    ///
    /// Idempotent bootstrap: if the board already has any piece this is
    /// a no-op, guarding against double-initialization. Pieces are
    /// created in one pass and the cache is rebuilt once at the end, so
    /// a partially populated board is never observable.
    pub fn setup_initial_position(&mut self) {
        if !self.pieces.is_empty() {
            return;
        }

        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in [Color::White, Color::Black] {
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                self.create_piece(color, kind, Square::new(file, color.back_rank()));
            }
            for file in File::ALL {
                self.create_piece(color, PieceKind::Pawn, Square::new(file, color.pawn_rank()));
            }
        }

        self.rebuild_cache();
    }

    fn create_piece(&mut self, color: Color, kind: PieceKind, square: Square) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.push(PieceRecord {
            id,
            kind,
            color,
            square,
            captured: false,
        });
        id
    }

    /// Returns the non-captured piece occupying `square`, if any.
    ///
    /// A captured piece whose stale coordinate matches is never
    /// returned.
    pub fn piece_at(&self, square: Square) -> Option<&PieceRecord> {
        self.pieces
            .iter()
            .find(|p| !p.captured && p.square == square)
    }

    /// Returns true if no non-captured piece occupies `square`.
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Looks up a piece by id, captured or not.
    pub fn piece(&self, id: PieceId) -> Option<&PieceRecord> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Iterates over all non-captured pieces.
    pub fn active_pieces(&self) -> impl Iterator<Item = &PieceRecord> {
        self.pieces.iter().filter(|p| !p.captured)
    }

    /// Total number of pieces ever created on this board.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Marks a piece captured and rebuilds the position cache.
    ///
    /// The move pipeline guarantees it never captures an already
    /// captured piece; the flag write itself is idempotent.
    pub fn capture(&mut self, id: PieceId) -> Result<(), MoveError> {
        let piece = self
            .pieces
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(MoveError::PieceNotFound)?;
        piece.captured = true;
        self.rebuild_cache();
        Ok(())
    }

    /// Overwrites a piece's coordinate and rebuilds the position cache.
    ///
    /// Legality is the caller's responsibility; the registry applies
    /// the relocation unconditionally.
    pub fn relocate(&mut self, id: PieceId, to: Square) -> Result<(), MoveError> {
        let piece = self
            .pieces
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(MoveError::PieceNotFound)?;
        piece.square = to;
        self.rebuild_cache();
        Ok(())
    }

    /// Recomputes the position cache from the non-captured pieces.
    ///
    /// Always a full rebuild, never an incremental patch.
    pub fn rebuild_cache(&mut self) {
        let cache = self
            .active_pieces()
            .map(|p| {
                (
                    p.square.to_algebraic(),
                    PieceSummary {
                        kind: p.kind,
                        color: p.color,
                        id: p.id,
                    },
                )
            })
            .collect();
        self.position_cache = cache;
    }

    /// Returns the derived coordinate -> occupant mapping.
    pub fn position_snapshot(&self) -> &HashMap<String, PieceSummary> {
        &self.position_cache
    }

    /// Renders the FEN piece-placement field for the current occupancy.
    ///
    /// Ranks 8 down to 1 joined with `/`, files a..h within each rank,
    /// runs of empty squares collapsed to their count. Computed
    /// directly from the registry so it cannot disagree with the
    /// pieces even if the string-keyed cache were stale.
    pub fn placement_notation(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for rank in Rank::ALL.into_iter().rev() {
            let mut row = String::new();
            let mut empty_run = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            row.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        row.push(piece.kind.fen_char(piece.color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            rows.push(row);
        }
        rows.join("/")
    }
}
