//! Core types for the game-state engine.
//!
//! This crate provides the fundamental value types shared across the
//! engine:
//! - [`Color`] for the two sides
//! - [`PieceKind`] for the six piece types
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//!
//! All of these are closed enums (or pairs of them): an out-of-range
//! file, rank, or square is unrepresentable, so higher layers never
//! need to re-validate coordinates they receive as typed values.

mod color;
mod piece;
mod square;

pub use color::Color;
pub use piece::PieceKind;
pub use square::{File, Rank, Square, SquareParseError};
