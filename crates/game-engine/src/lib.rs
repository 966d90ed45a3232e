//! Authoritative game-state engine.
//!
//! This crate keeps one game's piece positions, turn ownership, move
//! ledger, and derived notations mutually consistent:
//! - [`Board`] - piece registry with a derived position cache
//! - [`Game`] - lifecycle state machine, roster, and move pipeline
//! - [`MoveRule`] / [`BaseRule`] - pluggable destination legality
//! - [`GameService`] - process-local façade with per-game locking
//!
//! # Example
//!
//! ```
//! use board_core::{Color, Square};
//! use game_engine::GameService;
//!
//! let service = GameService::new();
//! let game = service.create_game();
//! let alice = service.add_player(game, "Alice", Color::White).unwrap();
//! service.add_player(game, "Bob", Color::Black).unwrap();
//! service.start_game(game).unwrap();
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! let record = service.submit_move(game, alice, e2, e4).unwrap();
//! assert_eq!(record.notation(), "e4");
//! ```

mod board;
mod error;
mod game;
mod mov;
pub mod rules;
mod service;

pub use board::{Board, PieceId, PieceRecord, PieceSummary};
pub use error::{GameError, MoveError};
pub use game::{Game, GameId, GameStatus, Player, PlayerId};
pub use mov::{algebraic_notation, is_capture, is_castling, is_en_passant, MoveRecord};
pub use rules::{BaseRule, MoveRule};
pub use service::{GameService, ServiceError};
