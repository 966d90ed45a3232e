//! Error types for the game-state engine.
//!
//! Every failure here is scoped to a single operation: callers get a
//! specific reason code, and no state mutation happens on the failing
//! path. Nothing in this module is fatal to the process.

use board_core::Color;
use thiserror::Error;

/// Reasons a submitted move is rejected.
///
/// One variant per validation step, so the transport layer can render
/// an actionable message for each.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Origin and destination name the same square.
    #[error("move must target a different square")]
    SamePosition,

    /// The referenced piece does not exist on this board.
    #[error("piece not found on board")]
    PieceNotFound,

    /// The piece's current coordinate does not match the claimed origin.
    #[error("piece is not at the claimed origin square")]
    NotAtOrigin,

    /// The acting player's color differs from the piece's color.
    #[error("player does not own this piece")]
    NotOwner,

    /// The owning game is not in the active state.
    #[error("game is not active")]
    GameNotActive,

    /// The acting player does not hold the current turn.
    #[error("not current player's turn")]
    NotYourTurn,

    /// The destination fails the piece-legality predicate.
    #[error("illegal destination for this piece")]
    IllegalDestination,
}

/// Errors from game lifecycle and roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The operation requires a pending game.
    #[error("game has already started")]
    NotPending,

    /// The game is not in the active state.
    #[error("game is not active")]
    NotActive,

    /// A player of that color is already registered.
    #[error("a {0} player already exists in this game")]
    ColorTaken(Color),

    /// The game already has two players.
    #[error("game already has two players")]
    GameFull,

    /// Player names must be 1-50 characters.
    #[error("player name must be between 1 and 50 characters")]
    InvalidName,

    /// `start` requires exactly two players, one per color.
    #[error("game needs exactly two players, one per color, to start")]
    MissingPlayers,

    /// The referenced player is not part of this game.
    #[error("player not found in this game")]
    PlayerNotFound,

    /// An aggregate invariant failed a persistence-boundary check.
    ///
    /// Treated as a rejection of the offending operation, never a
    /// crash; the caller retries or surfaces the conflict.
    #[error("game invariant violated: {0}")]
    InvariantViolation(String),

    /// A move was rejected by the validation pipeline.
    #[error(transparent)]
    Move(#[from] MoveError),
}
