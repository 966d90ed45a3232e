//! Game lifecycle, player roster, and the move pipeline.
//!
//! A [`Game`] exclusively owns its whole aggregate: the board (and
//! through it every piece), both players, and the append-only move
//! ledger. Dropping the game tears all of it down. The
//! [`submit_move`](Game::submit_move) pipeline validates fully before
//! mutating anything, so a rejected move leaves the aggregate
//! untouched.

use crate::board::Board;
use crate::error::{GameError, MoveError};
use crate::mov::{algebraic_notation, MoveRecord};
use crate::rules::MoveRule;
use board_core::{Color, Square};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Process-unique game identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameId(Uuid);

impl GameId {
    pub(crate) fn new() -> Self {
        GameId(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub(crate) fn new() -> Self {
        PlayerId(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered player bound to one game for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: Color,
    session_token: String,
}

impl Player {
    /// Maximum accepted name length.
    pub const MAX_NAME_LEN: usize = 50;

    fn new(name: String, color: Color) -> Self {
        Player {
            id: PlayerId::new(),
            name,
            color,
            session_token: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Opaque session token issued at creation, unique process-wide.
    pub fn session_token(&self) -> &str {
        &self.session_token
    }
}

/// Lifecycle state of a game.
///
/// The only legal transitions are pending -> active and
/// active -> completed / abandoned; none are reversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Pending,
    Active,
    Completed,
    Abandoned,
}

/// One game aggregate: status, roster, board, turn pointer, and ledger.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    status: GameStatus,
    players: Vec<Player>,
    board: Option<Board>,
    moves: Vec<MoveRecord>,
    current_turn: Option<PlayerId>,
}

impl Game {
    /// Creates a new pending game with no players and no board.
    pub fn new() -> Self {
        Game {
            id: GameId::new(),
            status: GameStatus::Pending,
            players: Vec::new(),
            board: None,
            moves: Vec::new(),
            current_turn: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// The board, present once the game has been started.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Registered players, in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The white player, if registered.
    pub fn white_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.color == Color::White)
    }

    /// The black player, if registered.
    pub fn black_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.color == Color::Black)
    }

    /// The other player of the game.
    pub fn opponent_of(&self, id: PlayerId) -> Option<&Player> {
        let me = self.player(id)?;
        let other = me.color.opposite();
        self.players.iter().find(|p| p.color == other)
    }

    /// The player holding the turn, set while the game is active.
    pub fn current_player(&self) -> Option<&Player> {
        self.current_turn.and_then(|id| self.player(id))
    }

    /// True if `id` names a player who may move right now.
    pub fn can_move(&self, id: PlayerId) -> bool {
        self.is_active() && self.current_turn == Some(id)
    }

    /// The chronological, append-only move ledger.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Registers a player before the game starts.
    ///
    /// At most two players, one per color, names 1-50 characters.
    pub fn add_player(&mut self, name: &str, color: Color) -> Result<PlayerId, GameError> {
        if self.status != GameStatus::Pending {
            return Err(GameError::NotPending);
        }
        if name.is_empty() || name.len() > Player::MAX_NAME_LEN {
            return Err(GameError::InvalidName);
        }
        if self.players.len() >= 2 {
            return Err(GameError::GameFull);
        }
        if self.players.iter().any(|p| p.color == color) {
            return Err(GameError::ColorTaken(color));
        }

        let player = Player::new(name.to_string(), color);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Starts the game.
    ///
    /// Requires a pending game with exactly two players, one per
    /// color. On success the game becomes active, white takes the
    /// turn, the board is created if absent, and the initial position
    /// is set up. A precondition failure changes nothing.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Pending {
            return Err(GameError::NotPending);
        }
        let white = self.white_player().map(Player::id);
        if self.players.len() != 2 || white.is_none() || self.black_player().is_none() {
            return Err(GameError::MissingPlayers);
        }

        self.status = GameStatus::Active;
        self.current_turn = white;
        let board = self.board.get_or_insert_with(Board::new);
        board.setup_initial_position();
        Ok(())
    }

    /// Marks an active game finished.
    pub fn complete(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Active {
            return Err(GameError::NotActive);
        }
        self.status = GameStatus::Completed;
        Ok(())
    }

    /// Marks an active game abandoned.
    pub fn abandon(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Active {
            return Err(GameError::NotActive);
        }
        self.status = GameStatus::Abandoned;
        Ok(())
    }

    /// Hands the turn to the player of the opposite color.
    ///
    /// Invoked by the move pipeline after a successful move.
    fn switch_turn(&mut self) {
        self.current_turn = self
            .current_turn
            .and_then(|id| self.opponent_of(id))
            .map(Player::id);
    }

    /// Validates the aggregate invariants of an active game.
    ///
    /// Suitable as a backstop wherever the aggregate crosses a
    /// persistence boundary, not just inside `start`.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.status != GameStatus::Active {
            return Ok(());
        }
        if self.players.len() != 2 {
            return Err(GameError::InvariantViolation(
                "active game must have exactly two players".to_string(),
            ));
        }
        match self.current_turn {
            None => Err(GameError::InvariantViolation(
                "active game must have a current player".to_string(),
            )),
            Some(id) if self.player(id).is_none() => Err(GameError::InvariantViolation(
                "current player must belong to this game".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    /// Validates and executes one move as a single unit.
    ///
    /// The pipeline runs in a fixed order, each step with its own
    /// rejection reason: structural check, origin binding, ownership,
    /// game activity and turn, destination legality. Notation is
    /// generated from pre-move occupancy, then execution applies the
    /// capture, the relocation, the ledger append, and the turn switch.
    /// No mutation happens before validation completes, so every
    /// rejection leaves positions, ledger, and turn pointer unchanged.
    pub fn submit_move(
        &mut self,
        player_id: PlayerId,
        from: Square,
        to: Square,
        rule: &dyn MoveRule,
    ) -> Result<&MoveRecord, GameError> {
        // Structural: distinct squares. Range is enforced by `Square`
        // itself, before any occupancy is consulted.
        if from == to {
            return Err(MoveError::SamePosition.into());
        }

        let player = self.player(player_id).ok_or(GameError::PlayerNotFound)?;
        let player_color = player.color;

        let board = self.board.as_ref().ok_or(MoveError::GameNotActive)?;

        // Origin binding: the moving piece must actually sit at the
        // claimed origin. Guards against stale or forged requests.
        let piece = board.piece_at(from).ok_or(MoveError::NotAtOrigin)?;
        if piece.color() != player_color {
            return Err(MoveError::NotOwner.into());
        }

        if self.status != GameStatus::Active {
            return Err(MoveError::GameNotActive.into());
        }
        if self.current_turn != Some(player_id) {
            return Err(MoveError::NotYourTurn.into());
        }

        if !rule.is_legal(board, piece, to) {
            return Err(MoveError::IllegalDestination.into());
        }

        // Pre-move: notation inspects occupancy before anything moves.
        let notation = algebraic_notation(board, piece, from, to);
        let piece_id = piece.id();
        let target = board.piece_at(to).map(|t| t.id());

        // Execution. Validation is done; these must all take effect
        // together. The ids were resolved against this same board, so
        // the registry calls below cannot fail.
        let board = self.board.as_mut().ok_or(MoveError::GameNotActive)?;
        if let Some(target_id) = target {
            board.capture(target_id)?;
        }
        board.relocate(piece_id, to)?;
        self.moves
            .push(MoveRecord::new(piece_id, player_id, from, to, notation));
        self.switch_turn();

        Ok(self.moves.last().unwrap())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
