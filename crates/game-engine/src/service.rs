//! Process-local game registry and service façade.
//!
//! [`GameService`] is the surface a transport layer talks to. Each
//! game aggregate lives behind its own mutex, so a move's whole
//! validate-and-execute sequence holds exactly one game's lock:
//! concurrent operations on different games never contend, and readers
//! of the same game see either the pre-move or the post-move state,
//! never a torn intermediate.

use crate::board::PieceSummary;
use crate::error::GameError;
use crate::game::{Game, GameId, PlayerId};
use crate::mov::MoveRecord;
use crate::rules::{BaseRule, MoveRule};
use board_core::{Color, Square};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Top-level error for service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No game registered under that id.
    #[error("game not found")]
    GameNotFound,

    /// The game rejected the operation.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Registry of live game aggregates, keyed by game id.
///
/// The map itself sits under an `RwLock` (taken only to add, remove,
/// or look up a game); every aggregate behind it has its own `Mutex`
/// scoped to that game. The service also tracks every session token it
/// has issued, as a backstop for the process-wide uniqueness invariant.
pub struct GameService {
    games: RwLock<HashMap<GameId, Arc<Mutex<Game>>>>,
    session_tokens: Mutex<HashSet<String>>,
    rule: Box<dyn MoveRule + Send + Sync>,
}

impl GameService {
    /// Creates a service using the base legality rule.
    pub fn new() -> Self {
        Self::with_rule(Box::new(BaseRule))
    }

    /// Creates a service with a custom legality rule.
    pub fn with_rule(rule: Box<dyn MoveRule + Send + Sync>) -> Self {
        GameService {
            games: RwLock::new(HashMap::new()),
            session_tokens: Mutex::new(HashSet::new()),
            rule,
        }
    }

    /// Creates a new pending game and returns its id.
    pub fn create_game(&self) -> GameId {
        let game = Game::new();
        let id = game.id();
        self.games
            .write()
            .expect("game registry lock poisoned")
            .insert(id, Arc::new(Mutex::new(game)));
        info!(game = %id, "game created");
        id
    }

    fn game(&self, id: GameId) -> Result<Arc<Mutex<Game>>, ServiceError> {
        self.games
            .read()
            .expect("game registry lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(ServiceError::GameNotFound)
    }

    fn with_game<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, ServiceError> {
        let game = self.game(id)?;
        let mut game = game.lock().expect("game lock poisoned");
        let out = f(&mut game)?;
        // Persistence-boundary backstop: the aggregate must still hold
        // its invariants after any mutation.
        game.validate()?;
        Ok(out)
    }

    /// Registers a player; enforces the one-color-per-game and
    /// process-wide session-token uniqueness invariants.
    pub fn add_player(
        &self,
        game_id: GameId,
        name: &str,
        color: Color,
    ) -> Result<PlayerId, ServiceError> {
        let player_id = self.with_game(game_id, |game| {
            let id = game.add_player(name, color)?;
            let token = game
                .player(id)
                .map(|p| p.session_token().to_string())
                .unwrap_or_default();
            let mut tokens = self.session_tokens.lock().expect("token set lock poisoned");
            if !tokens.insert(token) {
                // A v4 collision should never happen; reject rather
                // than hand out a duplicate identity.
                return Err(GameError::InvariantViolation(
                    "duplicate session token".to_string(),
                ));
            }
            Ok(id)
        })?;
        info!(game = %game_id, player = %player_id, %color, "player joined");
        Ok(player_id)
    }

    /// Starts a game; see [`Game::start`] for the preconditions.
    pub fn start_game(&self, game_id: GameId) -> Result<(), ServiceError> {
        self.with_game(game_id, Game::start)?;
        info!(game = %game_id, "game started");
        Ok(())
    }

    /// Submits a move through the full validation pipeline.
    ///
    /// Runs as one atomic unit under the game's lock; a rejection
    /// leaves the aggregate untouched.
    pub fn submit_move(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        from: Square,
        to: Square,
    ) -> Result<MoveRecord, ServiceError> {
        let result = self.with_game(game_id, |game| {
            game.submit_move(player_id, from, to, self.rule.as_ref())
                .map(MoveRecord::clone)
        });
        match &result {
            Ok(record) => {
                debug!(game = %game_id, player = %player_id, notation = record.notation(), "move executed")
            }
            Err(err) => {
                warn!(game = %game_id, player = %player_id, %from, %to, %err, "move rejected")
            }
        }
        result
    }

    /// Returns the coordinate -> occupant mapping for a started game.
    pub fn position_snapshot(
        &self,
        game_id: GameId,
    ) -> Result<HashMap<String, PieceSummary>, ServiceError> {
        self.with_game(game_id, |game| {
            let board = game.board().ok_or(GameError::NotActive)?;
            Ok(board.position_snapshot().clone())
        })
    }

    /// Returns the compact rank-by-rank placement notation.
    pub fn placement_notation(&self, game_id: GameId) -> Result<String, ServiceError> {
        self.with_game(game_id, |game| {
            let board = game.board().ok_or(GameError::NotActive)?;
            Ok(board.placement_notation())
        })
    }

    /// Returns the chronological move ledger.
    pub fn move_history(&self, game_id: GameId) -> Result<Vec<MoveRecord>, ServiceError> {
        self.with_game(game_id, |game| Ok(game.move_history().to_vec()))
    }

    /// Marks a game completed.
    pub fn complete_game(&self, game_id: GameId) -> Result<(), ServiceError> {
        self.with_game(game_id, Game::complete)?;
        info!(game = %game_id, "game completed");
        Ok(())
    }

    /// Marks a game abandoned.
    pub fn abandon_game(&self, game_id: GameId) -> Result<(), ServiceError> {
        self.with_game(game_id, Game::abandon)?;
        info!(game = %game_id, "game abandoned");
        Ok(())
    }

    /// Removes a game and tears down its whole aggregate: board,
    /// pieces, players (and their session tokens), and moves.
    pub fn remove_game(&self, game_id: GameId) -> Result<(), ServiceError> {
        let game = self
            .games
            .write()
            .expect("game registry lock poisoned")
            .remove(&game_id)
            .ok_or(ServiceError::GameNotFound)?;

        let game = game.lock().expect("game lock poisoned");
        let mut tokens = self.session_tokens.lock().expect("token set lock poisoned");
        for player in game.players() {
            tokens.remove(player.session_token());
        }
        info!(game = %game_id, "game removed");
        Ok(())
    }

    /// Number of live games in the registry.
    pub fn game_count(&self) -> usize {
        self.games
            .read()
            .expect("game registry lock poisoned")
            .len()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn seeded() -> (GameService, GameId, PlayerId, PlayerId) {
        let service = GameService::new();
        let game = service.create_game();
        let white = service.add_player(game, "Alice", Color::White).unwrap();
        let black = service.add_player(game, "Bob", Color::Black).unwrap();
        service.start_game(game).unwrap();
        (service, game, white, black)
    }

    #[test]
    fn create_and_remove_game() {
        let service = GameService::new();
        let id = service.create_game();
        assert_eq!(service.game_count(), 1);

        service.remove_game(id).unwrap();
        assert_eq!(service.game_count(), 0);
        assert_eq!(service.remove_game(id), Err(ServiceError::GameNotFound));
    }

    #[test]
    fn unknown_game_is_reported() {
        let (service, game, white, _) = seeded();
        service.remove_game(game).unwrap();
        assert_eq!(
            service.submit_move(game, white, sq("e2"), sq("e4")),
            Err(ServiceError::GameNotFound)
        );
        assert_eq!(
            service.placement_notation(game),
            Err(ServiceError::GameNotFound)
        );
    }

    #[test]
    fn full_flow_through_the_facade() {
        let (service, game, white, black) = seeded();
        assert_eq!(
            service.placement_notation(game).unwrap(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );

        let record = service.submit_move(game, white, sq("e2"), sq("e4")).unwrap();
        assert_eq!(record.notation(), "e4");

        let snapshot = service.position_snapshot(game).unwrap();
        assert!(!snapshot.contains_key("e2"));
        assert_eq!(snapshot["e4"].color, Color::White);

        let history = service.move_history(game).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].notation(), "e4");

        // Ledger reads are stable and replayable.
        assert_eq!(service.move_history(game).unwrap(), history);

        service.submit_move(game, black, sq("e7"), sq("e5")).unwrap();
        assert_eq!(service.move_history(game).unwrap().len(), 2);
    }

    #[test]
    fn snapshot_of_unstarted_game_is_rejected() {
        let service = GameService::new();
        let game = service.create_game();
        assert_eq!(
            service.position_snapshot(game),
            Err(ServiceError::Game(GameError::NotActive))
        );
    }

    #[test]
    fn tokens_freed_on_removal() {
        let (service, game, _, _) = seeded();
        service.remove_game(game).unwrap();
        assert!(service
            .session_tokens
            .lock()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rejection_surfaces_game_error() {
        let (service, game, _, black) = seeded();
        let err = service
            .submit_move(game, black, sq("e7"), sq("e5"))
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Game(GameError::Move(crate::error::MoveError::NotYourTurn))
        );
    }

    #[test]
    fn games_are_isolated() {
        let (service, game_a, white_a, _) = seeded();
        let game_b = service.create_game();
        service.add_player(game_b, "Carol", Color::White).unwrap();
        service.add_player(game_b, "Dave", Color::Black).unwrap();
        service.start_game(game_b).unwrap();

        service
            .submit_move(game_a, white_a, sq("e2"), sq("e4"))
            .unwrap();

        assert_eq!(
            service.placement_notation(game_b).unwrap(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn concurrent_moves_on_different_games() {
        use std::sync::Arc;
        use std::thread;

        let service = Arc::new(GameService::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(thread::spawn(move || {
                let game = service.create_game();
                let white = service.add_player(game, "Alice", Color::White).unwrap();
                let black = service.add_player(game, "Bob", Color::Black).unwrap();
                service.start_game(game).unwrap();
                service.submit_move(game, white, sq("e2"), sq("e4")).unwrap();
                service.submit_move(game, black, sq("e7"), sq("e5")).unwrap();
                service.move_history(game).unwrap().len()
            }));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(service.game_count(), 4);
    }
}
