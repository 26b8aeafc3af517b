//! Persistence collaborators
//!
//! The session layer only needs three things from storage: resolving an auth
//! token to a username, loading a game record and writing it back. Those
//! contracts, plus the user and game bookkeeping behind the HTTP endpoints,
//! are async traits so the server can run against SQLite or purely in memory.
//!
//! Writes are last-writer-wins. Two concurrent `update_game` calls for the same
//! record do not conflict; the later one replaces the earlier.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chess_engine::{ChessGame, Side};
use serde::Serialize;
use shared::GameId;
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::{init_schema, SqliteStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored game could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unique key already present
    #[error("record already exists")]
    Conflict,

    #[error("record not found")]
    NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// A game plus the usernames occupying each seat
///
/// `None` in a seat means it is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: ChessGame,
}

impl GameRecord {
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: ChessGame::new(),
        }
    }

    pub fn seat(&self, side: Side) -> Option<&str> {
        match side {
            Side::White => self.white_username.as_deref(),
            Side::Black => self.black_username.as_deref(),
        }
    }

    pub fn seat_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::White => &mut self.white_username,
            Side::Black => &mut self.black_username,
        }
    }

    /// Check if `username` occupies the seat for `side`
    pub fn plays(&self, username: &str, side: Side) -> bool {
        self.seat(side) == Some(username)
    }

    /// Side played by `username`, White first when they hold both seats
    pub fn side_of(&self, username: &str) -> Option<Side> {
        [Side::White, Side::Black]
            .into_iter()
            .find(|side| self.plays(username, *side))
    }

    /// Clear every seat held by `username`, returning whether anything changed
    pub fn vacate(&mut self, username: &str) -> bool {
        let mut changed = false;
        for side in [Side::White, Side::Black] {
            if self.plays(username, side) {
                *self.seat_mut(side) = None;
                changed = true;
            }
        }
        changed
    }
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Issue a fresh token for `username`
    async fn create_auth(&self, username: &str) -> StoreResult<String>;

    /// Username the token was issued to, if the token is live
    async fn resolve_token(&self, token: &str) -> StoreResult<Option<String>>;

    /// Revoke a token, returning whether it existed
    async fn delete_auth(&self, token: &str) -> StoreResult<bool>;

    async fn clear(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the username is taken
    async fn create_user(&self, user: UserRecord) -> StoreResult<()>;

    async fn get_user(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    async fn clear(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Create a game in the starting position with both seats open
    async fn create_game(&self, game_name: &str) -> StoreResult<GameId>;

    async fn get_game(&self, game_id: GameId) -> StoreResult<Option<GameRecord>>;

    async fn list_games(&self) -> StoreResult<Vec<GameRecord>>;

    /// Replace the stored record; [`StoreError::NotFound`] if it does not exist
    async fn update_game(&self, record: &GameRecord) -> StoreResult<()>;

    async fn clear(&self) -> StoreResult<()>;
}

/// The three collaborators, usually backed by one implementation
#[derive(Clone)]
pub struct Stores {
    pub auth: Arc<dyn AuthStore>,
    pub users: Arc<dyn UserStore>,
    pub games: Arc<dyn GameStore>,
}

impl Stores {
    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    pub fn sqlite(store: SqliteStore) -> Self {
        Self::from_backend(Arc::new(store))
    }

    fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: AuthStore + UserStore + GameStore + 'static,
    {
        Self {
            auth: backend.clone(),
            users: backend.clone(),
            games: backend,
        }
    }

    /// Wipe users, tokens and games
    pub async fn clear(&self) -> StoreResult<()> {
        self.games.clear().await?;
        self.auth.clear().await?;
        self.users.clear().await
    }
}
