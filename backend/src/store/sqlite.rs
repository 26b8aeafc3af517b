//! SQLite-backed stores
//!
//! Runtime-checked `sqlx::query` calls against a pool. The engine game is kept
//! as a JSON column so board, turn and the over flag round-trip together.

use super::{
    AuthStore, GameRecord, GameStore, StoreError, StoreResult, UserRecord, UserStore,
};
use async_trait::async_trait;
use chess_engine::ChessGame;
use shared::GameId;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        email TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS auth (
        token TEXT PRIMARY KEY,
        username TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS games (
        game_id INTEGER PRIMARY KEY AUTOINCREMENT,
        white_username TEXT,
        black_username TEXT,
        game_name TEXT NOT NULL,
        game TEXT NOT NULL
    );",
];

/// Create the tables if they are missing
pub async fn init_schema(pool: &Pool<Sqlite>) -> StoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct SqliteStore {
    db: Pool<Sqlite>,
}

impl SqliteStore {
    /// Wrap a pool, creating the schema first
    pub async fn connect(db: Pool<Sqlite>) -> StoreResult<Self> {
        init_schema(&db).await?;
        Ok(Self { db })
    }
}

fn read_game(row: &SqliteRow) -> StoreResult<GameRecord> {
    let encoded: String = row.try_get("game")?;
    let game: ChessGame = serde_json::from_str(&encoded)?;
    Ok(GameRecord {
        game_id: row.try_get("game_id")?,
        white_username: row.try_get("white_username")?,
        black_username: row.try_get("black_username")?,
        game_name: row.try_get("game_name")?,
        game,
    })
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AuthStore for SqliteStore {
    async fn create_auth(&self, username: &str) -> StoreResult<String> {
        let token = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO auth (token, username) VALUES ($1, $2)")
            .bind(&token)
            .bind(username)
            .execute(&self.db)
            .await?;
        Ok(token)
    }

    async fn resolve_token(&self, token: &str) -> StoreResult<Option<String>> {
        let row = sqlx::query("SELECT username FROM auth WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(|row| row.try_get::<String, _>("username")).transpose()?)
    }

    async fn delete_auth(&self, token: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM auth WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM auth").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: UserRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, email) VALUES ($1, $2, $3)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT username, password_hash, email FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(UserRecord {
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            email: row.try_get("email")?,
        }))
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM users").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for SqliteStore {
    async fn create_game(&self, game_name: &str) -> StoreResult<GameId> {
        let encoded = serde_json::to_string(&ChessGame::new())?;
        let row = sqlx::query(
            "INSERT INTO games (white_username, black_username, game_name, game)
             VALUES (NULL, NULL, $1, $2) RETURNING game_id",
        )
        .bind(game_name)
        .bind(&encoded)
        .fetch_one(&self.db)
        .await?;
        Ok(row.try_get("game_id")?)
    }

    async fn get_game(&self, game_id: GameId) -> StoreResult<Option<GameRecord>> {
        let row = sqlx::query(
            "SELECT game_id, white_username, black_username, game_name, game
             FROM games WHERE game_id = $1",
        )
        .bind(game_id)
        .fetch_optional(&self.db)
        .await?;
        row.as_ref().map(read_game).transpose()
    }

    async fn list_games(&self) -> StoreResult<Vec<GameRecord>> {
        let rows = sqlx::query(
            "SELECT game_id, white_username, black_username, game_name, game
             FROM games ORDER BY game_id",
        )
        .fetch_all(&self.db)
        .await?;
        rows.iter().map(read_game).collect()
    }

    async fn update_game(&self, record: &GameRecord) -> StoreResult<()> {
        let encoded = serde_json::to_string(&record.game)?;
        let result = sqlx::query(
            "UPDATE games SET white_username = $1, black_username = $2, game_name = $3, game = $4
             WHERE game_id = $5",
        )
        .bind(&record.white_username)
        .bind(&record.black_username)
        .bind(&record.game_name)
        .bind(&encoded)
        .bind(record.game_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM games").execute(&self.db).await?;
        Ok(())
    }
}
