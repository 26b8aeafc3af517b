//! In-memory stores for tests and `--memory-store` runs

use super::{
    AuthStore, GameRecord, GameStore, StoreError, StoreResult, UserRecord, UserStore,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::GameId;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
struct GameTable {
    next_id: GameId,
    records: HashMap<GameId, GameRecord>,
}

/// All three stores in process memory
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    tokens: RwLock<HashMap<String, String>>,
    games: RwLock<GameTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_auth(&self, username: &str) -> StoreResult<String> {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().insert(token.clone(), username.to_string());
        Ok(token)
    }

    async fn resolve_token(&self, token: &str) -> StoreResult<Option<String>> {
        Ok(self.tokens.read().get(token).cloned())
    }

    async fn delete_auth(&self, token: &str) -> StoreResult<bool> {
        Ok(self.tokens.write().remove(token).is_some())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.tokens.write().clear();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: UserRecord) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn get_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.users.write().clear();
        Ok(())
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create_game(&self, game_name: &str) -> StoreResult<GameId> {
        let mut table = self.games.write();
        table.next_id += 1;
        let game_id = table.next_id;
        table.records.insert(game_id, GameRecord::new(game_id, game_name));
        Ok(game_id)
    }

    async fn get_game(&self, game_id: GameId) -> StoreResult<Option<GameRecord>> {
        Ok(self.games.read().records.get(&game_id).cloned())
    }

    async fn list_games(&self) -> StoreResult<Vec<GameRecord>> {
        let table = self.games.read();
        let mut records: Vec<GameRecord> = table.records.values().cloned().collect();
        records.sort_by_key(|record| record.game_id);
        Ok(records)
    }

    async fn update_game(&self, record: &GameRecord) -> StoreResult<()> {
        let mut table = self.games.write();
        match table.records.get_mut(&record.game_id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut table = self.games.write();
        table.records.clear();
        table.next_id = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::{Move, Position};

    #[tokio::test]
    async fn test_tokens_resolve_until_deleted() {
        let store = MemoryStore::new();
        let token = store.create_auth("alice").await.unwrap();

        assert_eq!(
            store.resolve_token(&token).await.unwrap(),
            Some("alice".to_string())
        );
        assert!(store.delete_auth(&token).await.unwrap());
        assert_eq!(store.resolve_token(&token).await.unwrap(), None);
        assert!(!store.delete_auth(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_user_conflicts() {
        let store = MemoryStore::new();
        let user = UserRecord {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            email: "a@example.com".to_string(),
        };
        store.create_user(user.clone()).await.unwrap();
        assert!(matches!(
            store.create_user(user).await,
            Err(StoreError::Conflict)
        ));
    }

    #[tokio::test]
    async fn test_game_ids_increment_and_updates_persist() {
        let store = MemoryStore::new();
        let first = store.create_game("one").await.unwrap();
        let second = store.create_game("two").await.unwrap();
        assert_eq!((first, second), (1, 2));

        let mut record = store.get_game(first).await.unwrap().unwrap();
        record
            .game
            .apply_move(&Move::new(Position::new(2, 5), Position::new(4, 5)))
            .unwrap();
        store.update_game(&record).await.unwrap();

        let reloaded = store.get_game(first).await.unwrap().unwrap();
        assert_eq!(reloaded, record);
        assert_eq!(store.list_games().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_game_fails() {
        let store = MemoryStore::new();
        let ghost = GameRecord::new(99, "ghost");
        assert!(matches!(
            store.update_game(&ghost).await,
            Err(StoreError::NotFound)
        ));
    }
}
