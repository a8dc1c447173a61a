//! In-process game store.
//!
//! Two coarse locks, one per table, held only across the synchronous body of
//! each call. Game ids and versions are monotonically increasing counters.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{GolfError, GolfResult};
use crate::game::GameState;
use crate::store::GameStore;

#[derive(Default)]
struct GameTable {
    next_game_id: u64,
    next_version: u64,
    games_by_id: HashMap<String, GameState>,
    game_ids_by_user_id: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryGameStore {
    users: RwLock<HashSet<String>>,
    games: RwLock<GameTable>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> GolfError {
    GolfError::internal("store lock poisoned")
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn add_user(&self, user_id: &str) -> GolfResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains(user_id) {
            return Err(GolfError::already_exists("already exists"));
        }
        users.insert(user_id.to_string());
        Ok(())
    }

    async fn user_exists(&self, user_id: &str) -> GolfResult<bool> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.contains(user_id))
    }

    async fn remove_user(&self, user_id: &str) -> GolfResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.remove(user_id);
        Ok(())
    }

    async fn get_users(&self) -> GolfResult<HashSet<String>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.clone())
    }

    async fn new_game(&self, state: GameState) -> GolfResult<GameState> {
        let mut table = self.games.write().map_err(poisoned)?;

        let creator = match state.player(0).name() {
            Some(name) => name.to_string(),
            None => {
                return Err(GolfError::internal(
                    "game cannot be created without a claimed creator",
                ))
            }
        };
        if table.game_ids_by_user_id.contains_key(&creator) {
            return Err(GolfError::invalid_argument("already in game"));
        }

        let game_id = table.next_game_id.to_string();
        table.next_game_id += 1;
        let version = table.next_version.to_string();
        table.next_version += 1;

        let stored = state.with_id_and_version(&game_id, &version);
        table.games_by_id.insert(game_id.clone(), stored.clone());
        table.game_ids_by_user_id.insert(creator, game_id);
        Ok(stored)
    }

    async fn read_game(&self, game_id: &str) -> GolfResult<GameState> {
        let table = self.games.read().map_err(poisoned)?;
        table
            .games_by_id
            .get(game_id)
            .cloned()
            .ok_or_else(|| GolfError::not_found("game not found"))
    }

    async fn read_game_by_user_id(&self, user_id: &str) -> GolfResult<GameState> {
        let table = self.games.read().map_err(poisoned)?;
        table
            .game_ids_by_user_id
            .get(user_id)
            .and_then(|id| table.games_by_id.get(id))
            .cloned()
            .ok_or_else(|| GolfError::not_found("game not found"))
    }

    async fn read_all_games(&self) -> GolfResult<Vec<GameState>> {
        let table = self.games.read().map_err(poisoned)?;
        Ok(table.games_by_id.values().cloned().collect())
    }

    async fn update_game(&self, state: GameState) -> GolfResult<GameState> {
        let mut table = self.games.write().map_err(poisoned)?;

        let game_id = state.game_id().to_string();
        let stored = table
            .games_by_id
            .get(&game_id)
            .ok_or_else(|| GolfError::invalid_argument("game does not exist"))?;
        if stored.is_over() {
            return Err(GolfError::failed_precondition("game is over"));
        }
        if stored.version_id() != state.version_id() {
            return Err(GolfError::failed_precondition("version conflict"));
        }

        let version = table.next_version.to_string();
        table.next_version += 1;
        let updated = state.with_id_and_version(&game_id, &version);

        // Drop mappings for users who left, then map every present player.
        table
            .game_ids_by_user_id
            .retain(|user, mapped| *mapped != game_id || updated.player_index(user).is_some());
        for player in updated.players() {
            if let Some(name) = player.name() {
                table
                    .game_ids_by_user_id
                    .insert(name.to_string(), game_id.clone());
            }
        }

        table.games_by_id.insert(game_id, updated.clone());
        Ok(updated)
    }
}
