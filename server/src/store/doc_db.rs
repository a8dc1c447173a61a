//! Document-store backend.
//!
//! Each game is one JSON document in the "games" collection, tagged with
//! every present player's username so it can be found by user. Users live as
//! tiny documents in the "users" collection. Updates ride the document
//! store's own version check, so a stale write surfaces as a version
//! conflict exactly like the in-memory backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{GolfError, GolfResult};
use crate::game::GameState;
use crate::store::escapist::{DocDbClient, DocEgg, DocIdAndVersion};
use crate::store::GameStore;

const GAMES: &str = "games";
const USERS: &str = "users";

pub struct DocDbGameStore {
    client: Arc<dyn DocDbClient>,
}

impl DocDbGameStore {
    pub fn new(client: Arc<dyn DocDbClient>) -> Self {
        Self { client }
    }

    fn game_egg(state: &GameState) -> GolfResult<DocEgg> {
        let bytes = serde_json::to_string(state)
            .map_err(|e| GolfError::internal(format!("failed to serialize game: {e}")))?;
        let mut tags = HashMap::new();
        for player in state.players() {
            if let Some(name) = player.name() {
                tags.insert(name.to_string(), "player".to_string());
            }
        }
        Ok(DocEgg { bytes, tags })
    }

    fn parse_game(bytes: &str, id: &str, version: &str) -> GolfResult<GameState> {
        let state: GameState = serde_json::from_str(bytes)
            .map_err(|e| GolfError::internal(format!("failed to parse stored game: {e}")))?;
        Ok(state.with_id_and_version(id, version))
    }
}

#[async_trait]
impl GameStore for DocDbGameStore {
    async fn add_user(&self, user_id: &str) -> GolfResult<()> {
        if self.user_exists(user_id).await? {
            return Err(GolfError::already_exists("already exists"));
        }
        let egg = DocEgg {
            bytes: user_id.to_string(),
            tags: HashMap::from([("user".to_string(), user_id.to_string())]),
        };
        self.client.insert_doc(USERS, egg).await?;
        Ok(())
    }

    async fn user_exists(&self, user_id: &str) -> GolfResult<bool> {
        let tags = HashMap::from([("user".to_string(), user_id.to_string())]);
        match self.client.find_doc_by_tags(USERS, &tags).await {
            Ok(_) => Ok(true),
            Err(GolfError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn remove_user(&self, _user_id: &str) -> GolfResult<()> {
        // The document service has no delete operation.
        Err(GolfError::failed_precondition(
            "not supported by the document store backend",
        ))
    }

    async fn get_users(&self) -> GolfResult<HashSet<String>> {
        Err(GolfError::failed_precondition(
            "not supported by the document store backend",
        ))
    }

    async fn new_game(&self, state: GameState) -> GolfResult<GameState> {
        let creator = state.player(0).name().ok_or_else(|| {
            GolfError::internal("game cannot be created without a claimed creator")
        })?;
        if self.read_game_by_user_id(creator).await.is_ok() {
            return Err(GolfError::invalid_argument("already in game"));
        }
        let egg = Self::game_egg(&state)?;
        let assigned = self.client.insert_doc(GAMES, egg).await?;
        Ok(state.with_id_and_version(&assigned.id, &assigned.version))
    }

    async fn read_game(&self, game_id: &str) -> GolfResult<GameState> {
        let doc = match self.client.find_doc_by_id(GAMES, game_id).await {
            Ok(doc) => doc,
            Err(GolfError::NotFound(_)) => return Err(GolfError::not_found("game not found")),
            Err(e) => return Err(e),
        };
        Self::parse_game(&doc.bytes, &doc.id, &doc.version)
    }

    async fn read_game_by_user_id(&self, user_id: &str) -> GolfResult<GameState> {
        let tags = HashMap::from([(user_id.to_string(), "player".to_string())]);
        let doc = match self.client.find_doc_by_tags(GAMES, &tags).await {
            Ok(doc) => doc,
            Err(GolfError::NotFound(_)) => return Err(GolfError::not_found("game not found")),
            Err(e) => return Err(e),
        };
        Self::parse_game(&doc.bytes, &doc.id, &doc.version)
    }

    async fn read_all_games(&self) -> GolfResult<Vec<GameState>> {
        // No scan operation in the document service.
        Err(GolfError::failed_precondition(
            "not supported by the document store backend",
        ))
    }

    async fn update_game(&self, state: GameState) -> GolfResult<GameState> {
        let stored = match self.read_game(state.game_id()).await {
            Ok(stored) => stored,
            Err(GolfError::NotFound(_)) => {
                return Err(GolfError::invalid_argument("game does not exist"))
            }
            Err(e) => return Err(e),
        };
        if stored.is_over() {
            return Err(GolfError::failed_precondition("game is over"));
        }

        let egg = Self::game_egg(&state)?;
        let current = DocIdAndVersion {
            id: state.game_id().to_string(),
            version: state.version_id().to_string(),
        };
        let assigned = self.client.update_doc(GAMES, current, egg).await?;
        Ok(state.with_id_and_version(&assigned.id, &assigned.version))
    }
}
