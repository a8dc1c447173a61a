//! Persistence for games and the user registry.
//!
//! `GameStore` is the narrow capability the manager talks to. Two backends
//! implement it: an in-process map for tests and single-node deployments, and
//! a document-store client for real persistence. Both enforce the same
//! optimistic version check on update.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::GolfResult;
use crate::game::GameState;

pub mod doc_db;
pub mod escapist;
pub mod memory;

pub use doc_db::DocDbGameStore;
pub use memory::InMemoryGameStore;

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn add_user(&self, user_id: &str) -> GolfResult<()>;
    async fn user_exists(&self, user_id: &str) -> GolfResult<bool>;
    async fn remove_user(&self, user_id: &str) -> GolfResult<()>;
    async fn get_users(&self) -> GolfResult<HashSet<String>>;

    /// Persist a freshly dealt game and hand back the stored copy with its
    /// assigned id and initial version.
    async fn new_game(&self, state: GameState) -> GolfResult<GameState>;
    async fn read_game(&self, game_id: &str) -> GolfResult<GameState>;
    async fn read_game_by_user_id(&self, user_id: &str) -> GolfResult<GameState>;
    async fn read_all_games(&self) -> GolfResult<Vec<GameState>>;

    /// Replace the stored copy. Fails when the game is unknown, when the
    /// stored copy is already terminal, or when the caller's version is
    /// stale. Refreshes the user-to-game mapping for every present player.
    async fn update_game(&self, state: GameState) -> GolfResult<GameState>;
}
