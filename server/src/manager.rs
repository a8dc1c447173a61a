//! Orchestration between users, the store and the state machine.
//!
//! `GameManager` is not internally synchronized. One actor task owns it and
//! serves commands from a single queue (see `server::actor`); nothing else
//! ever touches it. Every operation follows the same shape: load, run the
//! pure transition, persist only on success.

use std::sync::Arc;

use golf_shared::{Card, Position};

use crate::error::{GolfError, GolfResult};
use crate::game::{Dealer, GameState, Player, ShufflingDealer};
use crate::store::GameStore;

const MIN_PLAYERS: usize = 2;
const MAX_PLAYERS: usize = 5;

fn valid_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '.' | '-')
}

pub struct GameManager {
    store: Arc<dyn GameStore>,
    dealer: Box<dyn Dealer>,
}

impl GameManager {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self::with_dealer(store, Box::new(ShufflingDealer::new()))
    }

    pub fn with_dealer(store: Arc<dyn GameStore>, dealer: Box<dyn Dealer>) -> Self {
        Self { store, dealer }
    }

    pub async fn register_user(&self, user_id: &str) -> GolfResult<String> {
        if user_id.len() < 4 || user_id.len() > 40 {
            return Err(GolfError::invalid_argument(
                "username length must be between 4 and 40 chars",
            ));
        }
        if !user_id.chars().all(valid_username_char) {
            return Err(GolfError::invalid_argument(
                "only alphanumeric, underscore, @, dot, or dash allowed in username",
            ));
        }
        self.store.add_user(user_id).await?;
        Ok(user_id.to_string())
    }

    /// Reconnect support: confirms `user_id` is registered and reports
    /// whether they currently hold a seat in a game.
    pub async fn resume_user(&self, user_id: &str) -> GolfResult<bool> {
        if !self.store.user_exists(user_id).await? {
            return Err(GolfError::not_found("unknown user"));
        }
        match self.store.read_game_by_user_id(user_id).await {
            Ok(_) => Ok(true),
            Err(GolfError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn unregister_user(&self, user_id: &str) -> GolfResult<()> {
        self.store.remove_user(user_id).await
    }

    /// Deal a new game for `user_id` with `players` seats. The creator claims
    /// seat 0; the rest wait for joins. Four cards come off the top of the
    /// deck per seat, then one more seeds the discard pile.
    pub async fn new_game(&mut self, user_id: &str, players: usize) -> GolfResult<GameState> {
        if !self.store.user_exists(user_id).await? {
            return Err(GolfError::invalid_argument("unknown user"));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(GolfError::invalid_argument("2 to 5 players"));
        }

        let mut deck = self.dealer.new_deck();
        let mut seats = Vec::with_capacity(players);
        for seat in 0..players {
            let mut hand = [Card(0); 4];
            for slot in &mut hand {
                *slot = deck
                    .pop()
                    .ok_or_else(|| GolfError::internal("deck underflow while dealing"))?;
            }
            let [tl, tr, bl, br] = hand;
            if seat == 0 {
                seats.push(Player::claimed(user_id, tl, tr, bl, br));
            } else {
                seats.push(Player::unclaimed(tl, tr, bl, br));
            }
        }
        let flipped = deck
            .pop()
            .ok_or_else(|| GolfError::internal("deck underflow while dealing"))?;

        let state = GameState::new(deck, vec![flipped], seats);
        self.store.new_game(state).await
    }

    pub async fn join_game(&self, game_id: &str, user_id: &str) -> GolfResult<GameState> {
        let state = self.store.read_game(game_id).await?;
        if !self.store.user_exists(user_id).await? {
            return Err(GolfError::invalid_argument("unknown user"));
        }
        if state.all_players_present() {
            return Err(GolfError::invalid_argument("no spots available"));
        }

        let mut joined = false;
        let mut players = Vec::with_capacity(state.players().len());
        for player in state.players() {
            if !joined && !player.is_present() {
                players.push(player.claim_hand(user_id)?);
                joined = true;
            } else {
                players.push(player.clone());
            }
        }
        self.store.update_game(state.with_players(players)).await
    }

    /// Give up a seat. The cards stay on the table for the next claimant.
    pub async fn leave_game(&self, game_id: &str, user_id: &str) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let mut players = state.players().to_vec();
        players[index] = players[index].unclaim();
        self.store.update_game(state.with_players(players)).await
    }

    pub async fn peek_at_draw_pile(&self, game_id: &str, user_id: &str) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let next = state.peek_at_draw_pile(index)?;
        self.store.update_game(next).await
    }

    pub async fn swap_draw_for_discard_pile(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let next = state.swap_draw_for_discard_pile(index)?;
        self.store.update_game(next).await
    }

    pub async fn swap_for_draw_pile(
        &self,
        game_id: &str,
        user_id: &str,
        position: Position,
    ) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let next = state.swap_for_draw_pile(index, position)?;
        self.store.update_game(next).await
    }

    pub async fn swap_for_discard_pile(
        &self,
        game_id: &str,
        user_id: &str,
        position: Position,
    ) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let next = state.swap_for_discard_pile(index, position)?;
        self.store.update_game(next).await
    }

    pub async fn knock(&self, game_id: &str, user_id: &str) -> GolfResult<GameState> {
        let state = self.get_game_state_for_user(game_id, user_id).await?;
        let index = self.seat_of(&state, user_id)?;
        let next = state.knock(index)?;
        self.store.update_game(next).await
    }

    /// Authorization gate for reads: only participants may see a game.
    pub async fn get_game_state_for_user(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> GolfResult<GameState> {
        let state = self.store.read_game(game_id).await?;
        if state.player_index(user_id).is_none() {
            return Err(GolfError::invalid_argument("unknown user"));
        }
        Ok(state)
    }

    fn seat_of(&self, state: &GameState, user_id: &str) -> GolfResult<usize> {
        state
            .player_index(user_id)
            .ok_or_else(|| GolfError::invalid_argument("unknown user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::NoShuffleDealer;
    use crate::store::InMemoryGameStore;
    use golf_shared::Rank;

    fn manager() -> GameManager {
        GameManager::with_dealer(
            Arc::new(InMemoryGameStore::new()),
            Box::new(NoShuffleDealer),
        )
    }

    #[tokio::test]
    async fn register_user_validates_length_and_charset() {
        let m = manager();
        let err = m.register_user("").await.unwrap_err();
        assert_eq!(
            err,
            GolfError::invalid_argument("username length must be between 4 and 40 chars")
        );

        let err = m
            .register_user("really_long_username_super_long_it_very_big_and_too_long")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GolfError::invalid_argument("username length must be between 4 and 40 chars")
        );

        let err = m.register_user("weird%$name").await.unwrap_err();
        assert_eq!(
            err,
            GolfError::invalid_argument(
                "only alphanumeric, underscore, @, dot, or dash allowed in username"
            )
        );

        assert_eq!(m.register_user("user.1@host-a").await.unwrap(), "user.1@host-a");
    }

    #[tokio::test]
    async fn register_user_rejects_duplicates() {
        let m = manager();
        m.register_user("foosername").await.unwrap();
        let err = m.register_user("foosername").await.unwrap_err();
        assert_eq!(err, GolfError::already_exists("already exists"));
    }

    #[tokio::test]
    async fn unregister_then_reregister() {
        let m = manager();
        m.register_user("user1").await.unwrap();
        m.unregister_user("user1").await.unwrap();
        m.register_user("user1").await.unwrap();
    }

    #[tokio::test]
    async fn new_game_deals_two_player_table() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();

        let game = m.new_game("user1", 2).await.unwrap();
        assert!(!game.game_id().is_empty());
        assert_eq!(game.draw_pile().len(), 43);
        assert_eq!(game.discard_pile().len(), 1);
        assert_eq!(game.players().len(), 2);
        assert_eq!(game.whose_turn(), 0);
        assert_eq!(game.who_knocked(), -1);
        assert!(!game.is_over());
        assert!(!game.all_players_present());
    }

    #[tokio::test]
    async fn deal_sizes_hold_for_all_player_counts() {
        for players in 2..=5usize {
            let mut m = manager();
            m.register_user("user1").await.unwrap();
            let game = m.new_game("user1", players).await.unwrap();
            assert_eq!(game.draw_pile().len(), 52 - 4 * players - 1);
            assert_eq!(game.discard_pile().len(), 1);
            assert_eq!(game.players().len(), players);
        }
    }

    #[tokio::test]
    async fn unshuffled_deal_gives_aces_then_kings() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();

        for card in game.player(0).all_cards() {
            assert_eq!(card.rank(), Rank::Ace);
        }
        for card in game.player(1).all_cards() {
            assert_eq!(card.rank(), Rank::King);
        }
        assert_eq!(game.discard_pile()[0].rank(), Rank::Queen);
    }

    #[tokio::test]
    async fn new_game_rejects_bad_player_counts() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();

        for n in [0usize, 1, 6] {
            let err = m.new_game("user1", n).await.unwrap_err();
            assert_eq!(err, GolfError::invalid_argument("2 to 5 players"));
        }
    }

    #[tokio::test]
    async fn new_game_rejects_unknown_user() {
        let mut m = manager();
        let err = m.new_game("user1", 2).await.unwrap_err();
        assert_eq!(err, GolfError::invalid_argument("unknown user"));
    }

    #[tokio::test]
    async fn join_fills_the_table() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();

        m.register_user("user2").await.unwrap();
        let joined = m.join_game(game.game_id(), "user2").await.unwrap();
        assert!(joined.all_players_present());
        assert_eq!(joined.player_index("user2"), Some(1));

        m.register_user("user3").await.unwrap();
        let err = m.join_game(game.game_id(), "user3").await.unwrap_err();
        assert_eq!(err, GolfError::invalid_argument("no spots available"));
    }

    #[tokio::test]
    async fn join_rejects_unknown_game_and_user() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();

        let err = m.join_game("no-such-game", "user1").await.unwrap_err();
        assert_eq!(err, GolfError::not_found("game not found"));

        let err = m.join_game(game.game_id(), "ghost_user").await.unwrap_err();
        assert_eq!(err, GolfError::invalid_argument("unknown user"));
    }

    #[tokio::test]
    async fn leave_frees_the_seat() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();
        m.register_user("user2").await.unwrap();
        m.join_game(game.game_id(), "user2").await.unwrap();

        let after = m.leave_game(game.game_id(), "user2").await.unwrap();
        assert!(!after.all_players_present());
        assert_eq!(after.player_index("user2"), None);

        // The freed seat can be claimed again.
        m.register_user("user3").await.unwrap();
        let rejoined = m.join_game(game.game_id(), "user3").await.unwrap();
        assert!(rejoined.all_players_present());
    }

    #[tokio::test]
    async fn knock_respects_turn_order() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();
        m.register_user("user2").await.unwrap();
        m.join_game(game.game_id(), "user2").await.unwrap();

        let err = m.knock(game.game_id(), "user2").await.unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("not your turn"));

        let after = m.knock(game.game_id(), "user1").await.unwrap();
        assert_eq!(after.who_knocked(), 0);
        assert_eq!(after.whose_turn(), 1);
    }

    #[tokio::test]
    async fn failed_transition_leaves_store_untouched() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();
        m.register_user("user2").await.unwrap();
        let joined = m.join_game(game.game_id(), "user2").await.unwrap();

        let err = m
            .swap_for_draw_pile(game.game_id(), "user2", Position::TopLeft)
            .await
            .unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("not your turn"));

        let reloaded = m.get_game_state_for_user(game.game_id(), "user2").await.unwrap();
        assert_eq!(reloaded.version_id(), joined.version_id());
        assert_eq!(reloaded.whose_turn(), 0);
    }

    #[tokio::test]
    async fn peek_then_discard_draw() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();
        m.register_user("user2").await.unwrap();
        m.join_game(game.game_id(), "user2").await.unwrap();

        let err = m
            .swap_draw_for_discard_pile(game.game_id(), "user1")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GolfError::failed_precondition("you must peek before discarding")
        );

        let peeked = m.peek_at_draw_pile(game.game_id(), "user1").await.unwrap();
        assert!(peeked.peeked_at_draw_pile());
        assert_eq!(peeked.whose_turn(), 0);

        let after = m
            .swap_draw_for_discard_pile(game.game_id(), "user1")
            .await
            .unwrap();
        assert_eq!(after.whose_turn(), 1);
        assert_eq!(after.discard_pile().len(), 2);
        assert_eq!(after.draw_pile().len(), 42);
    }

    #[tokio::test]
    async fn reads_are_gated_to_participants() {
        let mut m = manager();
        m.register_user("user1").await.unwrap();
        let game = m.new_game("user1", 2).await.unwrap();
        m.register_user("lurker99").await.unwrap();

        let err = m
            .get_game_state_for_user(game.game_id(), "lurker99")
            .await
            .unwrap_err();
        assert_eq!(err, GolfError::invalid_argument("unknown user"));
    }
}
