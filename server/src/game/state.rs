//! The immutable Golf state machine.
//!
//! A `GameState` is a value: every transition is a pure method that returns a
//! new state on success and leaves the receiver untouched on both success and
//! failure. The top of both piles is the back of the vec, matching the deal
//! order (aces leave an unshuffled deck first).

use serde::{Deserialize, Serialize};

use golf_shared::{Card, Position};

use crate::error::{GolfError, GolfResult};
use crate::game::player::Player;

/// Sentinel for "no one has knocked yet".
pub const NO_KNOCK: i32 = -1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    players: Vec<Player>,
    peeked_at_draw_pile: bool,
    whose_turn: usize,
    who_knocked: i32,
    // Identity and version live in the store, not in the persisted document.
    #[serde(skip)]
    game_id: String,
    #[serde(skip)]
    version_id: String,
}

impl GameState {
    /// A freshly dealt game: player 0 to act, no knock, no peek, no identity.
    pub fn new(draw_pile: Vec<Card>, discard_pile: Vec<Card>, players: Vec<Player>) -> Self {
        Self::from_parts(draw_pile, discard_pile, players, false, 0, NO_KNOCK)
    }

    pub fn from_parts(
        draw_pile: Vec<Card>,
        discard_pile: Vec<Card>,
        players: Vec<Player>,
        peeked_at_draw_pile: bool,
        whose_turn: usize,
        who_knocked: i32,
    ) -> Self {
        Self {
            draw_pile,
            discard_pile,
            players,
            peeked_at_draw_pile,
            whose_turn,
            who_knocked,
            game_id: String::new(),
            version_id: String::new(),
        }
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    pub fn peeked_at_draw_pile(&self) -> bool {
        self.peeked_at_draw_pile
    }

    pub fn whose_turn(&self) -> usize {
        self.whose_turn
    }

    pub fn who_knocked(&self) -> i32 {
        self.who_knocked
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// Seat index of `username`, if they hold a hand in this game.
    pub fn player_index(&self, username: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name_matches(username))
    }

    pub fn all_players_present(&self) -> bool {
        self.players.iter().all(|p| p.is_present())
    }

    /// The game ends when the draw pile is exhausted or the turn pointer has
    /// come back around to the knocker.
    pub fn is_over(&self) -> bool {
        self.draw_pile.is_empty() || self.whose_turn as i32 == self.who_knocked
    }

    /// All seat indices holding the minimum score, ties included.
    pub fn winners(&self) -> Vec<usize> {
        let mut winning = Vec::new();
        let mut min_score = 40; // max possible hand is 9 + 10 + Q + K == 39
        for (index, player) in self.players.iter().enumerate() {
            let score = player.score();
            if score < min_score {
                min_score = score;
                winning.clear();
            }
            if score == min_score {
                winning.push(index);
            }
        }
        winning
    }

    fn check_turn(&self, player: usize) -> GolfResult<()> {
        if self.is_over() {
            return Err(GolfError::failed_precondition("game is over"));
        }
        if !self.all_players_present() {
            return Err(GolfError::failed_precondition("not all players have joined"));
        }
        if self.whose_turn != player {
            return Err(GolfError::failed_precondition("not your turn"));
        }
        Ok(())
    }

    fn next_turn(&self) -> usize {
        (self.whose_turn + 1) % self.players.len()
    }

    /// Look at the top of the draw pile. Once per turn; does not advance the
    /// turn.
    pub fn peek_at_draw_pile(&self, player: usize) -> GolfResult<GameState> {
        self.check_turn(player)?;
        if self.peeked_at_draw_pile {
            return Err(GolfError::failed_precondition(
                "you can only peek once per turn",
            ));
        }
        let mut next = self.clone();
        next.peeked_at_draw_pile = true;
        Ok(next)
    }

    /// Take the top draw-pile card into `position`, pushing the displaced
    /// hand card onto the discard pile.
    pub fn swap_for_draw_pile(&self, player: usize, position: Position) -> GolfResult<GameState> {
        self.check_turn(player)?;

        let mut next = self.clone();
        let incoming = next
            .draw_pile
            .pop()
            .ok_or_else(|| GolfError::internal("draw pile empty in live game"))?;
        let displaced = next.players[player].card_at(position);
        next.players[player] = next.players[player].swap_card(incoming, position);
        next.discard_pile.push(displaced);
        next.whose_turn = self.next_turn();
        next.peeked_at_draw_pile = false;
        Ok(next)
    }

    /// Discard the top draw-pile card without touching the hand. Only legal
    /// after peeking this turn.
    pub fn swap_draw_for_discard_pile(&self, player: usize) -> GolfResult<GameState> {
        self.check_turn(player)?;
        if !self.peeked_at_draw_pile {
            return Err(GolfError::failed_precondition(
                "you must peek before discarding",
            ));
        }

        let mut next = self.clone();
        let discarded = next
            .draw_pile
            .pop()
            .ok_or_else(|| GolfError::internal("draw pile empty in live game"))?;
        next.discard_pile.push(discarded);
        next.whose_turn = self.next_turn();
        next.peeked_at_draw_pile = false;
        Ok(next)
    }

    /// Take the top discard-pile card into `position`, discarding the
    /// displaced hand card. Requires no peek.
    pub fn swap_for_discard_pile(&self, player: usize, position: Position) -> GolfResult<GameState> {
        self.check_turn(player)?;

        let mut next = self.clone();
        let incoming = next
            .discard_pile
            .pop()
            .ok_or_else(|| GolfError::internal("discard pile empty in live game"))?;
        let displaced = next.players[player].card_at(position);
        next.players[player] = next.players[player].swap_card(incoming, position);
        next.discard_pile.push(displaced);
        next.whose_turn = self.next_turn();
        next.peeked_at_draw_pile = false;
        Ok(next)
    }

    /// Declare the final round. Every other player gets exactly one more
    /// turn; the knock is never cleared once recorded.
    pub fn knock(&self, player: usize) -> GolfResult<GameState> {
        self.check_turn(player)?;
        if self.who_knocked != NO_KNOCK {
            return Err(GolfError::failed_precondition("someone already knocked"));
        }

        let mut next = self.clone();
        next.who_knocked = player as i32;
        next.whose_turn = self.next_turn();
        next.peeked_at_draw_pile = false;
        Ok(next)
    }

    pub fn with_players(&self, players: Vec<Player>) -> GameState {
        let mut next = self.clone();
        next.players = players;
        next
    }

    pub fn with_id_and_version(&self, game_id: &str, version_id: &str) -> GameState {
        let mut next = self.clone();
        next.game_id = game_id.to_string();
        next.version_id = version_id.to_string();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golf_shared::{Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    // Two claimed players, a two-card draw pile and a one-card discard pile.
    fn two_player_game() -> GameState {
        let p0 = Player::claimed(
            "user1",
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Four, Suit::Clubs),
            card(Rank::Five, Suit::Clubs),
        );
        let p1 = Player::claimed(
            "user2",
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Five, Suit::Diamonds),
        );
        let draw = vec![card(Rank::King, Suit::Hearts), card(Rank::Ace, Suit::Hearts)];
        let discard = vec![card(Rank::Jack, Suit::Spades)];
        GameState::new(draw, discard, vec![p0, p1])
    }

    fn total_cards(g: &GameState) -> usize {
        g.draw_pile().len() + g.discard_pile().len() + 4 * g.players().len()
    }

    #[test]
    fn peek_sets_flag_without_advancing_turn() {
        let g = two_player_game();
        let g2 = g.peek_at_draw_pile(0).unwrap();
        assert!(g2.peeked_at_draw_pile());
        assert_eq!(g2.whose_turn(), 0);
        // receiver unchanged
        assert!(!g.peeked_at_draw_pile());
    }

    #[test]
    fn peek_only_once_per_turn() {
        let g = two_player_game().peek_at_draw_pile(0).unwrap();
        let err = g.peek_at_draw_pile(0).unwrap_err();
        assert_eq!(
            err,
            GolfError::failed_precondition("you can only peek once per turn")
        );
    }

    #[test]
    fn peek_out_of_turn_fails() {
        let g = two_player_game();
        let err = g.peek_at_draw_pile(1).unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("not your turn"));
    }

    #[test]
    fn transitions_blocked_until_all_players_join() {
        let g = two_player_game();
        let unclaimed: Vec<Player> = vec![g.player(0).clone(), g.player(1).unclaim()];
        let waiting = g.with_players(unclaimed);
        let err = waiting.peek_at_draw_pile(0).unwrap_err();
        assert_eq!(
            err,
            GolfError::failed_precondition("not all players have joined")
        );
    }

    #[test]
    fn swap_for_draw_pile_moves_cards_and_advances() {
        let g = two_player_game();
        let top_draw = *g.draw_pile().last().unwrap();
        let displaced = g.player(0).card_at(Position::TopLeft);

        let g2 = g.swap_for_draw_pile(0, Position::TopLeft).unwrap();
        assert_eq!(g2.player(0).card_at(Position::TopLeft), top_draw);
        assert_eq!(*g2.discard_pile().last().unwrap(), displaced);
        assert_eq!(g2.draw_pile().len(), g.draw_pile().len() - 1);
        assert_eq!(g2.whose_turn(), 1);
        assert_eq!(total_cards(&g2), total_cards(&g));

        // receiver unchanged
        assert_eq!(g.player(0).card_at(Position::TopLeft), displaced);
        assert_eq!(g.whose_turn(), 0);
    }

    #[test]
    fn swap_for_draw_pile_out_of_turn_fails_and_changes_nothing() {
        let g = two_player_game();
        let before = g.clone();
        let err = g.swap_for_draw_pile(1, Position::TopLeft).unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("not your turn"));
        assert_eq!(g, before);
    }

    #[test]
    fn discard_from_draw_requires_peek() {
        let g = two_player_game();
        let err = g.swap_draw_for_discard_pile(0).unwrap_err();
        assert_eq!(
            err,
            GolfError::failed_precondition("you must peek before discarding")
        );

        let peeked = g.peek_at_draw_pile(0).unwrap();
        let top_draw = *peeked.draw_pile().last().unwrap();
        let g2 = peeked.swap_draw_for_discard_pile(0).unwrap();
        assert_eq!(*g2.discard_pile().last().unwrap(), top_draw);
        assert_eq!(g2.whose_turn(), 1);
        assert!(!g2.peeked_at_draw_pile());
        assert_eq!(g2.player(0), g.player(0));
    }

    #[test]
    fn swap_for_discard_pile_exchanges_with_discard_top() {
        let g = two_player_game();
        let top_discard = *g.discard_pile().last().unwrap();
        let displaced = g.player(0).card_at(Position::BottomRight);

        let g2 = g.swap_for_discard_pile(0, Position::BottomRight).unwrap();
        assert_eq!(g2.player(0).card_at(Position::BottomRight), top_discard);
        assert_eq!(*g2.discard_pile().last().unwrap(), displaced);
        assert_eq!(g2.discard_pile().len(), g.discard_pile().len());
        assert_eq!(g2.whose_turn(), 1);
        assert_eq!(total_cards(&g2), total_cards(&g));
    }

    #[test]
    fn knock_records_knocker_and_advances() {
        let g = two_player_game();
        assert_eq!(g.who_knocked(), NO_KNOCK);

        let g2 = g.knock(0).unwrap();
        assert_eq!(g2.who_knocked(), 0);
        assert_eq!(g2.whose_turn(), 1);
        assert!(!g2.is_over());

        let err = g2.knock(1).unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("someone already knocked"));
    }

    #[test]
    fn knock_out_of_turn_fails() {
        let g = two_player_game();
        let err = g.knock(1).unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("not your turn"));
        assert_eq!(g.who_knocked(), NO_KNOCK);
    }

    #[test]
    fn game_ends_when_turn_returns_to_knocker() {
        let g = two_player_game();
        let after_knock = g.knock(0).unwrap();
        let finished = after_knock
            .swap_for_discard_pile(1, Position::TopLeft)
            .unwrap();
        assert_eq!(finished.whose_turn(), 0);
        assert_eq!(finished.who_knocked(), 0);
        assert!(finished.is_over());
    }

    #[test]
    fn knock_survives_later_swaps() {
        let g = GameState::from_parts(
            vec![
                card(Rank::King, Suit::Hearts),
                card(Rank::Ace, Suit::Hearts),
                card(Rank::Ace, Suit::Diamonds),
            ],
            vec![card(Rank::Jack, Suit::Spades)],
            vec![
                Player::claimed(
                    "user1",
                    card(Rank::Two, Suit::Clubs),
                    card(Rank::Three, Suit::Clubs),
                    card(Rank::Four, Suit::Clubs),
                    card(Rank::Five, Suit::Clubs),
                ),
                Player::claimed(
                    "user2",
                    card(Rank::Two, Suit::Diamonds),
                    card(Rank::Three, Suit::Diamonds),
                    card(Rank::Four, Suit::Diamonds),
                    card(Rank::Five, Suit::Diamonds),
                ),
                Player::claimed(
                    "user3",
                    card(Rank::Two, Suit::Hearts),
                    card(Rank::Three, Suit::Hearts),
                    card(Rank::Four, Suit::Hearts),
                    card(Rank::Five, Suit::Hearts),
                ),
            ],
            false,
            0,
            NO_KNOCK,
        );
        let g2 = g.knock(0).unwrap();
        let g3 = g2.swap_for_draw_pile(1, Position::TopLeft).unwrap();
        assert_eq!(g3.who_knocked(), 0);
        assert!(!g3.is_over());
        let g4 = g3.swap_for_discard_pile(2, Position::TopLeft).unwrap();
        assert_eq!(g4.who_knocked(), 0);
        assert!(g4.is_over());
    }

    #[test]
    fn game_over_when_draw_pile_empties() {
        let g = two_player_game();
        let g2 = g.swap_for_draw_pile(0, Position::TopLeft).unwrap();
        assert!(!g2.is_over());
        let g3 = g2.swap_for_draw_pile(1, Position::TopLeft).unwrap();
        assert!(g3.is_over());
    }

    #[test]
    fn terminal_state_rejects_every_transition() {
        let over = two_player_game()
            .swap_for_draw_pile(0, Position::TopLeft)
            .unwrap()
            .swap_for_draw_pile(1, Position::TopLeft)
            .unwrap();
        assert!(over.is_over());

        let expected = GolfError::failed_precondition("game is over");
        assert_eq!(over.peek_at_draw_pile(0).unwrap_err(), expected);
        assert_eq!(
            over.swap_for_draw_pile(0, Position::TopLeft).unwrap_err(),
            expected
        );
        assert_eq!(over.swap_draw_for_discard_pile(0).unwrap_err(), expected);
        assert_eq!(
            over.swap_for_discard_pile(0, Position::TopLeft).unwrap_err(),
            expected
        );
        assert_eq!(over.knock(0).unwrap_err(), expected);
    }

    #[test]
    fn winners_include_all_ties() {
        // user1: 2+3+4+5 = 14, user2: same ranks = 14
        let g = two_player_game();
        assert_eq!(g.winners(), vec![0, 1]);

        // Give player 1 a strictly better hand.
        let better = Player::claimed(
            "user2",
            card(Rank::Jack, Suit::Diamonds),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::Ace, Suit::Diamonds),
            card(Rank::Ace, Suit::Clubs),
        );
        let g2 = g.with_players(vec![g.player(0).clone(), better]);
        assert_eq!(g2.winners(), vec![1]);
    }

    #[test]
    fn player_index_finds_claimed_seats() {
        let g = two_player_game();
        assert_eq!(g.player_index("user1"), Some(0));
        assert_eq!(g.player_index("user2"), Some(1));
        assert_eq!(g.player_index("nobody"), None);
    }

    #[test]
    fn serialized_document_omits_identity() {
        let g = two_player_game().with_id_and_version("g7", "3");
        let json = serde_json::to_string(&g).unwrap();
        assert!(!json.contains("g7"));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.game_id(), "");
        let restored = back.with_id_and_version(g.game_id(), g.version_id());
        assert_eq!(restored.game_id(), "g7");
        assert_eq!(restored.version_id(), "3");
        assert_eq!(restored.players(), g.players());
    }
}
