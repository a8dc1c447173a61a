//! A player's 4-card hand and claimed identity.

use serde::{Deserialize, Serialize};

use golf_shared::{Card, Position, Rank};

use crate::error::{GolfError, GolfResult};

/// One seat at the table. Seats are created unclaimed (no name) when a game
/// is formed and claimed exactly once when a user joins. All updates return a
/// new `Player`; the receiver is never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    name: Option<String>,
    top_left: Card,
    top_right: Card,
    bottom_left: Card,
    bottom_right: Card,
}

impl Player {
    pub fn unclaimed(top_left: Card, top_right: Card, bottom_left: Card, bottom_right: Card) -> Self {
        Self {
            name: None,
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    pub fn claimed(
        name: impl Into<String>,
        top_left: Card,
        top_right: Card,
        bottom_left: Card,
        bottom_right: Card,
    ) -> Self {
        Self {
            name: Some(name.into()),
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.name.is_some()
    }

    pub fn name_matches(&self, username: &str) -> bool {
        self.name.as_deref() == Some(username)
    }

    /// Claim this seat. Fails if someone already holds it.
    pub fn claim_hand(&self, username: &str) -> GolfResult<Player> {
        if self.is_present() {
            return Err(GolfError::failed_precondition("already claimed"));
        }
        let mut claimed = self.clone();
        claimed.name = Some(username.to_string());
        Ok(claimed)
    }

    /// Release this seat, keeping its cards.
    pub fn unclaim(&self) -> Player {
        let mut released = self.clone();
        released.name = None;
        released
    }

    pub fn card_at(&self, position: Position) -> Card {
        match position {
            Position::TopLeft => self.top_left,
            Position::TopRight => self.top_right,
            Position::BottomLeft => self.bottom_left,
            Position::BottomRight => self.bottom_right,
        }
    }

    /// Returns a new player with exactly one slot replaced.
    pub fn swap_card(&self, card: Card, position: Position) -> Player {
        let mut swapped = self.clone();
        match position {
            Position::TopLeft => swapped.top_left = card,
            Position::TopRight => swapped.top_right = card,
            Position::BottomLeft => swapped.bottom_left = card,
            Position::BottomRight => swapped.bottom_right = card,
        }
        swapped
    }

    /// The 4 cards in position-stable order: TopLeft, TopRight, BottomLeft,
    /// BottomRight.
    pub fn all_cards(&self) -> [Card; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// Hand score. Any two cards sharing a rank cancel each other regardless
    /// of slot, so two of a rank score zero, three score one card, four score
    /// nothing.
    pub fn score(&self) -> i32 {
        let mut unmatched: Vec<Rank> = Vec::with_capacity(4);
        let mut score = 0;
        for card in self.all_cards() {
            if let Some(i) = unmatched.iter().position(|r| *r == card.rank()) {
                score -= card.value();
                unmatched.swap_remove(i);
            } else {
                score += card.value();
                unmatched.push(card.rank());
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golf_shared::{Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn score_sums_unmatched_cards() {
        let p = Player::unclaimed(
            card(Rank::Two, Suit::Clubs),
            card(Rank::Five, Suit::Diamonds),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::King, Suit::Spades),
        );
        assert_eq!(p.score(), 2 + 5 + 0 + 10);
    }

    #[test]
    fn two_pairs_fully_cancel() {
        let p = Player::unclaimed(
            card(Rank::Two, Suit::Clubs),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Ace, Suit::Hearts),
            card(Rank::Ace, Suit::Spades),
        );
        assert_eq!(p.score(), 0);
    }

    #[test]
    fn pairs_cancel_regardless_of_slot() {
        let p = Player::unclaimed(
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::Seven, Suit::Spades),
        );
        assert_eq!(p.score(), 4 + 7);
    }

    #[test]
    fn three_of_a_rank_count_one() {
        let p = Player::unclaimed(
            card(Rank::Six, Suit::Clubs),
            card(Rank::Six, Suit::Diamonds),
            card(Rank::Six, Suit::Hearts),
            card(Rank::Two, Suit::Spades),
        );
        assert_eq!(p.score(), 6 + 2);
    }

    #[test]
    fn score_is_permutation_invariant() {
        let cards = [
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Nine, Suit::Diamonds),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Ace, Suit::Spades),
        ];
        let reference = Player::unclaimed(cards[0], cards[1], cards[2], cards[3]).score();
        // All 24 orderings of 4 cards.
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let mut seen = [false; 4];
                        seen[a] = true;
                        if seen[b] {
                            continue;
                        }
                        seen[b] = true;
                        if seen[c] {
                            continue;
                        }
                        seen[c] = true;
                        if seen[d] {
                            continue;
                        }
                        let p = Player::unclaimed(cards[a], cards[b], cards[c], cards[d]);
                        assert_eq!(p.score(), reference);
                    }
                }
            }
        }
    }

    #[test]
    fn claim_hand_is_one_shot() {
        let p = Player::unclaimed(
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Four, Suit::Clubs),
            card(Rank::Five, Suit::Clubs),
        );
        assert!(!p.is_present());
        let claimed = p.claim_hand("user1").unwrap();
        assert!(claimed.is_present());
        assert!(claimed.name_matches("user1"));
        assert!(!p.is_present());

        let err = claimed.claim_hand("user2").unwrap_err();
        assert_eq!(err, GolfError::failed_precondition("already claimed"));
    }

    #[test]
    fn swap_card_replaces_exactly_one_slot() {
        let p = Player::unclaimed(
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Four, Suit::Clubs),
            card(Rank::Five, Suit::Clubs),
        );
        let incoming = card(Rank::King, Suit::Spades);
        let swapped = p.swap_card(incoming, Position::BottomLeft);
        assert_eq!(swapped.card_at(Position::BottomLeft), incoming);
        assert_eq!(swapped.card_at(Position::TopLeft), p.card_at(Position::TopLeft));
        assert_eq!(swapped.card_at(Position::TopRight), p.card_at(Position::TopRight));
        assert_eq!(
            swapped.card_at(Position::BottomRight),
            p.card_at(Position::BottomRight)
        );
        // receiver untouched
        assert_eq!(p.card_at(Position::BottomLeft), card(Rank::Four, Suit::Clubs));
    }
}
