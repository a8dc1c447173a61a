//! Card types for Golf.

use serde::{Deserialize, Serialize};

/// Card rank values (0=Two, ..., 12=Ace)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    /// Convert from u8 to Rank. Panics if value > 12.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Rank::Two,
            1 => Rank::Three,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            12 => Rank::Ace,
            _ => panic!("Invalid card rank: {}", value),
        }
    }
}

/// Card suit values (0=Clubs, 1=Diamonds, 2=Hearts, 3=Spades)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    /// Convert from u8 to Suit. Panics if value > 3.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            3 => Suit::Spades,
            _ => panic!("Invalid card suit: {}", value),
        }
    }
}

/// A playing card represented as a compact u8 value in 0..52.
///
/// Packing is rank-major so that an unshuffled deck dealt from the back
/// hands out the aces first, then the kings, and so on down to the twos.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card(pub u8);

impl Card {
    /// Create a new card from rank and suit
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card((rank as u8) * 4 + (suit as u8))
    }

    /// Get the rank of this card
    pub fn rank(self) -> Rank {
        Rank::from_u8(self.0 / 4)
    }

    /// Get the suit of this card
    pub fn suit(self) -> Suit {
        Suit::from_u8(self.0 % 4)
    }

    /// Golf point value: Ace=1, number cards face value, Jack=0,
    /// Ten/Queen/King=10.
    pub fn value(self) -> i32 {
        match self.rank() {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Queen | Rank::King => 10,
            Rank::Jack => 0,
        }
    }

    /// Get the rank as a string (2, 3, ..., 10, J, Q, K, A)
    pub fn rank_str(self) -> &'static str {
        match self.rank() {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    /// Get the suit as a single letter (C, D, H, S) for the wire
    pub fn suit_letter(self) -> &'static str {
        match self.suit() {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }

    /// Get the suit as a character (♣, ♦, ♥, ♠)
    pub fn suit_char(self) -> char {
        match self.suit() {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    /// Compact wire label: rank string plus suit letter, e.g. "AS", "10H".
    pub fn code(self) -> String {
        format!("{}{}", self.rank_str(), self.suit_letter())
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank_str(), self.suit_char())
    }
}
