//! Deck construction and shuffling.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use golf_shared::Card;

/// All 52 cards in packed order. The back of the vec is the top of the deck,
/// so an unshuffled deal hands out the aces first, then the kings, and so on.
pub fn unshuffled_deck() -> Vec<Card> {
    (0..52).map(Card).collect()
}

/// Produces the ordered deck a new game is dealt from.
pub trait Dealer: Send + Sync {
    fn new_deck(&mut self) -> Vec<Card>;
}

/// Uniform random permutation of a fresh deck.
pub struct ShufflingDealer {
    rng: StdRng,
}

impl ShufflingDealer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ShufflingDealer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dealer for ShufflingDealer {
    fn new_deck(&mut self) -> Vec<Card> {
        let mut deck = unshuffled_deck();
        deck.shuffle(&mut self.rng);
        deck
    }
}

/// Returns the fixed packed order unchanged. Used by tests that need to know
/// exactly which cards land in which hand.
pub struct NoShuffleDealer;

impl Dealer for NoShuffleDealer {
    fn new_deck(&mut self) -> Vec<Card> {
        unshuffled_deck()
    }
}
