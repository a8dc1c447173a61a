//! The Golf game engine: dealing, hands and the immutable state machine.

pub mod dealer;
pub mod player;
pub mod state;

pub use dealer::{unshuffled_deck, Dealer, NoShuffleDealer, ShufflingDealer};
pub use player::Player;
pub use state::GameState;
