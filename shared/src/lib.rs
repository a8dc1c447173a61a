//! Shared types for the Golf card-game service: cards, hand positions,
//! the client/server wire protocol, and the masked per-viewer game view.

pub mod cards;
pub mod game;
pub mod messages;

pub use cards::{Card, Rank, Suit};
pub use game::{GameStateView, Position, VisibleHand};
pub use messages::{
    ClientCommand, CommandFrame, DiscardDrawRequest, ErrorMsg, JoinRequest, KnockRequest,
    NewGameRequest, PeekRequest, RegisterRequest, ServerMsg, SwapDiscardRequest, SwapDrawRequest,
};
