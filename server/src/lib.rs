//! Golf card-game server: an immutable game-state machine behind a
//! websocket command protocol, with pluggable persistence.

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod manager;
pub mod server;
pub mod store;
pub mod view;

pub use error::{GolfError, GolfResult};
