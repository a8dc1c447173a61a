//! Hand positions and the masked per-viewer view of a game.

use serde::{Deserialize, Serialize};

/// One of the four fixed slots in a player's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];
}

/// The two cards of their own hand a player is allowed to see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleHand {
    pub bottom_left: String,
    pub bottom_right: String,
}

/// What one viewer is allowed to know about a game.
///
/// This is the only game shape that ever reaches a client. It carries pile
/// sizes rather than pile contents, and no card belonging to another player.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub game_id: String,
    pub all_here: bool,
    pub draw_size: usize,
    pub discard_size: usize,
    pub game_over: bool,
    /// Name of the player who knocked, once someone has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knocker: Option<String>,
    /// The viewer's own bottom row. Absent when the viewer holds no hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<VisibleHand>,
    pub number_of_players: usize,
    /// Final scores by player index; populated only once the game is over.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_discard: Option<String>,
    /// Top of the draw pile; only the turn-holder sees this, and only after
    /// peeking this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_draw: Option<String>,
    pub your_turn: bool,
}
