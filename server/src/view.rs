//! Projection of a full `GameState` into what one viewer may see.
//!
//! This is the only barrier between an opponent's hidden cards and the wire:
//! nothing below the protocol layer ever serializes a `GameState` toward a
//! client directly.

use golf_shared::{GameStateView, Position, VisibleHand};

use crate::game::state::NO_KNOCK;
use crate::game::GameState;

/// Mask `state` for `username`. The viewer sees their own bottom row, the
/// top of the discard pile, pile sizes, and the top of the draw pile only on
/// their own turn after peeking. Scores appear once the game is over.
pub fn game_state_to_view(state: &GameState, username: &str) -> GameStateView {
    let index = state.player_index(username);
    let game_over = state.is_over();

    let knocker = if state.who_knocked() != NO_KNOCK {
        state
            .player(state.who_knocked() as usize)
            .name()
            .map(|n| n.to_string())
    } else {
        None
    };

    let hand = index.map(|i| {
        let player = state.player(i);
        VisibleHand {
            bottom_left: player.card_at(Position::BottomLeft).code(),
            bottom_right: player.card_at(Position::BottomRight).code(),
        }
    });

    let scores = if game_over {
        state.players().iter().map(|p| p.score()).collect()
    } else {
        Vec::new()
    };

    let your_turn = index == Some(state.whose_turn());
    let top_draw = if state.peeked_at_draw_pile() && your_turn {
        state.draw_pile().last().map(|c| c.code())
    } else {
        None
    };

    GameStateView {
        game_id: state.game_id().to_string(),
        all_here: state.all_players_present(),
        draw_size: state.draw_pile().len(),
        discard_size: state.discard_pile().len(),
        game_over,
        knocker,
        hand,
        number_of_players: state.players().len(),
        scores,
        top_discard: state.discard_pile().last().map(|c| c.code()),
        top_draw,
        your_turn,
    }
}
