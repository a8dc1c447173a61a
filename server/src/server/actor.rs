//! Single-writer ownership of the `GameManager`.
//!
//! One spawned task owns the manager and serves requests from one mpsc
//! queue; callers await replies over oneshot channels. This is the entire
//! synchronization story for the engine: the manager itself holds no locks.

use tokio::sync::{mpsc, oneshot};

use golf_shared::Position;

use crate::error::GolfResult;
use crate::game::GameState;
use crate::manager::GameManager;

pub const COMMAND_QUEUE_SIZE: usize = 256;

/// One engine command, already past all protocol-level validation.
#[derive(Clone, Debug)]
pub enum Action {
    Register {
        username: String,
    },
    /// Rebind an already-registered username after a reconnect.
    Resume {
        username: String,
    },
    NewGame {
        username: String,
        number_of_players: usize,
    },
    Join {
        username: String,
        game_id: String,
    },
    Peek {
        username: String,
        game_id: String,
    },
    DiscardDraw {
        username: String,
        game_id: String,
    },
    SwapDraw {
        username: String,
        game_id: String,
        position: Position,
    },
    SwapDiscard {
        username: String,
        game_id: String,
        position: Position,
    },
    Knock {
        username: String,
        game_id: String,
    },
}

/// What an action produced: a registration acknowledgement, or the updated
/// game plus everyone who should be told about it.
#[derive(Clone, Debug)]
pub enum Outcome {
    Registered {
        username: String,
        in_game: bool,
    },
    Game {
        state: GameState,
        participants: Vec<String>,
    },
}

pub struct ManagerRequest {
    pub action: Action,
    pub reply: oneshot::Sender<GolfResult<Outcome>>,
}

/// Move `manager` onto its owning task and return the command queue.
pub fn spawn_manager(manager: GameManager) -> mpsc::Sender<ManagerRequest> {
    let (tx, mut rx) = mpsc::channel::<ManagerRequest>(COMMAND_QUEUE_SIZE);
    tokio::spawn(async move {
        let mut manager = manager;
        while let Some(req) = rx.recv().await {
            let outcome = apply(&mut manager, req.action).await;
            if let Err(ref e) = outcome {
                tracing::debug!(error = %e, "command rejected");
            }
            // A dropped reply just means the connection went away mid-command.
            let _ = req.reply.send(outcome);
        }
        tracing::info!("command queue closed, manager task exiting");
    });
    tx
}

async fn apply(manager: &mut GameManager, action: Action) -> GolfResult<Outcome> {
    match action {
        Action::Register { username } => {
            let username = manager.register_user(&username).await?;
            Ok(Outcome::Registered {
                username,
                in_game: false,
            })
        }
        Action::Resume { username } => {
            let in_game = manager.resume_user(&username).await?;
            Ok(Outcome::Registered { username, in_game })
        }
        Action::NewGame {
            username,
            number_of_players,
        } => {
            let state = manager.new_game(&username, number_of_players).await?;
            Ok(game_outcome(state))
        }
        Action::Join { username, game_id } => {
            let state = manager.join_game(&game_id, &username).await?;
            Ok(game_outcome(state))
        }
        Action::Peek { username, game_id } => {
            let state = manager.peek_at_draw_pile(&game_id, &username).await?;
            Ok(game_outcome(state))
        }
        Action::DiscardDraw { username, game_id } => {
            let state = manager
                .swap_draw_for_discard_pile(&game_id, &username)
                .await?;
            Ok(game_outcome(state))
        }
        Action::SwapDraw {
            username,
            game_id,
            position,
        } => {
            let state = manager
                .swap_for_draw_pile(&game_id, &username, position)
                .await?;
            Ok(game_outcome(state))
        }
        Action::SwapDiscard {
            username,
            game_id,
            position,
        } => {
            let state = manager
                .swap_for_discard_pile(&game_id, &username, position)
                .await?;
            Ok(game_outcome(state))
        }
        Action::Knock { username, game_id } => {
            let state = manager.knock(&game_id, &username).await?;
            Ok(game_outcome(state))
        }
    }
}

fn game_outcome(state: GameState) -> Outcome {
    let participants = state
        .players()
        .iter()
        .filter_map(|p| p.name().map(|n| n.to_string()))
        .collect();
    Outcome::Game {
        state,
        participants,
    }
}
