// WebSocket handler: frame parsing, identity checks and fan-out.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};

use owo_colors::OwoColorize;

use golf_shared::{ClientCommand, CommandFrame, ErrorMsg, ServerMsg};

use crate::error::{GolfError, GolfResult};
use crate::server::actor::{Action, ManagerRequest, Outcome};
use crate::server::state::AppState;
use crate::view::game_state_to_view;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let hello = format!("{} {}", "[CONNECT]".bold().green(), "client".bold());
    tracing::info!(%hello);

    // All outbound traffic for this connection funnels through one channel;
    // the registry holds a clone of the sender once the user registers.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMsg>();
    let mut registered: Option<String> = None;

    loop {
        tokio::select! {
            biased;

            outbound = out_rx.recv() => {
                match outbound {
                    Some(msg) => send_ws(&mut socket, &msg).await,
                    None => break,
                }
            }

            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(txt))) => {
                        match serde_json::from_str::<CommandFrame>(&txt) {
                            Ok(frame) => {
                                handle_frame(&state, &out_tx, &mut registered, frame).await;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to parse command frame");
                                tracing::debug!(raw_in = %txt);
                                send_error(&out_tx, None, &GolfError::invalid_argument("malformed command frame"));
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    if let Some(username) = registered {
        state.connections.remove(&username).await;
        tracing::info!(user = %username, "client disconnected");
    } else {
        tracing::info!("client disconnected before registering");
    }
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(txt) => {
            let _ = socket.send(Message::Text(txt)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
        }
    }
}

fn send_error(out: &mpsc::UnboundedSender<ServerMsg>, id: Option<i64>, err: &GolfError) {
    let _ = out.send(ServerMsg::Error(ErrorMsg {
        code: err.code().to_string(),
        message: err.message().to_string(),
        id,
    }));
}

async fn dispatch(state: &AppState, action: Action) -> GolfResult<Outcome> {
    let (reply, rx) = oneshot::channel();
    state
        .manager
        .send(ManagerRequest { action, reply })
        .await
        .map_err(|_| GolfError::internal("engine unavailable"))?;
    rx.await
        .map_err(|_| GolfError::internal("engine unavailable"))?
}

async fn handle_frame(
    state: &AppState,
    out: &mpsc::UnboundedSender<ServerMsg>,
    registered: &mut Option<String>,
    frame: CommandFrame,
) {
    let id = frame.id;
    let Some(command) = ClientCommand::parse(&frame.command) else {
        tracing::warn!(command = %frame.command, "unknown command");
        send_error(out, id, &GolfError::invalid_argument("unknown command"));
        return;
    };

    // The acting username must match this connection's registered identity;
    // a mismatch never reaches the engine.
    fn identity_ok(registered: &Option<String>, username: &str) -> bool {
        registered.as_deref() == Some(username)
    }

    let action = match command {
        ClientCommand::Register => {
            let Some(req) = frame.register_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if registered.is_some() {
                send_error(out, id, &GolfError::failed_precondition("already registered"));
                return;
            }
            register(state, out, registered, id, req.username).await;
            return;
        }
        ClientCommand::New => {
            let Some(req) = frame.new_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::NewGame {
                username: req.username,
                number_of_players: req.number_of_players,
            }
        }
        ClientCommand::Join => {
            let Some(req) = frame.join_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::Join {
                username: req.username,
                game_id: req.game_id,
            }
        }
        ClientCommand::Peek => {
            let Some(req) = frame.peek_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::Peek {
                username: req.username,
                game_id: req.game_id,
            }
        }
        ClientCommand::DiscardDraw => {
            let Some(req) = frame.discard_draw_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::DiscardDraw {
                username: req.username,
                game_id: req.game_id,
            }
        }
        ClientCommand::SwapDraw => {
            let Some(req) = frame.swap_draw_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::SwapDraw {
                username: req.username,
                game_id: req.game_id,
                position: req.position,
            }
        }
        ClientCommand::SwapDiscard => {
            let Some(req) = frame.swap_discard_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::SwapDiscard {
                username: req.username,
                game_id: req.game_id,
                position: req.position,
            }
        }
        ClientCommand::Knock => {
            let Some(req) = frame.knock_request else {
                send_error(out, id, &GolfError::invalid_argument("invalid request"));
                return;
            };
            if !identity_ok(registered, &req.username) {
                send_error(out, id, &GolfError::invalid_argument("username mismatch"));
                return;
            }
            Action::Knock {
                username: req.username,
                game_id: req.game_id,
            }
        }
    };

    match dispatch(state, action).await {
        Ok(Outcome::Game {
            state: game,
            participants,
        }) => {
            // Every connected participant gets their own masked view, not
            // just the requester.
            for participant in &participants {
                let view = game_state_to_view(&game, participant);
                state
                    .connections
                    .send_to(participant, ServerMsg::State(view))
                    .await;
            }
        }
        Ok(other) => {
            tracing::error!(outcome = ?other, "unexpected outcome for game command");
        }
        Err(e) => send_error(out, id, &e),
    }
}

async fn register(
    state: &AppState,
    out: &mpsc::UnboundedSender<ServerMsg>,
    registered: &mut Option<String>,
    id: Option<i64>,
    username: String,
) {
    let result = dispatch(
        state,
        Action::Register {
            username: username.clone(),
        },
    )
    .await;

    let outcome = match result {
        Ok(outcome) => Ok(outcome),
        // A known username with no live connection is a reconnect, not a
        // conflict: rebind it and report whether a game is waiting.
        Err(GolfError::AlreadyExists(_)) if !state.connections.contains(&username).await => {
            dispatch(
                state,
                Action::Resume {
                    username: username.clone(),
                },
            )
            .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(Outcome::Registered { username, in_game }) => {
            state.connections.insert(&username, out.clone()).await;
            *registered = Some(username.clone());
            tracing::info!(user = %username, in_game, "registered");
            let _ = out.send(ServerMsg::Registered { username, in_game });
        }
        Ok(other) => {
            tracing::error!(outcome = ?other, "unexpected outcome for register");
        }
        Err(e) => send_error(out, id, &e),
    }
}
