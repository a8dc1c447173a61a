//! Client-server messaging protocol for the Golf service.
//!
//! Inbound frames are one JSON object per message:
//! `{ "command": "<name>", "<name>Request": { ... }, "id": <int> }`.
//! Outbound frames use a single tagged envelope ([`ServerMsg`]).

use serde::{Deserialize, Serialize};

use crate::game::{GameStateView, Position};

/// One inbound frame. Exactly one `*_request` payload is expected, matching
/// the `command` field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFrame {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_request: Option<RegisterRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_request: Option<NewGameRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_request: Option<JoinRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peek_request: Option<PeekRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard_draw_request: Option<DiscardDrawRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_draw_request: Option<SwapDrawRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_discard_request: Option<SwapDiscardRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knock_request: Option<KnockRequest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    pub username: String,
    pub number_of_players: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub username: String,
    pub game_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeekRequest {
    pub username: String,
    pub game_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardDrawRequest {
    pub username: String,
    pub game_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDrawRequest {
    pub username: String,
    pub game_id: String,
    pub position: Position,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDiscardRequest {
    pub username: String,
    pub game_id: String,
    pub position: Position,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockRequest {
    pub username: String,
    pub game_id: String,
}

/// The command set the router dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    Register,
    New,
    Join,
    Peek,
    DiscardDraw,
    SwapDraw,
    SwapDiscard,
    Knock,
}

impl ClientCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "register" => Some(ClientCommand::Register),
            "new" => Some(ClientCommand::New),
            "join" => Some(ClientCommand::Join),
            "peek" => Some(ClientCommand::Peek),
            "discardDraw" => Some(ClientCommand::DiscardDraw),
            "swapDraw" => Some(ClientCommand::SwapDraw),
            "swapDiscard" => Some(ClientCommand::SwapDiscard),
            "knock" => Some(ClientCommand::Knock),
            _ => None,
        }
    }
}

/// Typed error envelope sent only to the offending requester.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMsg {
    pub code: String,
    pub message: String,
    /// Echo of the request id, when the frame carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// Messages that the server can send to clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMsg {
    Registered { username: String, in_game: bool },
    State(GameStateView),
    Error(ErrorMsg),
}
