//! Message-oriented boundary: the envelope a connected client sends and the
//! reply the server pushes back.
//!
//! Clients send `{action, data, sessionId}`. The loosely-typed `data` is
//! decoded into a closed [`ClientMessage`] variant per action, so handlers
//! never guess at its shape.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::GenerateMapRequest;
use crate::ids::{MapId, SessionId};
use crate::records::SessionPatch;

/// Action names accepted on the message boundary.
pub const CLIENT_ACTIONS: &[&str] = &["move", "getMap", "generateMap", "saveGameState", "joinGame"];

/// Payload of a `move` action: the player's new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MoveData {
    /// New player column.
    pub x: i32,
    /// New player row.
    pub y: i32,
    /// Map the player moved onto, when it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub current_map: Option<i64>,
}

impl From<MoveData> for SessionPatch {
    fn from(data: MoveData) -> Self {
        Self {
            current_map: data.current_map,
            player_x: Some(data.x),
            player_y: Some(data.y),
            visited_areas: None,
        }
    }
}

/// Payload of a `getMap` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GetMapData {
    /// Map to fetch.
    pub map_id: MapId,
}

/// A decoded client message, one variant per action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Fetch or create the sender's session.
    JoinGame,
    /// Record a new player position.
    Move(MoveData),
    /// Fetch a stored map.
    GetMap(GetMapData),
    /// Generate and store a new map.
    GenerateMap(GenerateMapRequest),
    /// Apply a partial session update.
    SaveGameState(SessionPatch),
}

impl ClientMessage {
    /// Decode the `data` field of an envelope according to `action`.
    ///
    /// A missing or `null` `data` counts as an empty object.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error for an unknown action or for `data`
    /// that does not fit the action's payload.
    pub fn decode(action: &str, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        let data = if data.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            data
        };
        match action {
            "joinGame" => Ok(Self::JoinGame),
            "move" => serde_json::from_value(data).map(Self::Move),
            "getMap" => serde_json::from_value(data).map(Self::GetMap),
            "generateMap" => serde_json::from_value(data).map(Self::GenerateMap),
            "saveGameState" => serde_json::from_value(data).map(Self::SaveGameState),
            other => Err(serde_json::Error::unknown_variant(other, CLIENT_ACTIONS)),
        }
    }

    /// The wire name of this message's action.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::JoinGame => "joinGame",
            Self::Move(_) => "move",
            Self::GetMap(_) => "getMap",
            Self::GenerateMap(_) => "generateMap",
            Self::SaveGameState(_) => "saveGameState",
        }
    }
}

/// Raw envelope as it arrives, before `data` is decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope {
    /// Action name.
    pub action: String,
    /// Action payload of unknown shape.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Sender's session token.
    pub session_id: SessionId,
}

/// A fully decoded client envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEnvelope {
    /// Sender's session token.
    pub session_id: SessionId,
    /// Decoded message.
    pub message: ClientMessage,
}

impl TryFrom<RawEnvelope> for ClientEnvelope {
    type Error = serde_json::Error;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let message = ClientMessage::decode(&raw.action, raw.data)?;
        Ok(Self {
            session_id: raw.session_id,
            message,
        })
    }
}

/// Outcome class of a server reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ReplyType {
    /// The action completed.
    Success,
    /// The action failed; see `error`.
    Error,
}

/// Reply pushed to a client for each message it sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ServerMessage {
    /// Outcome class.
    #[serde(rename = "type")]
    pub reply_type: ReplyType,
    /// Action this reply answers.
    pub action: String,
    /// Result payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub data: Option<serde_json::Value>,
    /// Failure reason on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl ServerMessage {
    /// A success reply carrying `data`.
    pub fn success(action: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            reply_type: ReplyType::Success,
            action: action.into(),
            data: Some(data),
            error: None,
        }
    }

    /// An error reply.
    pub fn failure(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            reply_type: ReplyType::Error,
            action: action.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}
