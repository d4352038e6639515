//! Request and response bodies for the REST boundary.
//!
//! Every response is an envelope with a `success` flag. Successful bodies
//! carry their payload next to it; failures carry [`ErrorResponse`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::MapId;
use crate::records::{MapRecord, SessionRecord};
use crate::world::WorldPayload;

/// Body of `POST /maps/generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GenerateMapRequest {
    /// Theme to generate; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub theme: Option<String>,
    /// Free-text description of the desired map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// Map to (over)write; a fresh id is minted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub map_id: Option<MapId>,
}

/// Response of `POST /maps/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GenerateMapResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier the map was stored under.
    pub map_id: MapId,
    /// The validated payload.
    pub map_data: WorldPayload,
}

/// Body of `POST /maps/{mapId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SaveMapRequest {
    /// The hand-authored payload.
    pub map_data: WorldPayload,
}

/// Response of `POST /maps/{mapId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SaveMapResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier the map was stored under.
    pub map_id: MapId,
}

/// Response of `GET /maps/{mapId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GetMapResponse {
    /// Always `true`.
    pub success: bool,
    /// The stored record.
    pub map_data: MapRecord,
}

/// Response of `GET /sessions/{id}` and `PUT /sessions/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionResponse {
    /// Always `true`.
    pub success: bool,
    /// The session after the operation.
    pub session: SessionRecord,
}

/// Failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ErrorKind {
    /// Malformed or missing input.
    RequestError,
    /// The inference backend failed or returned unusable content.
    InferenceError,
    /// Generated content failed structural checks and was discarded.
    ValidationError,
    /// No map is stored under the requested id.
    NotFoundError,
    /// Content was fine but could not be persisted.
    StorageError,
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable reason.
    pub error: String,
    /// Failure class.
    pub kind: ErrorKind,
}

impl ErrorResponse {
    /// Build a failure envelope.
    pub fn new(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            kind,
        }
    }
}
