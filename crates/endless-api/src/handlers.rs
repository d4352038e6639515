//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/maps/generate` | Generate, validate, and store a map |
//! | `GET` | `/maps/{mapId}` | Latest version of a map |
//! | `POST` | `/maps/{mapId}` | Store a hand-authored map |
//! | `GET` | `/sessions/{sessionId}` | Session, created on first read |
//! | `PUT` | `/sessions/{sessionId}` | Partial session update |
//!
//! Bodies are taken as `Result<Json<_>, JsonRejection>` so a malformed body
//! answers with the same error envelope as every other failure.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use endless_types::{
    GenerateMapRequest, GenerateMapResponse, GetMapResponse, MapId, SaveMapResponse, SessionId,
    SessionPatch, SessionResponse,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /maps/generate`
pub async fn generate_map(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateMapRequest>, JsonRejection>,
) -> Result<Json<GenerateMapResponse>, ApiError> {
    let Json(request) = body?;
    Ok(Json(state.generate_map(request).await?))
}

/// `GET /maps/{mapId}`
pub async fn get_map(
    State(state): State<Arc<AppState>>,
    Path(map_id): Path<String>,
) -> Result<Json<GetMapResponse>, ApiError> {
    Ok(Json(state.get_map(&MapId::from(map_id)).await?))
}

/// `POST /maps/{mapId}`
pub async fn save_map(
    State(state): State<Arc<AppState>>,
    Path(map_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveMapResponse>, ApiError> {
    let Json(body) = body?;
    Ok(Json(state.save_map(MapId::from(map_id), &body).await?))
}

/// `GET /sessions/{sessionId}`
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(state.get_session(&SessionId::from(session_id)).await?))
}

/// `PUT /sessions/{sessionId}`
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Json<SessionPatch>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(patch) = body?;
    Ok(Json(
        state
            .update_session(&SessionId::from(session_id), &patch)
            .await?,
    ))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_owned())
}
