//! Shared application state and the operations both boundaries call.
//!
//! REST handlers and WebSocket actions are thin adapters over the methods
//! here, so an action on either boundary has exactly one implementation.

use chrono::Utc;
use endless_core::validate_world;
use endless_db::{MapStore, SessionStore};
use endless_types::{
    CreatedBy, GenerateMapRequest, GenerateMapResponse, GetMapResponse, MapId, MapMetadata,
    MapRecord, SaveMapResponse, SessionId, SessionPatch, SessionResponse,
};
use endless_worldgen::WorldGenerator;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ApiError;

/// Stores and the generator, injected at startup.
pub struct AppState {
    maps: MapStore,
    sessions: SessionStore,
    generator: WorldGenerator,
}

impl AppState {
    /// Assemble state from already-constructed collaborators.
    pub const fn new(maps: MapStore, sessions: SessionStore, generator: WorldGenerator) -> Self {
        Self {
            maps,
            sessions,
            generator,
        }
    }

    /// Generate a map, then store it as the latest version of its id.
    ///
    /// A missing or blank theme falls back to the configured default.
    ///
    /// # Errors
    ///
    /// [`ApiError::Inference`] or [`ApiError::Validation`] when generation
    /// fails (nothing is stored), [`ApiError::Storage`] when the valid map
    /// could not be saved.
    pub async fn generate_map(
        &self,
        request: GenerateMapRequest,
    ) -> Result<GenerateMapResponse, ApiError> {
        let theme = request
            .theme
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.generator.default_theme().to_owned());
        let description = request.description.filter(|d| !d.trim().is_empty());

        let world = self
            .generator
            .generate(&theme, description.as_deref(), request.map_id)
            .await?;

        let record = MapRecord::latest(
            world.map_id.clone(),
            world.payload.clone(),
            CreatedBy::Ai,
            MapMetadata::Generated { theme, description },
            Utc::now(),
        );
        self.maps.save(&record).await.inspect_err(|e| {
            error!(map_id = %world.map_id, error = %e, "failed to store generated map");
        })?;
        info!(map_id = %world.map_id, "generated map stored");

        Ok(GenerateMapResponse {
            success: true,
            map_id: world.map_id,
            map_data: world.payload,
        })
    }

    /// Fetch the latest version of a map.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for a blank id, [`ApiError::NotFound`] when
    /// nothing is stored, [`ApiError::Storage`] when the read fails.
    pub async fn get_map(&self, map_id: &MapId) -> Result<GetMapResponse, ApiError> {
        if map_id.is_blank() {
            return Err(ApiError::Request("Map ID is required".to_owned()));
        }
        let record = self
            .maps
            .get(map_id)
            .await
            .inspect_err(|e| error!(map_id = %map_id, error = %e, "failed to read map"))?
            .ok_or_else(|| ApiError::NotFound("Map not found".to_owned()))?;
        Ok(GetMapResponse {
            success: true,
            map_data: record,
        })
    }

    /// Store a hand-authored map under `map_id`, replacing any previous one.
    ///
    /// `body` is the raw request object; its `mapData` field goes through
    /// the same dimension checks as generated content.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for a blank id or missing `mapData`,
    /// [`ApiError::Validation`] for a grid of the wrong shape,
    /// [`ApiError::Storage`] when the write fails.
    pub async fn save_map(&self, map_id: MapId, body: &Value) -> Result<SaveMapResponse, ApiError> {
        if map_id.is_blank() {
            return Err(ApiError::Request("Map ID is required".to_owned()));
        }
        let map_data = body
            .get("mapData")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::Request("mapData is required".to_owned()))?;
        let payload = validate_world(map_data).map_err(|e| {
            warn!(map_id = %map_id, error = %e, "rejecting authored map");
            ApiError::Validation(e.to_string())
        })?;

        let record = MapRecord::latest(
            map_id.clone(),
            payload,
            CreatedBy::Human,
            MapMetadata::Authored,
            Utc::now(),
        );
        self.maps.save(&record).await.inspect_err(|e| {
            error!(map_id = %map_id, error = %e, "failed to store authored map");
        })?;
        info!(map_id = %map_id, "authored map stored");

        Ok(SaveMapResponse {
            success: true,
            map_id,
        })
    }

    /// Return a session, creating and storing the default on first sight.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for a blank id, [`ApiError::Storage`] when the
    /// read or the default write fails.
    pub async fn get_session(&self, session_id: &SessionId) -> Result<SessionResponse, ApiError> {
        require_session_id(session_id)?;
        let session = self
            .sessions
            .get_or_create(session_id, Utc::now())
            .await
            .inspect_err(|e| {
                error!(session_id = %session_id, error = %e, "failed to load session");
            })?;
        Ok(SessionResponse {
            success: true,
            session,
        })
    }

    /// Merge a partial update into a session and store the result.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for a blank id, [`ApiError::Storage`] when the
    /// read or the write fails.
    pub async fn update_session(
        &self,
        session_id: &SessionId,
        patch: &SessionPatch,
    ) -> Result<SessionResponse, ApiError> {
        require_session_id(session_id)?;
        let session = self
            .sessions
            .update(session_id, patch, Utc::now())
            .await
            .inspect_err(|e| {
                error!(session_id = %session_id, error = %e, "failed to update session");
            })?;
        Ok(SessionResponse {
            success: true,
            session,
        })
    }
}

fn require_session_id(session_id: &SessionId) -> Result<(), ApiError> {
    if session_id.is_blank() {
        Err(ApiError::Request("Session ID is required".to_owned()))
    } else {
        Ok(())
    }
}
