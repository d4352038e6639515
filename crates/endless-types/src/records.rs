//! Persisted aggregates: map records and player sessions.
//!
//! A [`MapRecord`] and a [`SessionRecord`] are independent. Nothing checks
//! that a session's `currentMap` names an existing map.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{MapId, SessionId};
use crate::world::WorldPayload;

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

/// Version tag of the single record kept per map. Saves overwrite it.
pub const LATEST_VERSION: &str = "latest";

/// Who produced a map record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CreatedBy {
    /// Produced by the generative backend.
    #[serde(rename = "AI")]
    Ai,
    /// Saved by a person through the map editor.
    Human,
}

/// Provenance attached to a map record, one variant per origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum MapMetadata {
    /// The map came out of a generation request.
    Generated {
        /// Theme the generation was asked for.
        theme: String,
        /// Free-text description supplied with the request, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        #[ts(optional)]
        description: Option<String>,
    },
    /// The map was saved by hand.
    Authored,
}

/// Stored form of a [`WorldPayload`], keyed by `(map_id, version)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MapRecord {
    /// Logical map identifier.
    pub map_id: MapId,
    /// Always [`LATEST_VERSION`].
    pub version: String,
    /// The map content.
    #[serde(flatten)]
    pub payload: WorldPayload,
    /// When this version was written.
    pub created_at: DateTime<Utc>,
    /// Origin of the content.
    pub created_by: CreatedBy,
    /// Origin-specific details.
    pub metadata: MapMetadata,
}

impl MapRecord {
    /// Build the "latest" record for `map_id`.
    pub fn latest(
        map_id: MapId,
        payload: WorldPayload,
        created_by: CreatedBy,
        metadata: MapMetadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            map_id,
            version: LATEST_VERSION.to_owned(),
            payload,
            created_at,
            created_by,
            metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Map a fresh session starts on.
pub const DEFAULT_MAP: i64 = 0;

/// Spawn column of a fresh session.
pub const DEFAULT_SPAWN_X: i32 = 10;

/// Spawn row of a fresh session.
pub const DEFAULT_SPAWN_Y: i32 = 10;

/// Lifetime of a session after its last write, in seconds.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Per-player exploration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionRecord {
    /// Session token.
    pub session_id: SessionId,
    /// Map the player is on.
    pub current_map: i64,
    /// Player column.
    pub player_x: i32,
    /// Player row.
    pub player_y: i32,
    /// Identifiers of maps the player has visited. No duplicates.
    pub visited_areas: BTreeSet<String>,
    /// Time of the last write.
    pub last_activity: DateTime<Utc>,
    /// Absolute expiry as epoch seconds. Advisory; the store collects it.
    pub ttl: i64,
}

impl SessionRecord {
    /// The record a session starts from: map 0, spawn `(10, 10)`, nothing
    /// visited, expiring a day after `now`.
    pub fn spawn(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            current_map: DEFAULT_MAP,
            player_x: DEFAULT_SPAWN_X,
            player_y: DEFAULT_SPAWN_Y,
            visited_areas: BTreeSet::new(),
            last_activity: now,
            ttl: expiry_after(now),
        }
    }

    /// Stamp the record as written at `now`, pushing its expiry out.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
        self.ttl = expiry_after(now);
    }
}

/// Epoch second at which a session written at `now` expires.
pub fn expiry_after(now: DateTime<Utc>) -> i64 {
    now.checked_add_signed(Duration::seconds(SESSION_TTL_SECS))
        .map_or(i64::MAX, |t| t.timestamp())
}

/// A partial session update. Absent fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionPatch {
    /// New current map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub current_map: Option<i64>,
    /// New player column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_x: Option<i32>,
    /// New player row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub player_y: Option<i32>,
    /// Full replacement for the visited set (not merged with it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub visited_areas: Option<BTreeSet<String>>,
}

impl SessionPatch {
    /// Whether the patch names no field at all.
    pub const fn is_empty(&self) -> bool {
        self.current_map.is_none()
            && self.player_x.is_none()
            && self.player_y.is_none()
            && self.visited_areas.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_uses_default_position_and_day_long_expiry() {
        let now = Utc::now();
        let session = SessionRecord::spawn(SessionId::from("s1"), now);
        assert_eq!(session.current_map, 0);
        assert_eq!((session.player_x, session.player_y), (10, 10));
        assert!(session.visited_areas.is_empty());
        assert_eq!(session.ttl, now.timestamp() + SESSION_TTL_SECS);
    }

    #[test]
    fn created_by_serializes_as_source_labels() {
        assert_eq!(serde_json::to_string(&CreatedBy::Ai).ok().as_deref(), Some("\"AI\""));
        assert_eq!(
            serde_json::to_string(&CreatedBy::Human).ok().as_deref(),
            Some("\"Human\"")
        );
    }

    #[test]
    fn metadata_is_tagged_by_kind() {
        let meta = MapMetadata::Generated {
            theme: "desert".to_owned(),
            description: None,
        };
        let json = serde_json::to_value(&meta).unwrap_or_default();
        assert_eq!(json["kind"], "generated");
        assert_eq!(json["theme"], "desert");

        let authored = serde_json::to_value(&MapMetadata::Authored).unwrap_or_default();
        assert_eq!(authored, serde_json::json!({"kind": "authored"}));
    }

    #[test]
    fn patch_fields_default_to_absent() {
        let patch: SessionPatch =
            serde_json::from_str(r#"{"playerX": 4}"#).unwrap_or_default();
        assert_eq!(patch.player_x, Some(4));
        assert!(patch.current_map.is_none());
        assert!(patch.visited_areas.is_none());
        assert!(!patch.is_empty());
        assert!(SessionPatch::default().is_empty());
    }

    #[test]
    fn null_patch_fields_count_as_absent() {
        let patch: SessionPatch =
            serde_json::from_str(r#"{"visitedAreas": null}"#).unwrap_or_default();
        assert!(patch.is_empty());
    }
}
