//! Session reconciliation: merge a partial update into the last known state.
//!
//! The read step yields a [`SessionLookup`], either the stored record or a
//! freshly spawned default, and both branches feed the same [`reconcile`]
//! merge. The caller writes the result back as a full record.
//!
//! # Concurrency
//!
//! Read-merge-write is not isolated. Two updates racing on one session
//! both merge against the same base and the later write wins outright;
//! there is no version check. Sessions are single-player, so this is the
//! accepted contract.

use chrono::{DateTime, Utc};
use endless_types::{SessionId, SessionPatch, SessionRecord};

/// Outcome of reading a session before a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    /// The store had a record.
    Found(SessionRecord),
    /// Nothing was stored; this is the spawn default.
    Default(SessionRecord),
}

impl SessionLookup {
    /// Wrap a store read, spawning the default record when it came back
    /// empty.
    pub fn resolve(
        existing: Option<SessionRecord>,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Self {
        existing.map_or_else(
            || Self::Default(SessionRecord::spawn(session_id.clone(), now)),
            Self::Found,
        )
    }

    /// Whether the record was synthesised rather than read.
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }

    /// Borrow the underlying record.
    pub const fn record(&self) -> &SessionRecord {
        match self {
            Self::Found(record) | Self::Default(record) => record,
        }
    }

    /// Take the underlying record.
    pub fn into_record(self) -> SessionRecord {
        match self {
            Self::Found(record) | Self::Default(record) => record,
        }
    }
}

/// Apply `patch` to `base` and stamp the result as written at `now`.
///
/// Each of `currentMap`, `playerX`, `playerY`, and `visitedAreas` is
/// replaced only when the patch names it. `visitedAreas` is replaced
/// wholesale, never unioned: clients submit the full accumulated set.
/// `lastActivity` and `ttl` are refreshed whatever the patch holds.
pub fn reconcile(base: SessionLookup, patch: &SessionPatch, now: DateTime<Utc>) -> SessionRecord {
    let mut record = base.into_record();

    if let Some(current_map) = patch.current_map {
        record.current_map = current_map;
    }
    if let Some(player_x) = patch.player_x {
        record.player_x = player_x;
    }
    if let Some(player_y) = patch.player_y {
        record.player_y = player_y;
    }
    if let Some(visited) = &patch.visited_areas {
        record.visited_areas.clone_from(visited);
    }

    record.touch(now);
    record
}
