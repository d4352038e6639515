//! Session persistence with lazy creation and read-merge-write updates.
//!
//! Writes always carry the record's `ttl` as the key expiry. An update is a
//! plain read, [`reconcile`], full put; concurrent updates to one session
//! resolve last-write-wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use endless_core::{SessionLookup, reconcile};
use endless_types::{SessionId, SessionPatch, SessionRecord};

use crate::error::DbError;
use crate::store::{KvStore, Table};

/// Reads and writes [`SessionRecord`]s.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KvStore>,
}

impl SessionStore {
    /// Wrap a key-value backend.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Read a session, falling back to the spawn default. Nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend read or decoding fails.
    pub async fn load(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<SessionLookup, DbError> {
        let existing = self
            .store
            .get(Table::Sessions, session_id.as_str())
            .await?
            .map(|document| serde_json::from_str::<SessionRecord>(&document))
            .transpose()?;
        Ok(SessionLookup::resolve(existing, session_id, now))
    }

    /// Return the stored session, creating and persisting the default when
    /// none exists. An existing record is returned as-is, not refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read or the default write fails.
    pub async fn get_or_create(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, DbError> {
        match self.load(session_id, now).await? {
            SessionLookup::Found(record) => Ok(record),
            SessionLookup::Default(record) => {
                self.put(&record).await?;
                tracing::info!(session_id = %session_id, "session created");
                Ok(record)
            }
        }
    }

    /// Merge `patch` into the current session and store the result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read or the write fails.
    pub async fn update(
        &self,
        session_id: &SessionId,
        patch: &SessionPatch,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, DbError> {
        let base = self.load(session_id, now).await?;
        let created = base.is_default();
        let record = reconcile(base, patch, now);
        self.put(&record).await?;
        tracing::debug!(
            session_id = %session_id,
            created,
            current_map = record.current_map,
            "session updated"
        );
        Ok(record)
    }

    async fn put(&self, record: &SessionRecord) -> Result<(), DbError> {
        let document = serde_json::to_string(record)?;
        self.store
            .put(
                Table::Sessions,
                record.session_id.as_str(),
                document,
                Some(record.ttl),
            )
            .await
    }
}
