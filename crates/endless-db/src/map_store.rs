//! Map persistence: one "latest" record per map id.

use std::sync::Arc;

use endless_types::{MapId, MapRecord};

use crate::error::DbError;
use crate::store::{KvStore, Table};

/// Reads and writes [`MapRecord`]s.
#[derive(Clone)]
pub struct MapStore {
    store: Arc<dyn KvStore>,
}

impl MapStore {
    /// Wrap a key-value backend.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Overwrite the latest record for `record.map_id`.
    ///
    /// Saving the same record twice leaves one record, equal to it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding or the backend write fails.
    pub async fn save(&self, record: &MapRecord) -> Result<(), DbError> {
        let document = serde_json::to_string(record)?;
        self.store
            .put(Table::Maps, record.map_id.as_str(), document, None)
            .await?;
        tracing::debug!(map_id = %record.map_id, backend = self.store.name(), "map saved");
        Ok(())
    }

    /// Fetch the latest record for `map_id`, or `None` if it was never saved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend read or decoding fails.
    pub async fn get(&self, map_id: &MapId) -> Result<Option<MapRecord>, DbError> {
        self.store
            .get(Table::Maps, map_id.as_str())
            .await?
            .map(|document| serde_json::from_str(&document))
            .transpose()
            .map_err(DbError::from)
    }
}
