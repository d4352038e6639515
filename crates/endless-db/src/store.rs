//! The key-value seam both record stores sit on.
//!
//! # Key Patterns
//!
//! | Table | Pattern | Expiry |
//! |-------|---------|--------|
//! | [`Table::Maps`] | `map:{mapId}:latest` | none |
//! | [`Table::Sessions`] | `session:{sessionId}` | `EXAT` = record `ttl` |

use std::fmt;

use async_trait::async_trait;
use endless_types::LATEST_VERSION;

use crate::error::DbError;

/// Logical table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Generated and authored maps.
    Maps,
    /// Player sessions.
    Sessions,
}

impl Table {
    /// Physical key for `id` in this table.
    pub fn key(self, id: &str) -> String {
        match self {
            Self::Maps => format!("map:{id}:{LATEST_VERSION}"),
            Self::Sessions => format!("session:{id}"),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maps => f.write_str("maps"),
            Self::Sessions => f.write_str("sessions"),
        }
    }
}

/// Exact-key get and full-overwrite put of JSON documents.
///
/// No partial updates and no conditional writes.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the document stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend read fails.
    async fn get(&self, table: Table, id: &str) -> Result<Option<String>, DbError>;

    /// Overwrite the document under `id`.
    ///
    /// `expire_at` is an absolute epoch second after which the backend may
    /// drop the key. Backends without expiry support ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend write fails.
    async fn put(
        &self,
        table: Table,
        id: &str,
        document: String,
        expire_at: Option<i64>,
    ) -> Result<(), DbError>;

    /// Human-readable backend name for logging.
    fn name(&self) -> &'static str;
}
