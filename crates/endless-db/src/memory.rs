//! In-process backend for tests and single-node development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::store::{KvStore, Table};

/// `HashMap`-backed store. Expiry hints are ignored, so records live for
/// the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(Table, String), String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held across both tables.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether no document has been written yet.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, table: Table, id: &str) -> Result<Option<String>, DbError> {
        Ok(self
            .documents
            .read()
            .await
            .get(&(table, id.to_owned()))
            .cloned())
    }

    async fn put(
        &self,
        table: Table,
        id: &str,
        document: String,
        _expire_at: Option<i64>,
    ) -> Result<(), DbError> {
        self.documents
            .write()
            .await
            .insert((table, id.to_owned()), document);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
