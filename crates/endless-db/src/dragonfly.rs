//! `Dragonfly` (Redis-compatible) backend.
//!
//! Documents are stored as JSON strings. Session keys carry an absolute
//! `EXAT` expiry so stale sessions are collected by the server itself.

use async_trait::async_trait;
use fred::prelude::*;
use fred::types::Expiration;

use crate::error::DbError;
use crate::store::{KvStore, Table};

/// Connection handle to a `Dragonfly` instance.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL follows the Redis scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!(url, "Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl KvStore for DragonflyStore {
    async fn get(&self, table: Table, id: &str) -> Result<Option<String>, DbError> {
        let key = table.key(id);
        let value: Option<String> = self.client.get(&key).await?;
        Ok(value)
    }

    async fn put(
        &self,
        table: Table,
        id: &str,
        document: String,
        expire_at: Option<i64>,
    ) -> Result<(), DbError> {
        let key = table.key(id);
        let _: () = self
            .client
            .set(&key, document.as_str(), expire_at.map(Expiration::EXAT), None, false)
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dragonfly"
    }
}
