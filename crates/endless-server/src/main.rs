//! Endless Land server binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `endless-config.yaml` (or `$ENDLESS_CONFIG`)
//! 3. Read the inference API key from `LLM_API_KEY`
//! 4. Connect the configured store
//! 5. Build the inference backend and the world generator
//! 6. Serve REST + `WebSocket` until `Ctrl-C`

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use endless_api::{AppState, ServerConfig};
use endless_db::{DragonflyStore, KvStore, MapStore, MemoryStore, SessionStore};
use endless_worldgen::{PromptComposer, WorldGenerator, create_backend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{EndlessConfig, StorageBackend};
use crate::error::ServerError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("endless-server starting");

    // 2. Load configuration.
    let config_path = std::env::var(config::CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(config::DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = EndlessConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        storage = ?config.storage.backend,
        llm_backend = ?config.llm.backend,
        model = %config.llm.model,
        enforce_structure = config.generation.enforce_structure,
        "Configuration loaded"
    );

    // 3. Secrets.
    let api_key = config::api_key_from_env()?;

    // 4. Store.
    let store = connect_store(&config).await.context("connecting store")?;
    info!(backend = store.name(), "Store ready");

    // 5. Generator.
    let backend = Arc::new(create_backend(&config.llm.backend_config(api_key)));
    let composer = match &config.generation.templates_dir {
        Some(dir) => {
            info!(templates_dir = %dir, "Loading prompt template override");
            PromptComposer::from_dir(dir)
        }
        None => PromptComposer::builtin(),
    }
    .map_err(ServerError::from)?;
    let generator = WorldGenerator::new(backend, composer, config.generation.params());

    let state = Arc::new(AppState::new(
        MapStore::new(Arc::clone(&store)),
        SessionStore::new(Arc::clone(&store)),
        generator,
    ));

    // 6. Serve.
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    endless_api::start_server(&server_config, state)
        .await
        .map_err(ServerError::from)?;

    info!("endless-server stopped");
    Ok(())
}

async fn connect_store(config: &EndlessConfig) -> Result<Arc<dyn KvStore>, ServerError> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Dragonfly => {
            let store = DragonflyStore::connect(&config.storage.url).await?;
            Ok(Arc::new(store))
        }
    }
}
