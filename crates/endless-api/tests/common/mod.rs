//! Shared fixtures: in-memory and failing stores, and a scripted inference
//! backend.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use endless_api::AppState;
use endless_db::{DbError, KvStore, MapStore, MemoryStore, SessionStore, Table};
use endless_worldgen::{
    GenerationParams, InferenceBackend, InferenceError, PromptComposer, WorldGenerator,
};
use serde_json::{Value, json};

/// Backend that answers every prompt with the same canned reply.
pub struct ScriptedBackend {
    reply: Result<String, InferenceError>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn invoke(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Store that reads as empty and refuses every write.
pub struct RefusingStore;

#[async_trait]
impl KvStore for RefusingStore {
    async fn get(&self, _table: Table, _id: &str) -> Result<Option<String>, DbError> {
        Ok(None)
    }

    async fn put(
        &self,
        _table: Table,
        _id: &str,
        _document: String,
        _expire_at: Option<i64>,
    ) -> Result<(), DbError> {
        Err(DbError::Config("store is read-only".to_owned()))
    }

    fn name(&self) -> &'static str {
        "refusing"
    }
}

/// Everything a test needs to poke at.
pub struct Harness {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub backend: Arc<ScriptedBackend>,
}

fn scripted(reply: Result<String, InferenceError>) -> Arc<ScriptedBackend> {
    Arc::new(ScriptedBackend {
        reply,
        calls: AtomicUsize::new(0),
    })
}

fn app_state(store: Arc<dyn KvStore>, backend: Arc<ScriptedBackend>) -> Arc<AppState> {
    let generator = WorldGenerator::new(
        backend,
        PromptComposer::builtin().unwrap(),
        GenerationParams::default(),
    );
    Arc::new(AppState::new(
        MapStore::new(Arc::clone(&store)),
        SessionStore::new(store),
        generator,
    ))
}

pub fn harness(reply: Result<String, InferenceError>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let backend = scripted(reply);
    let state = app_state(store.clone(), backend.clone());
    Harness {
        state,
        store,
        backend,
    }
}

/// State whose store fails every write.
pub fn refusing_harness(reply: Result<String, InferenceError>) -> (Arc<AppState>, Arc<ScriptedBackend>) {
    let backend = scripted(reply);
    let state = app_state(Arc::new(RefusingStore), backend.clone());
    (state, backend)
}

/// A well-formed payload with `height` rows of 80 cells.
pub fn world(height: usize) -> Value {
    let rows: Vec<Vec<&str>> = (0..height)
        .map(|y| {
            (0..80)
                .map(|x| {
                    if y == 0 || y + 1 == height || x == 0 || x == 79 {
                        "#"
                    } else {
                        "."
                    }
                })
                .collect()
        })
        .collect();
    json!({
        "themeConfig": {
            "volcano": {"objects": [{"type": "L", "count": 30, "probability": 0.25}]}
        },
        "mapConfig": {
            "9": {
                "theme": "volcano",
                "exits": [{"x": 39, "y": 39, "targetMap": 0, "targetX": 39, "targetY": 1}]
            }
        },
        "mapArray": rows,
        "newObjects": {"L": "Lava pool"}
    })
}

/// The model reply a well-behaved backend would produce.
pub fn fenced_reply(height: usize) -> String {
    format!(
        "Here is your volcanic map:\n```json\n{}\n```\nEnjoy!",
        serde_json::to_string_pretty(&world(height)).unwrap()
    )
}
