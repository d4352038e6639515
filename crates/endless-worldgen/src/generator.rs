//! Map generation: compose, invoke, extract, validate.
//!
//! One call to [`WorldGenerator::generate`] makes exactly one inference
//! call. Anything that fails after the model answers is discarded; nothing
//! here touches storage.

use std::sync::Arc;

use endless_core::{WorldValidator, extract_json, parse_world};
use endless_types::{MapId, WorldPayload};
use tracing::{debug, info, warn};

use crate::config::GenerationParams;
use crate::error::GenerationError;
use crate::llm::InferenceBackend;
use crate::prompt::PromptComposer;

/// A validated payload with the id it will be stored under.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    /// Caller-supplied id, or a freshly generated one.
    pub map_id: MapId,
    /// The validated world.
    pub payload: WorldPayload,
}

/// Drives a single backend through the generation pipeline.
pub struct WorldGenerator {
    backend: Arc<dyn InferenceBackend>,
    composer: PromptComposer,
    params: GenerationParams,
}

impl WorldGenerator {
    /// Build a generator around an injected backend.
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        composer: PromptComposer,
        params: GenerationParams,
    ) -> Self {
        Self {
            backend,
            composer,
            params,
        }
    }

    /// Theme applied when a request leaves it out.
    pub fn default_theme(&self) -> &str {
        &self.params.default_theme
    }

    /// Generation settings in effect.
    pub const fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate and validate a world.
    ///
    /// A blank `map_id` is treated as absent.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Template`] if the prompt fails to render
    /// - [`GenerationError::Inference`] if the backend call fails
    /// - [`GenerationError::UnusableResponse`] if no JSON can be parsed
    /// - [`GenerationError::Validation`] if the payload breaks the contract
    pub async fn generate(
        &self,
        theme: &str,
        description: Option<&str>,
        map_id: Option<MapId>,
    ) -> Result<GeneratedWorld, GenerationError> {
        let map_id = map_id
            .filter(|id| !id.is_blank())
            .unwrap_or_else(MapId::generate);

        info!(
            map_id = %map_id,
            theme,
            backend = self.backend.name(),
            "generating map"
        );

        let prompt = self.composer.compose(theme, description)?;

        let raw = self
            .backend
            .invoke(&prompt, self.params.max_tokens, self.params.temperature)
            .await
            .inspect_err(|e| warn!(map_id = %map_id, error = %e, "inference call failed"))?;

        let extraction = extract_json(&raw);
        debug!(
            map_id = %map_id,
            strategy = ?extraction.strategy,
            response_len = raw.len(),
            "extracted JSON candidate"
        );

        let validator = WorldValidator::new(self.params.enforce_structure);
        let payload = parse_world(extraction.text, validator).map_err(|e| {
            warn!(map_id = %map_id, error = %e, "discarding generated map");
            GenerationError::from(e)
        })?;

        info!(map_id = %map_id, "map generated");
        Ok(GeneratedWorld { map_id, payload })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use endless_core::ValidationError;
    use serde_json::json;

    use super::*;
    use crate::error::InferenceError;

    struct ScriptedBackend {
        reply: Result<String, InferenceError>,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl ScriptedBackend {
        fn new(reply: Result<String, InferenceError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl InferenceBackend for ScriptedBackend {
        async fn invoke(
            &self,
            prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_prompt.lock() {
                prompt.clone_into(&mut last);
            }
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn walled_world(height: usize) -> String {
        let rows: Vec<Vec<&str>> = (0..height)
            .map(|y| {
                (0..80)
                    .map(|x| {
                        if y == 0 || y == height.saturating_sub(1) || x == 0 || x == 79 {
                            "#"
                        } else {
                            "."
                        }
                    })
                    .collect()
            })
            .collect();
        json!({
            "themeConfig": {"swamp": {"objects": [{"type": "B", "count": 12, "probability": 0.2}]}},
            "mapConfig": {"7": {"theme": "swamp", "exits": []}},
            "mapArray": rows,
            "newObjects": {"B": "Bog"}
        })
        .to_string()
    }

    fn generator(backend: Arc<ScriptedBackend>, enforce_structure: bool) -> WorldGenerator {
        let params = GenerationParams {
            enforce_structure,
            ..GenerationParams::default()
        };
        WorldGenerator::new(backend, PromptComposer::builtin().unwrap(), params)
    }

    #[tokio::test]
    async fn fenced_reply_produces_world_with_given_id() {
        let reply = format!("Here it is:\n```json\n{}\n```", walled_world(40));
        let backend = ScriptedBackend::new(Ok(reply));
        let generator = generator(Arc::clone(&backend), true);

        let result = generator
            .generate("swamp", Some("misty bog"), Some(MapId::from("map_fixed")))
            .await;
        let world = result.unwrap();
        assert_eq!(world.map_id.as_str(), "map_fixed");
        assert_eq!(world.payload.map_array.len(), 40);

        let prompt = backend.last_prompt.lock().map(|p| p.clone()).unwrap_or_default();
        assert!(prompt.contains("Create a swamp themed map with the following description: misty bog"));
    }

    #[tokio::test]
    async fn blank_or_missing_id_is_generated() {
        let backend = ScriptedBackend::new(Ok(walled_world(40)));
        let generator = generator(backend, false);
        let world = generator.generate("swamp", None, Some(MapId::from("  "))).await;
        assert!(world.is_ok_and(|w| w.map_id.as_str().starts_with("map_")));
    }

    #[tokio::test]
    async fn inference_failure_is_not_retried() {
        let backend = ScriptedBackend::new(Err(InferenceError("upstream 529".to_owned())));
        let generator = generator(Arc::clone(&backend), false);
        let result = generator.generate("swamp", None, None).await;
        assert!(matches!(result, Err(GenerationError::Inference(_))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prose_only_reply_is_unusable() {
        let backend = ScriptedBackend::new(Ok("I'd rather write a poem.".to_owned()));
        let generator = generator(backend, false);
        let result = generator.generate("swamp", None, None).await;
        assert!(matches!(result, Err(GenerationError::UnusableResponse(_))));
    }

    #[tokio::test]
    async fn short_grid_is_rejected() {
        let backend = ScriptedBackend::new(Ok(walled_world(39)));
        let generator = generator(Arc::clone(&backend), false);
        let result = generator.generate("swamp", None, None).await;
        assert!(matches!(
            result,
            Err(GenerationError::Validation(ValidationError::InvalidHeight {
                expected: 40,
                got: 39
            }))
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
