//! Server configuration loaded from `endless-config.yaml`.
//!
//! Every section carries `#[serde(default)]`, so a partial file (or no file
//! at all) yields a runnable configuration. The inference API key is never
//! read from the file; it comes from `LLM_API_KEY`.

use std::path::Path;

use endless_worldgen::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_THEME};
use endless_worldgen::{BackendType, GenerationParams, LlmBackendConfig};
use serde::Deserialize;

use crate::error::ServerError;

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "ENDLESS_CONFIG";

/// Config file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "endless-config.yaml";

/// Environment variable holding the inference API key.
pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndlessConfig {
    /// Listen address.
    #[serde(default)]
    pub server: ServerSection,

    /// Map and session store.
    #[serde(default)]
    pub storage: StorageSection,

    /// Generation parameters.
    #[serde(default)]
    pub generation: GenerationSection,

    /// Inference backend selection.
    #[serde(default)]
    pub llm: LlmSection,
}

/// `server` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
        }
    }
}

/// Which key-value backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; records are lost on restart.
    #[default]
    Memory,
    /// A `Dragonfly` (or Redis) server at `storage.url`.
    Dragonfly,
}

/// `storage` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Backend kind.
    pub backend: StorageBackend,
    /// Connection URL, used by `dragonfly` only.
    pub url: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url: "redis://localhost:6379".to_owned(),
        }
    }
}

/// `generation` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    /// Token budget per call.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Theme used when a request names none.
    pub default_theme: String,
    /// Enforce border, exit-gap, and cell-alphabet rules.
    pub enforce_structure: bool,
    /// Directory holding a replacement `world_generator.j2`.
    pub templates_dir: Option<String>,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            default_theme: DEFAULT_THEME.to_owned(),
            enforce_structure: false,
            templates_dir: None,
        }
    }
}

impl GenerationSection {
    /// Per-call parameters handed to the generator.
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            default_theme: self.default_theme.clone(),
            enforce_structure: self.enforce_structure,
        }
    }
}

/// `llm` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Backend protocol.
    pub backend: BackendType,
    /// Base API URL.
    pub api_url: String,
    /// Model identifier.
    pub model: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            backend: BackendType::Anthropic,
            api_url: "https://api.anthropic.com/v1".to_owned(),
            model: "claude-3-5-sonnet-20241022".to_owned(),
        }
    }
}

impl LlmSection {
    /// Combine with the API key into a backend configuration.
    pub fn backend_config(&self, api_key: String) -> LlmBackendConfig {
        LlmBackendConfig {
            backend_type: self.backend,
            api_url: self.api_url.clone(),
            api_key,
            model: self.model.clone(),
        }
    }
}

impl EndlessConfig {
    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the YAML is invalid.
    pub fn parse(yaml: &str) -> Result<Self, ServerError> {
        serde_yml::from_str(yaml).map_err(|e| ServerError::Config(format!("invalid YAML: {e}")))
    }

    /// Load from a file; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }
}

/// Read the inference API key from the environment.
///
/// # Errors
///
/// Returns [`ServerError::MissingApiKey`] if the variable is unset or blank.
pub fn api_key_from_env() -> Result<String, ServerError> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ServerError::MissingApiKey(API_KEY_ENV))
}
