//! Configuration types for inference backends and generation calls.

use serde::Deserialize;

/// Default token budget for one generation call.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Theme used when a request names none.
pub const DEFAULT_THEME: &str = "fantasy";

/// Supported inference backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    #[serde(rename = "openai", alias = "deepseek", alias = "ollama")]
    OpenAi,
    /// Anthropic Messages API.
    #[serde(rename = "anthropic", alias = "claude")]
    Anthropic,
}

/// Configuration for a single inference backend.
#[derive(Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.anthropic.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

// Hand-written so the API key never reaches a log line.
impl core::fmt::Debug for LlmBackendConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LlmBackendConfig")
            .field("backend_type", &self.backend_type)
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Token budget passed to the backend.
    pub max_tokens: u32,
    /// Sampling temperature passed to the backend.
    pub temperature: f32,
    /// Theme used when a request names none.
    pub default_theme: String,
    /// Whether border, exit-gap, and cell-alphabet rules are enforced.
    pub enforce_structure: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            default_theme: DEFAULT_THEME.to_owned(),
            enforce_structure: false,
        }
    }
}
