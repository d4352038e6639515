//! Map generation for Endless Land.
//!
//! Turns a theme and an optional description into a validated
//! [`WorldPayload`](endless_types::WorldPayload) by rendering a prompt,
//! calling a language model once, and running the reply through the
//! extraction and validation pipeline in `endless-core`.
//!
//! # Modules
//!
//! - [`config`] -- Backend selection and generation parameters
//! - [`llm`] -- [`InferenceBackend`] seam and the HTTP backends
//! - [`prompt`] -- `minijinja` prompt composition
//! - [`generator`] -- [`WorldGenerator`]
//! - [`error`] -- [`GenerationError`], [`InferenceError`]

pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;

pub use config::{BackendType, GenerationParams, LlmBackendConfig};
pub use error::{GenerationError, InferenceError};
pub use generator::{GeneratedWorld, WorldGenerator};
pub use llm::{InferenceBackend, LlmBackend, create_backend};
pub use prompt::PromptComposer;
