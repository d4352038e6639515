//! Error types for map generation.
//!
//! Uses `thiserror` for typed errors that surface through the generation
//! pipeline: prompt rendering, the inference call, and checking the
//! returned content.

use endless_core::ValidationError;

/// The inference backend failed or answered with something unreadable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inference backend error: {0}")]
pub struct InferenceError(pub String);

/// Errors that can occur while generating a map.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The prompt template failed to load or render.
    #[error("template render error: {0}")]
    Template(String),

    /// The backend call failed. Never retried.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The response held no parseable JSON.
    #[error("model returned unusable content: {0}")]
    UnusableResponse(String),

    /// The parsed payload broke the structural contract. It is discarded.
    #[error("generated map failed validation: {0}")]
    Validation(ValidationError),
}

impl From<ValidationError> for GenerationError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Json(msg) => Self::UnusableResponse(msg),
            other => Self::Validation(other),
        }
    }
}
