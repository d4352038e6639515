//! Error types for the API boundary.
//!
//! [`ApiError`] carries one variant per failure class callers can tell
//! apart, and renders itself as the `{success: false, error, kind}`
//! envelope via [`IntoResponse`].

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use endless_db::DbError;
use endless_types::{ErrorKind, ErrorResponse};
use endless_worldgen::GenerationError;

/// Errors surfaced by REST handlers and WebSocket actions.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Request(String),

    /// The model call failed or its reply held no usable JSON.
    #[error("{0}")]
    Inference(String),

    /// Content broke the structural contract and was discarded.
    #[error("{0}")]
    Validation(String),

    /// No map is stored under the requested id.
    #[error("{0}")]
    NotFound(String),

    /// Content was fine but the store refused it.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    /// The failure class reported in the envelope.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Request(_) => ErrorKind::RequestError,
            Self::Inference(_) => ErrorKind::InferenceError,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFoundError,
            Self::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Request(_) => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(e) => Self::Validation(e.to_string()),
            GenerationError::Inference(_)
            | GenerationError::UnusableResponse(_)
            | GenerationError::Template(_) => Self::Inference(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse::new(self.kind(), self.to_string());
        (status, Json(body)).into_response()
    }
}
