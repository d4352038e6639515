//! Error types for the server binary.

/// Top-level startup and serving error.
///
/// Each variant wraps a subsystem failure so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A required secret was absent from the environment.
    #[error("environment variable {0} must be set")]
    MissingApiKey(&'static str),

    /// The store could not be reached.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: endless_db::DbError,
    },

    /// The prompt template could not be loaded.
    #[error("template error: {source}")]
    Template {
        /// The underlying generation error.
        #[from]
        source: endless_worldgen::GenerationError,
    },

    /// Binding or serving HTTP failed.
    #[error("http error: {source}")]
    Http {
        /// The underlying server error.
        #[from]
        source: endless_api::ServerError,
    },
}
