//! Request and message boundaries for Endless Land.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for generating, reading, and saving maps and for
//!   reading and updating player sessions
//! - **`WebSocket` endpoint** (`/ws`) accepting the same operations as
//!   `{action, data, sessionId}` envelopes
//!
//! Both boundaries call into [`AppState`], which owns the map and session
//! stores and the world generator.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
