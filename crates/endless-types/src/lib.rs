//! Shared type definitions for Endless Land.
//!
//! This crate is the single source of truth for the world payload, the
//! persisted map and session records, and the bodies exchanged at the REST
//! and message boundaries. Types flow to the browser client as `TypeScript`
//! via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Map and session identifier newtypes
//! - [`world`] -- Generated world content and grid geometry
//! - [`records`] -- Stored map records, sessions, and session patches
//! - [`api`] -- REST request/response envelopes
//! - [`messages`] -- Message-boundary envelopes and replies

pub mod api;
pub mod ids;
pub mod messages;
pub mod records;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use api::{
    ErrorKind, ErrorResponse, GenerateMapRequest, GenerateMapResponse, GetMapResponse,
    SaveMapRequest, SaveMapResponse, SessionResponse,
};
pub use ids::{MapId, SessionId};
pub use messages::{
    ClientEnvelope, ClientMessage, GetMapData, MoveData, RawEnvelope, ReplyType, ServerMessage,
};
pub use records::{
    CreatedBy, LATEST_VERSION, MapMetadata, MapRecord, SESSION_TTL_SECS, SessionPatch,
    SessionRecord,
};
pub use world::{MAP_HEIGHT, MAP_WIDTH, MapConfig, MapExit, MapTarget, ThemeConfig, ThemeObject, WorldPayload};
