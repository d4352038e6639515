//! Data layer for Endless Land.
//!
//! Maps and sessions are JSON documents behind a small [`KvStore`] seam.
//! Production runs against `Dragonfly`; tests and single-node development
//! use [`MemoryStore`].
//!
//! ```text
//! MapStore ------+
//!                +--> Arc<dyn KvStore> --> DragonflyStore | MemoryStore
//! SessionStore --+
//! ```
//!
//! # Modules
//!
//! - [`store`] -- [`KvStore`] trait and [`Table`] key patterns
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) backend
//! - [`memory`] -- In-process backend
//! - [`map_store`] -- Latest-version map records
//! - [`session_store`] -- Lazy creation and reconciled updates of sessions
//! - [`error`] -- Shared error type

pub mod dragonfly;
pub mod error;
pub mod map_store;
pub mod memory;
pub mod session_store;
pub mod store;

pub use dragonfly::DragonflyStore;
pub use error::DbError;
pub use map_store::MapStore;
pub use memory::MemoryStore;
pub use session_store::SessionStore;
pub use store::{KvStore, Table};
