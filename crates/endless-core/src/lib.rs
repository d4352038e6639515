//! Pure logic for Endless Land: no I/O, no clocks read behind the caller's
//! back.
//!
//! # Modules
//!
//! - [`extract`] -- Cut a JSON candidate out of free-form model output
//! - [`validate`] -- Dimension contract and normalisation of world payloads
//! - [`structure`] -- Opt-in border, exit-gap, and cell-alphabet rules
//! - [`reconcile`] -- Field-level merge of session updates
//! - [`error`] -- [`ValidationError`]
//!
//! # Pipeline
//!
//! ```text
//! model text --> extract_json --> parse_world (validate + structure) --> WorldPayload
//! ```

pub mod error;
pub mod extract;
pub mod reconcile;
pub mod structure;
pub mod validate;

pub use error::ValidationError;
pub use extract::{Extraction, Strategy, extract_json};
pub use reconcile::{SessionLookup, reconcile};
pub use structure::{Edge, check_structure};
pub use validate::{WorldValidator, parse_world, validate_world};
