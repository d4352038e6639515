//! Type-safe identifier wrappers for maps and sessions.
//!
//! Both identifiers are opaque strings chosen by clients or minted by the
//! server. The newtypes keep a map id from being passed where a session id
//! is expected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Alphabet for the random suffix of minted map identifiers.
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of random base36 characters in a minted map identifier.
const MAP_ID_SUFFIX_LEN: usize = 9;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the identifier is empty or only whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Logical identifier of a map. One "latest" record exists per id.
    MapId
}

define_id! {
    /// Opaque per-player session token.
    SessionId
}

impl MapId {
    /// Mint a fresh identifier of the form `map_<epoch-millis>_<suffix>`.
    ///
    /// The suffix is nine random base36 characters.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::rng();
        let suffix: String = (0..MAP_ID_SUFFIX_LEN)
            .filter_map(|_| {
                let idx = rng.random_range(0..BASE36.len());
                BASE36.get(idx).copied().map(char::from)
            })
            .collect();
        Self(format!("map_{millis}_{suffix}"))
    }
}
