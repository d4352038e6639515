//! Generated world content: theme config, map config, and the cell grid.
//!
//! The JSON wire names (`themeConfig`, `mapConfig`, `mapArray`,
//! `newObjects`) are shared with the browser client and with the prompt
//! sent to the generative backend, so they are fixed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Grid geometry
// ---------------------------------------------------------------------------

/// Number of columns in every map grid.
pub const MAP_WIDTH: usize = 80;

/// Number of rows in every map grid.
pub const MAP_HEIGHT: usize = 40;

/// Width of the player-centred camera in cells.
pub const VIEWPORT_WIDTH: usize = 35;

/// Height of the player-centred camera in cells.
pub const VIEWPORT_HEIGHT: usize = 20;

/// Width of an exit gap in a border wall.
pub const EXIT_GAP_WIDTH: usize = 3;

// ---------------------------------------------------------------------------
// Cell symbols
// ---------------------------------------------------------------------------

/// Walkable empty space.
pub const EMPTY_CELL: char = '.';

/// Wall or border; blocks movement.
pub const WALL_CELL: char = '#';

/// The player character.
pub const PLAYER_CELL: char = '@';

/// Symbols with a fixed meaning that objects may never reuse.
pub const RESERVED_CELLS: [char; 3] = [EMPTY_CELL, WALL_CELL, PLAYER_CELL];

/// Whether `symbol` may name a game object (a single uppercase A-Z letter).
pub const fn is_object_symbol(symbol: char) -> bool {
    symbol.is_ascii_uppercase()
}

/// Whether `symbol` may appear in a map grid.
pub fn is_cell_symbol(symbol: char) -> bool {
    RESERVED_CELLS.contains(&symbol) || is_object_symbol(symbol)
}

// ---------------------------------------------------------------------------
// Theme and map configuration
// ---------------------------------------------------------------------------

/// One kind of object scattered by a theme.
///
/// Absent fields default, so a sparse palette entry is still accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct ThemeObject {
    /// The object's cell symbol (a single uppercase letter).
    #[serde(rename = "type")]
    pub symbol: String,
    /// How many instances to place.
    pub count: u32,
    /// Placement probability in `[0, 1]`.
    pub probability: f64,
}

/// The object palette of one theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ThemeConfig {
    /// Objects the theme places on its maps.
    #[serde(default)]
    pub objects: Vec<ThemeObject>,
}

/// Where an exit leads: a numbered map in the same payload, or the id of a
/// stored map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum MapTarget {
    /// A numeric key of the payload's map config.
    Index(i64),
    /// A map identifier such as `map_1718000000000_k3j9x0q2a`.
    Id(String),
}

impl From<i64> for MapTarget {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for MapTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

/// A gap in a border wall leading to another map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MapExit {
    /// Column of the exit on this map.
    pub x: i32,
    /// Row of the exit on this map.
    pub y: i32,
    /// Map the exit leads to.
    pub target_map: MapTarget,
    /// Arrival column on the target map.
    pub target_x: i32,
    /// Arrival row on the target map.
    pub target_y: i32,
}

/// Per-map configuration: which theme it uses and where its exits lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MapConfig {
    /// Name of a theme in the payload's theme config.
    #[serde(default)]
    pub theme: String,
    /// Exits in declaration order.
    #[serde(default)]
    pub exits: Vec<MapExit>,
}

// ---------------------------------------------------------------------------
// WorldPayload
// ---------------------------------------------------------------------------

/// The unit of generated (or hand-authored) content.
///
/// A payload that reached this type has passed the grid-dimension checks:
/// [`map_array`](Self::map_array) holds exactly [`MAP_HEIGHT`] rows of
/// [`MAP_WIDTH`] cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WorldPayload {
    /// Theme name to object palette.
    pub theme_config: BTreeMap<String, ThemeConfig>,
    /// Map identifier to map configuration.
    pub map_config: BTreeMap<String, MapConfig>,
    /// Row-major grid of single-character cell symbols.
    pub map_array: Vec<Vec<String>>,
    /// Legend for object symbols introduced by this payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub new_objects: Option<BTreeMap<String, String>>,
}

impl WorldPayload {
    /// Return the cell symbol at column `x`, row `y`, if in range.
    pub fn cell(&self, x: usize, y: usize) -> Option<&str> {
        self.map_array
            .get(y)
            .and_then(|row| row.get(x))
            .map(String::as_str)
    }
}
