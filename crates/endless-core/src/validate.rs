//! Structural contract for world payloads.
//!
//! Checks run in a fixed order and the first violation is reported:
//!
//! 1. `themeConfig`, `mapConfig`, and `mapArray` are all present.
//! 2. `mapArray` has exactly [`MAP_HEIGHT`] rows.
//! 3. Every row has exactly [`MAP_WIDTH`] cells (first bad row reported).
//!
//! A candidate that passes is normalised into a typed [`WorldPayload`].
//! Border walls, exit widths, and the cell alphabet are only checked when
//! structural rules are switched on (see [`crate::structure`]).

use std::collections::BTreeMap;

use endless_types::world::{MAP_HEIGHT, MAP_WIDTH};
use endless_types::{MapConfig, ThemeConfig, WorldPayload};
use serde_json::Value;

use crate::error::ValidationError;
use crate::structure;

/// Top-level keys every payload must carry.
const REQUIRED_FIELDS: [&str; 3] = ["themeConfig", "mapConfig", "mapArray"];

/// Validates candidate payloads, optionally with the structural rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldValidator {
    enforce_structure: bool,
}

impl WorldValidator {
    /// Create a validator. With `enforce_structure` off only the dimension
    /// contract is checked.
    pub const fn new(enforce_structure: bool) -> Self {
        Self { enforce_structure }
    }

    /// Whether structural rules are enforced.
    pub const fn enforces_structure(&self) -> bool {
        self.enforce_structure
    }

    /// Check `candidate` and return its normalised form.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self, candidate: &Value) -> Result<WorldPayload, ValidationError> {
        let payload = validate_world(candidate)?;
        if self.enforce_structure {
            structure::check_structure(&payload)?;
        }
        Ok(payload)
    }
}

/// Check the dimension contract and normalise `candidate`.
///
/// Every row is measured before any is normalised, so the first row of the
/// wrong width is reported even if an earlier row holds odd cells. Rows
/// given as plain strings are split into single-character cells, and
/// non-string cells keep their JSON text. Section contents are only
/// checked for shape; unknown extra fields are ignored.
///
/// # Errors
///
/// - [`ValidationError::MissingFields`] if a required key is absent or null
/// - [`ValidationError::InvalidHeight`] for a row count other than 40
/// - [`ValidationError::InvalidWidth`] for the first row not 80 wide
/// - [`ValidationError::Malformed`] if a section has the wrong shape
pub fn validate_world(candidate: &Value) -> Result<WorldPayload, ValidationError> {
    let object = candidate
        .as_object()
        .ok_or(ValidationError::MissingFields)?;
    if REQUIRED_FIELDS
        .iter()
        .any(|key| object.get(*key).is_none_or(Value::is_null))
    {
        return Err(ValidationError::MissingFields);
    }

    let rows = object
        .get("mapArray")
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::Malformed("mapArray must be an array of rows".to_owned()))?;
    if rows.len() != MAP_HEIGHT {
        return Err(ValidationError::InvalidHeight {
            expected: MAP_HEIGHT,
            got: rows.len(),
        });
    }

    let mut grid = Vec::with_capacity(MAP_HEIGHT);
    for (row_index, row) in rows.iter().enumerate() {
        let row = RowView::of(row_index, row)?;
        if row.width() != MAP_WIDTH {
            return Err(ValidationError::InvalidWidth {
                row: row_index,
                expected: MAP_WIDTH,
                got: row.width(),
            });
        }
        grid.push(row);
    }
    let map_array = grid.into_iter().map(RowView::into_cells).collect();

    let theme_config: BTreeMap<String, ThemeConfig> = section(object.get("themeConfig"), "themeConfig")?;
    let map_config: BTreeMap<String, MapConfig> = section(object.get("mapConfig"), "mapConfig")?;
    let new_objects: Option<BTreeMap<String, String>> = match object.get("newObjects") {
        None | Some(Value::Null) => None,
        value => Some(section(value, "newObjects")?),
    };

    Ok(WorldPayload {
        theme_config,
        map_config,
        map_array,
        new_objects,
    })
}

/// Parse a candidate string, then validate it.
///
/// # Errors
///
/// Returns [`ValidationError::Json`] if `text` is not JSON, otherwise as
/// [`validate_world`].
pub fn parse_world(text: &str, validator: WorldValidator) -> Result<WorldPayload, ValidationError> {
    let candidate: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::Json(e.to_string()))?;
    validator.validate(&candidate)
}

/// One `mapArray` row, measured before its cells are copied out.
enum RowView<'a> {
    Cells(&'a [Value]),
    Line(&'a str),
}

impl<'a> RowView<'a> {
    fn of(row_index: usize, row: &'a Value) -> Result<Self, ValidationError> {
        match row {
            Value::Array(cells) => Ok(Self::Cells(cells)),
            Value::String(line) => Ok(Self::Line(line)),
            _ => Err(ValidationError::Malformed(format!(
                "row {row_index} is neither an array nor a string"
            ))),
        }
    }

    fn width(&self) -> usize {
        match self {
            Self::Cells(cells) => cells.len(),
            Self::Line(line) => line.chars().count(),
        }
    }

    /// Non-string cells keep their JSON text.
    fn into_cells(self) -> Vec<String> {
        match self {
            Self::Cells(cells) => cells
                .iter()
                .map(|cell| match cell {
                    Value::String(symbol) => symbol.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Self::Line(line) => line.chars().map(String::from).collect(),
        }
    }
}

/// Deserialize a payload section, naming it in the error.
fn section<T: serde::de::DeserializeOwned>(
    value: Option<&Value>,
    name: &str,
) -> Result<T, ValidationError> {
    let value = value.cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| ValidationError::Malformed(format!("{name}: {e}")))
}
