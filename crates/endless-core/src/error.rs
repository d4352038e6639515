//! Error types for payload validation.

use crate::structure::Edge;

/// Why a candidate world payload was rejected.
///
/// Only the first violated check is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The candidate text is not JSON.
    #[error("response is not valid JSON: {0}")]
    Json(String),

    /// `themeConfig`, `mapConfig`, or `mapArray` is absent.
    #[error("missing required fields")]
    MissingFields,

    /// `mapArray` has the wrong number of rows.
    #[error("invalid map height: expected {expected}, got={got}")]
    InvalidHeight {
        /// Required row count.
        expected: usize,
        /// Actual row count.
        got: usize,
    },

    /// A row has the wrong number of cells.
    #[error("invalid map width at row {row}: expected {expected}, got={got}")]
    InvalidWidth {
        /// Index of the first offending row.
        row: usize,
        /// Required column count.
        expected: usize,
        /// Actual column count.
        got: usize,
    },

    /// A section is present but has the wrong shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A cell is not a single reserved symbol or uppercase letter.
    #[error("invalid cell symbol {symbol:?} at ({x}, {y})")]
    InvalidCell {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
        /// The offending cell text.
        symbol: String,
    },

    /// A border corner is not a wall.
    #[error("border breach at ({x}, {y}): corners must be walls")]
    BorderBreach {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },

    /// A gap in the border is not exactly three cells wide.
    #[error("exit gap on {edge} edge at position {start} is {width} cells wide, expected 3")]
    ExitGapWidth {
        /// Edge holding the gap.
        edge: Edge,
        /// Column (top/bottom) or row (left/right) where the gap starts.
        start: usize,
        /// Gap width.
        width: usize,
    },
}
