//! Opt-in structural rules for map grids.
//!
//! The generation prompt asks for an all-`#` border broken only by exit
//! gaps exactly three cells wide, and for cells drawn from the reserved
//! symbols plus `A`-`Z`. These checks hold a payload to that contract.
//! They run only when the validator is built with structure enforcement.

use core::fmt;

use endless_types::world::{EXIT_GAP_WIDTH, MAP_HEIGHT, MAP_WIDTH, WALL_CELL, is_cell_symbol};
use endless_types::WorldPayload;

use crate::error::ValidationError;

/// One side of the map border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Row 0.
    Top,
    /// The last row.
    Bottom,
    /// Column 0.
    Left,
    /// The last column.
    Right,
}

impl Edge {
    /// All four edges in checking order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Grid coordinates of the non-corner cells along this edge.
    fn cells(self) -> Vec<(usize, usize)> {
        let last_col = MAP_WIDTH.saturating_sub(1);
        let last_row = MAP_HEIGHT.saturating_sub(1);
        match self {
            Self::Top => (1..last_col).map(|x| (x, 0)).collect(),
            Self::Bottom => (1..last_col).map(|x| (x, last_row)).collect(),
            Self::Left => (1..last_row).map(|y| (0, y)).collect(),
            Self::Right => (1..last_row).map(|y| (last_col, y)).collect(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Check the cell alphabet, the corners, and every border gap.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCell`], [`ValidationError::BorderBreach`],
/// or [`ValidationError::ExitGapWidth`] for the first violation found.
pub fn check_structure(payload: &WorldPayload) -> Result<(), ValidationError> {
    check_cells(payload)?;
    check_corners(payload)?;
    for edge in Edge::ALL {
        check_edge(payload, edge)?;
    }
    Ok(())
}

fn check_cells(payload: &WorldPayload) -> Result<(), ValidationError> {
    for (y, row) in payload.map_array.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let mut chars = cell.chars();
            let valid = matches!((chars.next(), chars.next()), (Some(c), None) if is_cell_symbol(c));
            if !valid {
                return Err(ValidationError::InvalidCell {
                    x,
                    y,
                    symbol: cell.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_corners(payload: &WorldPayload) -> Result<(), ValidationError> {
    let last_col = MAP_WIDTH.saturating_sub(1);
    let last_row = MAP_HEIGHT.saturating_sub(1);
    for (x, y) in [(0, 0), (last_col, 0), (0, last_row), (last_col, last_row)] {
        if !is_wall(payload, x, y) {
            return Err(ValidationError::BorderBreach { x, y });
        }
    }
    Ok(())
}

/// Every run of non-wall cells along `edge` must be exactly one gap wide.
fn check_edge(payload: &WorldPayload, edge: Edge) -> Result<(), ValidationError> {
    let cells = edge.cells();
    let mut run_start: Option<usize> = None;

    for (offset, &(x, y)) in cells.iter().enumerate() {
        match (is_wall(payload, x, y), run_start) {
            (false, None) => run_start = Some(offset),
            (true, Some(start)) => {
                gap_width_ok(edge, start, offset)?;
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        gap_width_ok(edge, start, cells.len())?;
    }
    Ok(())
}

fn gap_width_ok(edge: Edge, start: usize, end: usize) -> Result<(), ValidationError> {
    let width = end.saturating_sub(start);
    if width == EXIT_GAP_WIDTH {
        Ok(())
    } else {
        Err(ValidationError::ExitGapWidth {
            edge,
            // Offsets skip the corner cell, so position = offset + 1.
            start: start.saturating_add(1),
            width,
        })
    }
}

fn is_wall(payload: &WorldPayload, x: usize, y: usize) -> bool {
    payload
        .cell(x, y)
        .is_some_and(|cell| cell.chars().eq(core::iter::once(WALL_CELL)))
}
