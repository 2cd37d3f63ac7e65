//! Test utilities and mock planners for Fathom development.
//!
//! Provides ASCII map parsing ([`grid_from_ascii`]), a handful of named
//! scenario maps, and mock [`Planner`](fathom_core::Planner)
//! implementations in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CallLog, FailingPlanner, PlannerCall, RecordingPlanner, ScriptedPlanner};

use fathom_core::{Cell, Cost};
use fathom_grid::CostGrid;

/// Cost written for `#` in ASCII maps.
pub const WALL: Cost = 255;

/// Parse an ASCII map into a [`CostGrid`].
///
/// Each non-empty line is one row, top row first. Leading and trailing
/// whitespace is ignored so maps can be indented inside test code.
///
/// - `.` is free (cost 0)
/// - `#` is a wall ([`WALL`])
/// - `1`..`9` is that cost
pub fn grid_from_ascii(map: &str) -> Result<CostGrid, String> {
    let mut rows: Vec<Vec<Cost>> = Vec::new();
    for (y, line) in map.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (x, ch) in line.chars().enumerate() {
            let cost = match ch {
                '.' => 0,
                '#' => WALL,
                '1'..='9' => ch as u8 - b'0',
                other => return Err(format!("unexpected '{other}' at ({x}, {y})")),
            };
            row.push(cost);
        }
        rows.push(row);
    }
    CostGrid::from_rows(&rows).map_err(|e| e.to_string())
}

/// 5x5 open field with a single wall cell in the centre.
pub fn pillar_5x5() -> CostGrid {
    let mut grid = CostGrid::new(5, 5, 0).unwrap();
    grid.set_cost(Cell::new(2, 2), WALL).unwrap();
    grid
}

/// 12x8 map whose direct route is blocked by a wall with one gap at the
/// bottom, forcing a detour once the wall is sensed.
pub fn gap_wall() -> CostGrid {
    grid_from_ascii(
        "
        ......#.....
        ......#.....
        ......#.....
        ......#.....
        ......#.....
        ......#.....
        ......#.....
        ............
        ",
    )
    .unwrap()
}

/// 10x10 map where the goal at (9, 9) is sealed off by walls.
pub fn sealed_goal() -> CostGrid {
    grid_from_ascii(
        "
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        .......###
        .......#..
        .......#..
        ",
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_symbols_map_to_costs() {
        let grid = grid_from_ascii(".#5\n9..").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cost(Cell::new(0, 0)), Some(0));
        assert_eq!(grid.cost(Cell::new(1, 0)), Some(WALL));
        assert_eq!(grid.cost(Cell::new(2, 0)), Some(5));
        assert_eq!(grid.cost(Cell::new(0, 1)), Some(9));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = grid_from_ascii("..x").unwrap_err();
        assert!(err.contains("'x'"));
    }

    #[test]
    fn ragged_map_is_rejected() {
        assert!(grid_from_ascii("...\n..").is_err());
    }

    #[test]
    fn named_maps_have_expected_shape() {
        assert_eq!(pillar_5x5().cost(Cell::new(2, 2)), Some(WALL));
        let gap = gap_wall();
        assert_eq!((gap.width(), gap.height()), (12, 8));
        assert_eq!(gap.cost(Cell::new(6, 7)), Some(0));
        assert_eq!(sealed_goal().cost(Cell::new(7, 9)), Some(WALL));
    }
}
