//! Simulated range sensor.
//!
//! The agent observes the exact ground-truth cost of every cell within
//! [`SENSOR_RADIUS`] (Chebyshev distance) of its pose, clipped to the
//! grid. Only cells whose believed cost differs are reported.

use fathom_core::{Cell, CellChange, Environment};
use fathom_grid::CostGrid;

/// Chebyshev radius of the sensed window (a 5x5 square).
pub const SENSOR_RADIUS: i32 = 2;

/// Compare ground truth against belief around `pose`.
///
/// Returns one [`CellChange`] per in-window cell whose true cost differs
/// from its believed cost, carrying the true cost. Neither grid is
/// modified. Each cell appears at most once.
pub fn sense(truth: &CostGrid, belief: &dyn Environment, pose: Cell) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for dx in -SENSOR_RADIUS..=SENSOR_RADIUS {
        for dy in -SENSOR_RADIUS..=SENSOR_RADIUS {
            let cell = pose.offset(dx, dy);
            let Some(cost) = truth.cost(cell) else {
                continue;
            };
            if belief.cost(cell) != Some(cost) {
                changes.push(CellChange { cell, cost });
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_grid::{Connectivity, GridEnvironment};
    use fathom_test_utils::{grid_from_ascii, WALL};
    use proptest::prelude::*;

    fn blank_belief(truth: &CostGrid) -> GridEnvironment {
        let (w, h) = (truth.width(), truth.height());
        GridEnvironment::with_uniform_belief(w, h, 0, Connectivity::Eight, 1).unwrap()
    }

    #[test]
    fn reports_only_differing_cells() {
        let truth = grid_from_ascii(
            "
            #....
            .....
            ..3..
            .....
            ....#
            ",
        )
        .unwrap();
        let belief = blank_belief(&truth);
        let changes = sense(&truth, &belief, Cell::new(2, 2));
        assert_eq!(changes.len(), 3);
        assert!(changes.contains(&CellChange {
            cell: Cell::new(0, 0),
            cost: WALL
        }));
        assert!(changes.contains(&CellChange {
            cell: Cell::new(2, 2),
            cost: 3
        }));
        assert!(changes.contains(&CellChange {
            cell: Cell::new(4, 4),
            cost: WALL
        }));
    }

    #[test]
    fn cells_beyond_radius_are_unseen() {
        let truth = grid_from_ascii(
            "
            ......
            .....#
            ",
        )
        .unwrap();
        let belief = blank_belief(&truth);
        assert!(sense(&truth, &belief, Cell::new(2, 0)).is_empty());
        assert_eq!(sense(&truth, &belief, Cell::new(3, 0)).len(), 1);
    }

    #[test]
    fn window_is_clipped_at_corner() {
        let truth = CostGrid::new(10, 10, 7).unwrap();
        let belief = blank_belief(&truth);
        // 3x3 of the 5x5 window lies on the grid.
        assert_eq!(sense(&truth, &belief, Cell::new(0, 0)).len(), 9);
    }

    #[test]
    fn matching_belief_reports_nothing() {
        let truth = CostGrid::new(6, 6, 0).unwrap();
        let belief = blank_belief(&truth);
        assert!(sense(&truth, &belief, Cell::new(3, 3)).is_empty());
    }

    proptest! {
        #[test]
        fn changes_are_bounded_unique_and_true(
            costs in prop::collection::vec(0u8..4, 64),
            px in 0i32..8,
            py in 0i32..8,
        ) {
            let rows: Vec<&[u8]> = costs.chunks(8).collect();
            let truth = CostGrid::from_rows(&rows).unwrap();
            let belief = blank_belief(&truth);
            let pose = Cell::new(px, py);
            let changes = sense(&truth, &belief, pose);
            for (i, c) in changes.iter().enumerate() {
                prop_assert!(pose.chebyshev(c.cell) <= SENSOR_RADIUS as u32);
                prop_assert_eq!(truth.cost(c.cell), Some(c.cost));
                prop_assert!(changes[i + 1..].iter().all(|o| o.cell != c.cell));
            }
        }
    }
}
