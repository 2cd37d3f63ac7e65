//! Grid cells and per-cell costs.

use std::fmt;

/// Per-cell traversal cost. `0` is free space; anything at or above the
/// environment's obstacle threshold is impassable.
pub type Cost = u8;

/// A grid cell in integer `(x, y)` coordinates.
///
/// Coordinates are signed so that neighbourhood arithmetic around a
/// cell may step outside the grid before being clipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Cell {
    /// Construct a cell from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev (L-inf) distance to `other`.
    pub fn chebyshev(self, other: Cell) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// `true` when both axis offsets to `other` are within `tolerance`.
    pub fn within(self, other: Cell, tolerance: u32) -> bool {
        self.chebyshev(other) <= tolerance
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A sensed disagreement between belief and ground truth.
///
/// `cost` is the ground-truth value the belief must be corrected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellChange {
    /// The cell whose believed cost is stale.
    pub cell: Cell,
    /// The newly observed cost.
    pub cost: Cost,
}
