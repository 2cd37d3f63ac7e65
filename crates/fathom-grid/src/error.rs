//! Error types for grid construction and access.

use fathom_core::Cell;
use std::fmt;

/// Errors arising from grid construction or cell access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// A dimension exceeds what `i32` coordinates and `u32` state ids
    /// can address.
    DimensionTooLarge {
        /// Which dimension (`"width"` or `"height"`).
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The maximum allowed value.
        max: u32,
    },
    /// Rows passed to [`CostGrid::from_rows`](crate::CostGrid::from_rows)
    /// have differing lengths.
    RaggedRows {
        /// Index of the first offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// The length of row 0.
        expected: usize,
    },
    /// A cell is outside the grid.
    CellOutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
            Self::RaggedRows { row, len, expected } => {
                write!(f, "row {row} has {len} cells, expected {expected}")
            }
            Self::CellOutOfBounds {
                cell,
                width,
                height,
            } => write!(f, "cell {cell} out of bounds: [0, {width}) x [0, {height})"),
        }
    }
}

impl std::error::Error for GridError {}
