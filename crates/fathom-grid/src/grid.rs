//! Dense row-major cost grid.

use crate::error::GridError;
use fathom_core::{Cell, Cost};

/// A `width × height` grid of traversal costs.
///
/// Storage is row-major: cell `(x, y)` lives at index `y * width + x`.
/// Used both for ground truth (immutable once loaded) and as the
/// backing store of the agent's belief.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostGrid {
    width: u32,
    height: u32,
    costs: Vec<Cost>,
}

impl CostGrid {
    /// Largest supported side length. Coordinates are `i32` and state
    /// ids `u32`, so `width * height` must also fit in `u32`.
    pub const MAX_DIM: u32 = u16::MAX as u32;

    /// Create a grid with every cell set to `fill`.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds [`Self::MAX_DIM`].
    pub fn new(width: u32, height: u32, fill: Cost) -> Result<Self, GridError> {
        Self::check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            costs: vec![fill; (width as usize) * (height as usize)],
        })
    }

    /// Build a grid from rows of costs, row 0 being `y = 0`.
    pub fn from_rows<R: AsRef<[Cost]>>(rows: &[R]) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, |r| r.as_ref().len());
        let width = u32::try_from(expected).unwrap_or(u32::MAX);
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        Self::check_dims(width, height)?;
        let mut costs = Vec::with_capacity(expected * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != expected {
                return Err(GridError::RaggedRows {
                    row,
                    len: r.len(),
                    expected,
                });
            }
            costs.extend_from_slice(r);
        }
        Ok(Self {
            width,
            height,
            costs,
        })
    }

    fn check_dims(width: u32, height: u32) -> Result<(), GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        if width > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Always returns `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Row-major index of `cell`, or `None` if out of bounds.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    /// Cell at row-major `index`, or `None` if out of range.
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        if index >= self.costs.len() {
            return None;
        }
        let w = self.width as usize;
        Some(Cell::new((index % w) as i32, (index / w) as i32))
    }

    /// Cost of `cell`, or `None` if out of bounds.
    pub fn cost(&self, cell: Cell) -> Option<Cost> {
        self.index(cell).map(|i| self.costs[i])
    }

    /// Overwrite the cost of `cell`, returning the previous value.
    pub fn set_cost(&mut self, cell: Cell, cost: Cost) -> Result<Cost, GridError> {
        let i = self.index(cell).ok_or(GridError::CellOutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })?;
        Ok(std::mem::replace(&mut self.costs[i], cost))
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.costs.len()).filter_map(|i| self.cell_at(i))
    }

    /// Raw row-major cost slice.
    pub fn as_slice(&self) -> &[Cost] {
        &self.costs
    }
}
