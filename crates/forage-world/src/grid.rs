//! Cell addressing and the static capacity grid.
//!
//! A [`CapacityGrid`] is produced once per run by the landscape generator
//! (see [`crate::landscape`]) and never changes afterwards. Cells with a
//! capacity above zero are *suitable*: they hold resources and regrow.
//! Cells with zero capacity are permanently empty.
//!
//! Values are stored row-major: the offset of `(x, y)` is `y * width + x`.

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Integer address of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    /// Column, in `[0, width)`.
    pub x: u32,
    /// Row, in `[0, height)`.
    pub y: u32,
}

impl CellIndex {
    /// Create a cell index from its column and row.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Per-cell carrying capacities for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityGrid {
    /// Width in cells (the x extent).
    width: u32,
    /// Height in cells (the y extent).
    height: u32,
    /// Row-major capacities.
    cells: Vec<f64>,
}

impl CapacityGrid {
    /// Build a grid from row-major capacity values.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for a zero dimension,
    /// [`WorldError::CellCountMismatch`] if `cells` has the wrong length, and
    /// [`WorldError::InvalidCapacity`] for negative or non-finite values.
    pub fn new(width: u32, height: u32, cells: Vec<f64>) -> Result<Self, WorldError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(WorldError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        if let Some((offset, &value)) = cells
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(WorldError::InvalidCapacity { offset, value });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a homogeneous grid where every cell has the same capacity.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CapacityGrid::new`].
    pub fn uniform(width: u32, height: u32, capacity: f64) -> Result<Self, WorldError> {
        let count = cell_count(width, height)?;
        Self::new(width, height, vec![capacity; count])
    }

    /// Width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells. Always `false` for a validated grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major capacity values.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Capacity of one cell, or `None` if the index is outside the grid.
    pub fn capacity(&self, cell: CellIndex) -> Option<f64> {
        self.offset(cell).and_then(|o| self.cells.get(o).copied())
    }

    /// Whether a cell holds resources at all.
    pub fn is_suitable(&self, cell: CellIndex) -> bool {
        self.capacity(cell).is_some_and(|c| c > 0.0)
    }

    /// All resource-bearing cells, column by column.
    pub fn suitable_cells(&self) -> Vec<CellIndex> {
        let mut suitable = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let cell = CellIndex::new(x, y);
                if self.is_suitable(cell) {
                    suitable.push(cell);
                }
            }
        }
        suitable
    }

    /// Number of resource-bearing cells.
    pub fn suitable_count(&self) -> usize {
        self.cells.iter().filter(|c| **c > 0.0).count()
    }

    /// Row-major offset of a cell, or `None` outside the grid.
    pub fn offset(&self, cell: CellIndex) -> Option<usize> {
        if cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        let row = usize::try_from(cell.y).ok()?;
        let col = usize::try_from(cell.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    /// Map a continuous position onto the cell that contains it.
    ///
    /// Returns `None` when either coordinate lies outside `[0, extent)` or
    /// is not finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellIndex> {
        let inside = |v: f64, extent: u32| v.is_finite() && v >= 0.0 && v < f64::from(extent);
        if !inside(x, self.width) || !inside(y, self.height) {
            return None;
        }
        // Both values are non-negative and below a u32 extent.
        Some(CellIndex::new(x.floor() as u32, y.floor() as u32))
    }
}

/// Number of cells for the given dimensions, validating both are non-zero.
pub(crate) fn cell_count(width: u32, height: u32) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::InvalidDimensions { width, height });
    }
    let w = usize::try_from(width).map_err(|_e| WorldError::ArithmeticOverflow)?;
    let h = usize::try_from(height).map_err(|_e| WorldError::ArithmeticOverflow)?;
    w.checked_mul(h).ok_or(WorldError::ArithmeticOverflow)
}
