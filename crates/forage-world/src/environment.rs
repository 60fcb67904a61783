//! The resource landscape: depletion by foraging and logistic regrowth.
//!
//! An [`Environment`] pairs the static [`CapacityGrid`] with the current
//! resource level of every cell. Levels start at capacity. Each tick the
//! population drains cells through [`Environment::consume`], then the
//! environment applies one round of logistic regrowth to every suitable cell
//! and clamps all levels back into `[0, capacity]`:
//!
//! ```text
//! added = regrowth_rate * (1 - level / capacity)
//! ```
//!
//! Unsuitable cells (capacity zero) stay at zero forever.
//!
//! The environment never calls back into agents or the population.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::grid::{CapacityGrid, CellIndex};

/// Outcome of one regrowth pass over the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegrowthReport {
    /// Number of suitable cells that were regrown.
    pub cells: usize,
    /// Sum of resource added across those cells (before clipping).
    pub total: f64,
}

impl RegrowthReport {
    /// Mean amount added per suitable cell, or `None` if no cell regrew.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.cells == 0 {
            return None;
        }
        Some(self.total / self.cells as f64)
    }
}

/// Current resource levels over a fixed capacity grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Static per-cell capacities.
    capacity: CapacityGrid,
    /// Current row-major resource levels.
    levels: Vec<f64>,
    /// Logistic regrowth constant shared by all suitable cells.
    regrowth_rate: f64,
}

impl Environment {
    /// Create an environment with every cell filled to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidRegrowthRate`] if `regrowth_rate` is
    /// negative or not finite.
    pub fn new(capacity: CapacityGrid, regrowth_rate: f64) -> Result<Self, WorldError> {
        if !regrowth_rate.is_finite() || regrowth_rate < 0.0 {
            return Err(WorldError::InvalidRegrowthRate(regrowth_rate));
        }
        let levels = capacity.values().to_vec();
        debug!(
            width = capacity.width(),
            height = capacity.height(),
            suitable = capacity.suitable_count(),
            regrowth_rate,
            "Environment created"
        );
        Ok(Self {
            capacity,
            levels,
            regrowth_rate,
        })
    }

    /// The static capacity grid.
    pub const fn capacity(&self) -> &CapacityGrid {
        &self.capacity
    }

    /// Current row-major resource levels (read-only, for observers).
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// The logistic regrowth constant.
    pub const fn regrowth_rate(&self) -> f64 {
        self.regrowth_rate
    }

    /// Width in cells.
    pub const fn width(&self) -> u32 {
        self.capacity.width()
    }

    /// Height in cells.
    pub const fn height(&self) -> u32 {
        self.capacity.height()
    }

    /// Current level of one cell, or `None` outside the grid.
    pub fn level(&self, cell: CellIndex) -> Option<f64> {
        self.capacity
            .offset(cell)
            .and_then(|o| self.levels.get(o).copied())
    }

    /// Cell containing a continuous position, if any.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellIndex> {
        self.capacity.cell_at(x, y)
    }

    /// All resource-bearing cells.
    pub fn suitable_cells(&self) -> Vec<CellIndex> {
        self.capacity.suitable_cells()
    }

    /// Take up to `requested` units from a cell.
    ///
    /// Returns the amount actually granted, `min(level, requested)`, and
    /// lowers the cell by that amount. Cells outside the grid grant nothing.
    pub fn consume(&mut self, cell: CellIndex, requested: f64) -> f64 {
        let Some(level) = self
            .capacity
            .offset(cell)
            .and_then(|o| self.levels.get_mut(o))
        else {
            return 0.0;
        };
        let granted = level.min(requested.max(0.0));
        *level -= granted;
        granted
    }

    /// Apply one step of logistic regrowth to a single cell.
    ///
    /// Returns the amount added. Unsuitable cells and cells outside the grid
    /// return zero and are left untouched.
    pub fn regrow(&mut self, cell: CellIndex) -> f64 {
        let Some(offset) = self.capacity.offset(cell) else {
            return 0.0;
        };
        let capacity = self.capacity.values().get(offset).copied().unwrap_or(0.0);
        match self.levels.get_mut(offset) {
            Some(level) => regrow_level(level, capacity, self.regrowth_rate),
            None => 0.0,
        }
    }

    /// Regrow every suitable cell once.
    ///
    /// Call once per tick, after all consumption for that tick.
    pub fn regrow_all(&mut self) -> RegrowthReport {
        let rate = self.regrowth_rate;
        let mut report = RegrowthReport::default();
        for (level, &capacity) in self.levels.iter_mut().zip(self.capacity.values()) {
            if capacity > 0.0 {
                report.total += regrow_level(level, capacity, rate);
                report.cells = report.cells.saturating_add(1);
            }
        }
        report
    }

    /// Clamp every cell into `[0, capacity]`.
    pub fn clip(&mut self) {
        for (level, &capacity) in self.levels.iter_mut().zip(self.capacity.values()) {
            *level = level.clamp(0.0, capacity);
        }
    }

    /// Mean level over the whole grid, counting unsuitable cells as zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_level(&self) -> f64 {
        if self.levels.is_empty() {
            return 0.0;
        }
        self.levels.iter().sum::<f64>() / self.levels.len() as f64
    }

    /// Whether every cell satisfies `0 <= level <= capacity`.
    pub fn within_capacity(&self) -> bool {
        self.levels
            .iter()
            .zip(self.capacity.values())
            .all(|(level, capacity)| *level >= 0.0 && level <= capacity)
    }
}

/// Logistic step for one suitable cell. Returns the amount added.
fn regrow_level(level: &mut f64, capacity: f64, rate: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    let added = rate * (1.0 - *level / capacity);
    *level += added;
    added
}
