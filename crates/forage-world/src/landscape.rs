//! Landscape generation: continuous fields and habitat classification.
//!
//! The simulation core only ever sees a [`CapacityGrid`]. Producing one is a
//! two-step process kept behind the [`LandscapeGenerator`] interface:
//!
//! 1. `generate(width, height, autocorrelation)` yields a continuous
//!    [`Field`] with values in `[0, 1]`.
//! 2. [`classify`] turns the field into suitable and unsuitable cells, with
//!    the `round(p * n)` highest-valued cells becoming habitat at the given
//!    carrying capacity.
//!
//! [`MidpointDisplacement`] is the built-in generator. It runs the
//! diamond-square algorithm on the smallest `2^k + 1` square covering the
//! grid. At each refinement level the random displacement shrinks by a
//! factor `2^(-autocorrelation)`: `0` gives rough, uncorrelated noise and
//! `1` gives smooth, strongly clustered habitat.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::grid::{CapacityGrid, cell_count};

/// A continuous scalar field over the grid, row-major, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Width in cells.
    width: u32,
    /// Height in cells.
    height: u32,
    /// Row-major values.
    values: Vec<f64>,
}

impl Field {
    /// Wrap row-major values as a field.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] or
    /// [`WorldError::CellCountMismatch`] if the values do not fit.
    pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> Result<Self, WorldError> {
        let expected = cell_count(width, height)?;
        if values.len() != expected {
            return Err(WorldError::CellCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Produces continuous landscape fields.
///
/// The `autocorrelation` parameter is forwarded verbatim from configuration;
/// its interpretation belongs to the generator.
pub trait LandscapeGenerator {
    /// Generate a `width` x `height` field.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the dimensions or the autocorrelation are
    /// invalid.
    fn generate(
        &self,
        width: u32,
        height: u32,
        autocorrelation: f64,
        rng: &mut impl Rng,
    ) -> Result<Field, WorldError>;
}

/// Diamond-square midpoint displacement generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointDisplacement;

impl MidpointDisplacement {
    /// Create the generator.
    pub const fn new() -> Self {
        Self
    }
}

impl LandscapeGenerator for MidpointDisplacement {
    fn generate(
        &self,
        width: u32,
        height: u32,
        autocorrelation: f64,
        rng: &mut impl Rng,
    ) -> Result<Field, WorldError> {
        cell_count(width, height)?;
        if !autocorrelation.is_finite() || autocorrelation < 0.0 {
            return Err(WorldError::InvalidAutocorrelation(autocorrelation));
        }
        let extent = usize::try_from(width.max(height)).map_err(|_e| WorldError::ArithmeticOverflow)?;
        let size = square_size(extent).ok_or(WorldError::ArithmeticOverflow)?;
        let square = diamond_square(size, autocorrelation, rng);

        let mut values = Vec::with_capacity(cell_count(width, height)?);
        for y in 0..height {
            for x in 0..width {
                let offset = usize::try_from(y)
                    .ok()
                    .and_then(|row| row.checked_mul(size))
                    .and_then(|o| usize::try_from(x).ok().and_then(|col| o.checked_add(col)))
                    .ok_or(WorldError::ArithmeticOverflow)?;
                values.push(square.get(offset).copied().unwrap_or(0.0));
            }
        }
        normalise(&mut values);
        Field::from_values(width, height, values)
    }
}

/// Classify a field into habitat and non-habitat.
///
/// The `round(suitable_fraction * n)` cells with the highest values receive
/// `carrying_capacity`; all others receive zero. Ties keep row-major order.
///
/// # Errors
///
/// Returns [`WorldError::InvalidFraction`] if the fraction is outside
/// `[0, 1]` and [`WorldError::InvalidCarryingCapacity`] if the capacity is
/// not positive.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn classify(
    field: &Field,
    suitable_fraction: f64,
    carrying_capacity: f64,
) -> Result<CapacityGrid, WorldError> {
    if !(0.0..=1.0).contains(&suitable_fraction) {
        return Err(WorldError::InvalidFraction(suitable_fraction));
    }
    if !carrying_capacity.is_finite() || carrying_capacity <= 0.0 {
        return Err(WorldError::InvalidCarryingCapacity(carrying_capacity));
    }

    let n = field.values.len();
    // Fraction is in [0, 1], so the product lies in [0, n].
    let suitable = ((suitable_fraction * n as f64).round() as usize).min(n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let va = field.values.get(a).copied().unwrap_or(0.0);
        let vb = field.values.get(b).copied().unwrap_or(0.0);
        vb.total_cmp(&va)
    });

    let mut cells = vec![0.0; n];
    for &offset in order.iter().take(suitable) {
        if let Some(cell) = cells.get_mut(offset) {
            *cell = carrying_capacity;
        }
    }
    CapacityGrid::new(field.width, field.height, cells)
}

/// Smallest `2^k + 1 >= extent`, never below 3.
fn square_size(extent: usize) -> Option<usize> {
    let mut side: usize = 2;
    while side.checked_add(1)? < extent {
        side = side.checked_mul(2)?;
    }
    side.checked_add(1)
}

/// Run diamond-square on a `size` x `size` square (`size = 2^k + 1`).
///
/// Every index stays below `size * size`; reads go through `get` anyway.
#[allow(clippy::arithmetic_side_effects)]
fn diamond_square(size: usize, autocorrelation: f64, rng: &mut impl Rng) -> Vec<f64> {
    let mut grid = vec![0.0_f64; size * size];
    let at = |x: usize, y: usize| y * size + x;
    let last = size - 1;

    for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
        if let Some(v) = grid.get_mut(at(x, y)) {
            *v = rng.random_range(-1.0..=1.0);
        }
    }

    let decay = 2.0_f64.powf(-autocorrelation);
    let mut scale = 1.0;
    let mut step = last;
    while step > 1 {
        let half = step / 2;

        // Diamond step: centre of every square.
        for y in (half..size).step_by(step) {
            for x in (half..size).step_by(step) {
                let corners = [
                    (x - half, y - half),
                    (x + half, y - half),
                    (x - half, y + half),
                    (x + half, y + half),
                ];
                let sum: f64 = corners
                    .iter()
                    .map(|&(cx, cy)| grid.get(at(cx, cy)).copied().unwrap_or(0.0))
                    .sum();
                let noise = rng.random_range(-scale..=scale);
                if let Some(v) = grid.get_mut(at(x, y)) {
                    *v = sum / 4.0 + noise;
                }
            }
        }

        // Square step: midpoint of every edge, averaging in-bounds neighbours.
        for y in (0..size).step_by(half) {
            let start = if (y / half) % 2 == 0 { half } else { 0 };
            for x in (start..size).step_by(step) {
                let mut sum = 0.0;
                let mut count = 0.0;
                if x >= half {
                    sum += grid.get(at(x - half, y)).copied().unwrap_or(0.0);
                    count += 1.0;
                }
                if x + half < size {
                    sum += grid.get(at(x + half, y)).copied().unwrap_or(0.0);
                    count += 1.0;
                }
                if y >= half {
                    sum += grid.get(at(x, y - half)).copied().unwrap_or(0.0);
                    count += 1.0;
                }
                if y + half < size {
                    sum += grid.get(at(x, y + half)).copied().unwrap_or(0.0);
                    count += 1.0;
                }
                let noise = rng.random_range(-scale..=scale);
                if let Some(v) = grid.get_mut(at(x, y)) {
                    *v = sum / count + noise;
                }
            }
        }

        step = half;
        scale *= decay;
    }
    grid
}

/// Rescale values linearly into `[0, 1]`. A flat field becomes all zeros.
fn normalise(values: &mut [f64]) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    for v in values.iter_mut() {
        *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn square_size_covers_extent() {
        assert_eq!(square_size(1), Some(3));
        assert_eq!(square_size(3), Some(3));
        assert_eq!(square_size(4), Some(5));
        assert_eq!(square_size(10), Some(17));
        assert_eq!(square_size(17), Some(17));
    }

    #[test]
    fn generated_field_is_normalised() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = MidpointDisplacement::new()
            .generate(10, 6, 0.5, &mut rng)
            .unwrap();
        assert_eq!(field.values().len(), 60);
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        let max = field.values().iter().copied().fold(0.0, f64::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn generation_is_reproducible() {
        let a = MidpointDisplacement::new()
            .generate(8, 8, 1.0, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let b = MidpointDisplacement::new()
            .generate(8, 8, 1.0, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(MidpointDisplacement::new().generate(0, 5, 0.5, &mut rng).is_err());
        assert!(matches!(
            MidpointDisplacement::new().generate(5, 5, f64::NAN, &mut rng),
            Err(WorldError::InvalidAutocorrelation(_))
        ));
    }

    #[test]
    fn classify_marks_highest_cells() {
        let field = Field::from_values(2, 2, vec![0.1, 0.9, 0.5, 0.3]).unwrap();
        let grid = classify(&field, 0.5, 20.0).unwrap();
        assert_eq!(grid.values(), &[0.0, 20.0, 20.0, 0.0]);
    }

    #[test]
    fn classify_extremes() {
        let field = Field::from_values(3, 1, vec![0.2, 0.4, 0.6]).unwrap();
        assert_eq!(classify(&field, 0.0, 5.0).unwrap().suitable_count(), 0);
        assert_eq!(classify(&field, 1.0, 5.0).unwrap().suitable_count(), 3);
    }

    #[test]
    fn classify_rejects_bad_fraction() {
        let field = Field::from_values(1, 1, vec![0.5]).unwrap();
        assert!(matches!(
            classify(&field, 1.5, 5.0),
            Err(WorldError::InvalidFraction(_))
        ));
        assert!(matches!(
            classify(&field, 0.5, 0.0),
            Err(WorldError::InvalidCarryingCapacity(_))
        ));
    }

    #[test]
    fn habitat_fraction_matches_request() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = MidpointDisplacement::new()
            .generate(10, 10, 0.0, &mut rng)
            .unwrap();
        let grid = classify(&field, 0.2, 1.0).unwrap();
        assert_eq!(grid.suitable_count(), 20);
    }
}
