//! Error types for the `forage-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur while building grids, environments, or landscapes.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid was requested with a zero dimension.
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },

    /// The number of supplied cell values does not match `width * height`.
    #[error("cell count mismatch: expected {expected} values, got {actual}")]
    CellCountMismatch {
        /// Number of cells the dimensions imply.
        expected: usize,
        /// Number of values actually supplied.
        actual: usize,
    },

    /// A capacity value is negative or not finite.
    #[error("invalid capacity {value} at cell offset {offset}")]
    InvalidCapacity {
        /// Row-major offset of the offending cell.
        offset: usize,
        /// The rejected value.
        value: f64,
    },

    /// The regrowth rate is negative or not finite.
    #[error("invalid regrowth rate: {0}")]
    InvalidRegrowthRate(f64),

    /// A habitat fraction outside `[0, 1]` was requested.
    #[error("suitable fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),

    /// The landscape autocorrelation is negative or not finite.
    #[error("autocorrelation must be finite and non-negative, got {0}")]
    InvalidAutocorrelation(f64),

    /// The carrying capacity used for classification is not positive.
    #[error("carrying capacity must be positive and finite, got {0}")]
    InvalidCarryingCapacity(f64),

    /// Arithmetic overflow while computing grid offsets.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}
