//! Resource landscape for the Forage simulation.
//!
//! This crate models the physical world the foragers live on: a rectangular
//! grid of cells, each with a fixed carrying capacity and a current resource
//! level that is depleted by foraging and replenished by logistic regrowth.
//!
//! # Modules
//!
//! - [`environment`] -- [`Environment`]: consumption, regrowth, clipping, and
//!   grid-wide aggregates.
//! - [`error`] -- Error types for grid and landscape construction.
//! - [`grid`] -- [`CellIndex`] addressing and the static [`CapacityGrid`].
//! - [`landscape`] -- The [`LandscapeGenerator`] interface, the
//!   [`MidpointDisplacement`] generator, and habitat classification
//!   ([`classify`]).

pub mod environment;
pub mod error;
pub mod grid;
pub mod landscape;

// Re-export primary types at crate root.
pub use environment::{Environment, RegrowthReport};
pub use error::WorldError;
pub use grid::{CapacityGrid, CellIndex};
pub use landscape::{Field, LandscapeGenerator, MidpointDisplacement, classify};
