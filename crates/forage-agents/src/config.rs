//! Organism parameters shared by every agent of a run.
//!
//! An [`OrganismConfig`] is built once from the simulation configuration and
//! passed by reference into founder creation and reproduction. Nothing in
//! this crate reads process-wide state.

use std::f64::consts::PI;

use rand_distr::Poisson;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Closed interval from which a heritable trait is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl TraitRange {
    /// Create a range. Use [`TraitRange::validate`] before sampling from it.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Check that both bounds are finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidTraitRange`] otherwise.
    pub fn validate(&self, name: &'static str) -> Result<(), AgentError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(AgentError::InvalidTraitRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Immutable per-run organism parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismConfig {
    /// Body mass in kilograms, fixed for the run (default: 0.001).
    #[serde(default = "default_mass")]
    pub mass: f64,

    /// Per-trait probability that an offspring redraws the trait instead of
    /// inheriting it (default: 0.01).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,

    /// Range of the Poisson step-length mean, in cells (default: 0--10).
    #[serde(default = "default_step_mean_range")]
    pub step_mean_range: TraitRange,

    /// Range of the turning-angle half-width, in radians (default: 0--pi).
    #[serde(default = "default_diversion_range")]
    pub diversion_range: TraitRange,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            mutation_rate: default_mutation_rate(),
            step_mean_range: default_step_mean_range(),
            diversion_range: default_diversion_range(),
        }
    }
}

impl OrganismConfig {
    /// Validate every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidOrganism`] for a non-positive mass or a
    /// mutation rate outside `[0, 1]`, and [`AgentError::InvalidTraitRange`]
    /// for inverted or negative trait ranges, or a step mean the Poisson
    /// sampler cannot draw from.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(AgentError::InvalidOrganism {
                reason: format!("mass must be positive, got {}", self.mass),
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(AgentError::InvalidOrganism {
                reason: format!("mutation_rate must lie in [0, 1], got {}", self.mutation_rate),
            });
        }
        self.step_mean_range.validate("step_mean")?;
        self.diversion_range.validate("diversion")?;
        if self.step_mean_range.min < 0.0
            || self.step_mean_range.max > Poisson::<f64>::MAX_LAMBDA
        {
            return Err(AgentError::InvalidTraitRange {
                name: "step_mean",
                min: self.step_mean_range.min,
                max: self.step_mean_range.max,
            });
        }
        if self.diversion_range.min < 0.0 {
            return Err(AgentError::InvalidTraitRange {
                name: "diversion",
                min: self.diversion_range.min,
                max: self.diversion_range.max,
            });
        }
        Ok(())
    }
}

const fn default_mass() -> f64 {
    0.001
}

const fn default_mutation_rate() -> f64 {
    0.01
}

const fn default_step_mean_range() -> TraitRange {
    TraitRange::new(0.0, 10.0)
}

const fn default_diversion_range() -> TraitRange {
    TraitRange::new(0.0, PI)
}
