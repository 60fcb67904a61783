//! Allometric energy budget of a forager.
//!
//! Every cost is derived once from body mass (kg) and the landscape cell size
//! (km) and stays fixed for the agent's lifetime. One tick is one hour of
//! activity, of which 150 seconds are spent resting, so the per-second rates
//! are scaled by `3600 - 150` active seconds.
//!
//! | Quantity            | Formula                                          |
//! |---------------------|--------------------------------------------------|
//! | metabolic cost      | `0.14 * m^0.751 * 3450`                          |
//! | transport cost      | `cell_size * (0.56 * m^0.46 + 11.3 * m^0.72)`    |
//! | ingestion cap       | `2 * m^0.8 * 3450`                               |
//! | hourly cost         | `metabolic + 10 * transport`                     |
//! | reproduction cost   | `0.158 * m^0.92 * 7e6 / 15 + hourly`             |

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Active seconds in one tick.
pub const ACTIVE_SECONDS: f64 = 3600.0 - 150.0;

/// Reference step count used to size the hourly budget.
const HOURLY_STEPS: f64 = 10.0;

/// Fixed energy constants for an organism of a given mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physiology {
    /// Body mass in kilograms.
    pub mass: f64,
    /// Energy spent per tick simply by being alive.
    pub metabolic_cost: f64,
    /// Energy spent per unit of step length.
    pub transport_cost: f64,
    /// Maximum energy gained from foraging in one tick.
    pub ingestion_cap: f64,
    /// Budget of one typical tick; also the starting balance of a newborn.
    pub hourly_cost: f64,
    /// Energy that buys one expected offspring.
    pub reproduction_cost: f64,
}

impl Physiology {
    /// Derive the energy constants for `mass` on a grid of `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidOrganism`] if either input is not a
    /// positive finite number.
    pub fn from_mass(mass: f64, cell_size: f64) -> Result<Self, AgentError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(AgentError::InvalidOrganism {
                reason: format!("mass must be positive, got {mass}"),
            });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(AgentError::InvalidOrganism {
                reason: format!("cell_size must be positive, got {cell_size}"),
            });
        }

        let metabolic_cost = 0.14 * mass.powf(0.751) * ACTIVE_SECONDS;
        let transport_cost =
            cell_size * 11.3_f64.mul_add(mass.powf(0.72), 0.56 * mass.powf(0.46));
        let ingestion_cap = ingestion_for_mass(mass);
        let hourly_cost = HOURLY_STEPS.mul_add(transport_cost, metabolic_cost);
        let reproduction_cost = 0.158 * mass.powf(0.92) * 7.0e6 / 15.0 + hourly_cost;

        Ok(Self {
            mass,
            metabolic_cost,
            transport_cost,
            ingestion_cap,
            hourly_cost,
            reproduction_cost,
        })
    }

    /// Amount to request from a cell currently holding `level`.
    pub fn ingestion_request(&self, level: f64) -> f64 {
        level.min(self.ingestion_cap).max(0.0)
    }

    /// Energy charged for a step of the given length.
    pub fn transport_for(&self, step: u32) -> f64 {
        self.transport_cost * f64::from(step)
    }
}

/// Maximum hourly ingestion for an organism of `mass` kilograms.
///
/// Carrying capacity and regrowth rate are configured as multiples of this
/// value.
pub fn ingestion_for_mass(mass: f64) -> f64 {
    2.0 * mass.powf(0.8) * ACTIVE_SECONDS
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::suboptimal_flops)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn constants_follow_allometric_formulas() {
        let m: f64 = 0.001;
        let p = Physiology::from_mass(m, 0.25).unwrap();
        let metabolic = 0.14 * m.powf(0.751) * 3450.0;
        let transport = 0.25 * (0.56 * m.powf(0.46) + 11.3 * m.powf(0.72));
        assert!(close(p.metabolic_cost, metabolic));
        assert!(close(p.transport_cost, transport));
        assert!(close(p.ingestion_cap, 2.0 * m.powf(0.8) * 3450.0));
        assert!(close(p.hourly_cost, metabolic + 10.0 * transport));
        assert!(close(
            p.reproduction_cost,
            0.158 * m.powf(0.92) * 7.0e6 / 15.0 + metabolic + 10.0 * transport
        ));
    }

    #[test]
    fn larger_organisms_cost_more() {
        let small = Physiology::from_mass(0.001, 0.25).unwrap();
        let large = Physiology::from_mass(0.1, 0.25).unwrap();
        assert!(large.metabolic_cost > small.metabolic_cost);
        assert!(large.ingestion_cap > small.ingestion_cap);
        assert!(large.reproduction_cost > small.reproduction_cost);
    }

    #[test]
    fn transport_scales_with_cell_size() {
        let fine = Physiology::from_mass(0.001, 0.25).unwrap();
        let coarse = Physiology::from_mass(0.001, 0.5).unwrap();
        assert!(close(coarse.transport_cost, 2.0 * fine.transport_cost));
    }

    #[test]
    fn request_is_capped_by_level_and_ingestion() {
        let p = Physiology::from_mass(0.001, 0.25).unwrap();
        assert!(close(p.ingestion_request(1.0e9), p.ingestion_cap));
        assert!(close(p.ingestion_request(0.5), 0.5));
        assert!(close(p.ingestion_request(-1.0), 0.0));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(Physiology::from_mass(0.0, 0.25).is_err());
        assert!(Physiology::from_mass(0.001, -1.0).is_err());
        assert!(Physiology::from_mass(f64::NAN, 0.25).is_err());
    }
}
