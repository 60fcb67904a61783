//! Per-tick aggregates and end-of-run trait samples.
//!
//! A [`TickStats`] is appended to the population history after every tick.
//! Means over an empty population are `None`, meaning "no data", so an
//! extinct run keeps producing well-formed records.

use serde::{Deserialize, Serialize};

use forage_agents::Agent;

/// Births and deaths during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// Offspring added to the population.
    pub births: u32,
    /// Agents whose balance ran out.
    pub starved: u32,
    /// Agents that left the reflecting x range.
    pub lost: u32,
    /// Parents removed after reproducing.
    pub reproduced: u32,
}

impl Census {
    /// Total agents removed this tick.
    pub const fn deaths(&self) -> u32 {
        self.starved
            .saturating_add(self.lost)
            .saturating_add(self.reproduced)
    }
}

/// Aggregates over the population and environment after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Live agents after the tick.
    pub population: usize,
    /// Mean resource level over every cell.
    pub mean_resources: f64,
    /// Mean step-length trait over live agents.
    pub mean_step: Option<f64>,
    /// Mean diversion trait over live agents.
    pub mean_diversion: Option<f64>,
    /// Mean amount regrown per suitable cell.
    pub mean_regrowth: Option<f64>,
    /// Mean x coordinate over live agents.
    pub mean_x: Option<f64>,
    /// Births and deaths.
    pub census: Census,
}

/// Trait values of one sampled agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitSample {
    /// Step-length mean.
    pub step_mean: f64,
    /// Turning-angle half-width.
    pub diversion: f64,
    /// x coordinate.
    pub x: f64,
}

impl From<&Agent> for TraitSample {
    fn from(agent: &Agent) -> Self {
        Self {
            step_mean: agent.traits.step_mean,
            diversion: agent.traits.diversion,
            x: agent.position.x,
        }
    }
}

/// Arithmetic mean, or `None` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn mean_of_values() {
        let m = mean(&[1.0, 2.0, 6.0]).unwrap_or(f64::NAN);
        assert!((m - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn census_deaths_sum_causes() {
        let census = Census {
            births: 4,
            starved: 1,
            lost: 2,
            reproduced: 3,
        };
        assert_eq!(census.deaths(), 6);
    }

    #[test]
    fn stats_serialize_missing_means_as_null() {
        let stats = TickStats {
            tick: 3,
            population: 0,
            mean_resources: 1.5,
            mean_step: None,
            mean_diversion: None,
            mean_regrowth: Some(0.5),
            mean_x: None,
            census: Census::default(),
        };
        let json = serde_json::to_value(&stats).unwrap_or_default();
        assert_eq!(json["tick"], 3);
        assert!(json["mean_step"].is_null());
        assert_eq!(json["mean_regrowth"], 0.5);
    }
}
