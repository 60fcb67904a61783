//! Parallel trait lists kept in lockstep with the live population.
//!
//! The ledger is cleared at the start of every tick and rebuilt from the
//! agents re-admitted during that tick, so its three lists always have the
//! same length as the live collection.

use serde::Serialize;

use forage_agents::Agent;

use crate::stats;

/// Step means, diversions, and x coordinates of the live agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitLedger {
    step_means: Vec<f64>,
    diversions: Vec<f64>,
    xs: Vec<f64>,
}

impl TraitLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            step_means: Vec::new(),
            diversions: Vec::new(),
            xs: Vec::new(),
        }
    }

    /// Record a live agent.
    pub fn push(&mut self, agent: &Agent) {
        self.step_means.push(agent.traits.step_mean);
        self.diversions.push(agent.traits.diversion);
        self.xs.push(agent.position.x);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.step_means.clear();
        self.diversions.clear();
        self.xs.clear();
    }

    /// Number of recorded agents.
    pub fn len(&self) -> usize {
        self.step_means.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.step_means.is_empty()
    }

    /// Whether all three lists have the same length.
    pub fn is_consistent(&self) -> bool {
        self.step_means.len() == self.diversions.len() && self.diversions.len() == self.xs.len()
    }

    /// Step-length means.
    pub fn step_means(&self) -> &[f64] {
        &self.step_means
    }

    /// Diversions.
    pub fn diversions(&self) -> &[f64] {
        &self.diversions
    }

    /// x coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Mean step-length trait.
    pub fn mean_step(&self) -> Option<f64> {
        stats::mean(&self.step_means)
    }

    /// Mean diversion trait.
    pub fn mean_diversion(&self) -> Option<f64> {
        stats::mean(&self.diversions)
    }

    /// Mean x coordinate.
    pub fn mean_x(&self) -> Option<f64> {
        stats::mean(&self.xs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_agents::{AgentId, Physiology, Position, Traits};

    use super::*;

    fn agent(step_mean: f64, diversion: f64, x: f64) -> Agent {
        Agent::new(
            AgentId(0),
            Position::new(x, 0.0),
            Physiology::from_mass(0.001, 0.25).unwrap(),
            Traits {
                step_mean,
                diversion,
            },
            0.0,
            400,
        )
    }

    #[test]
    fn push_keeps_lists_aligned() {
        let mut ledger = TraitLedger::new();
        ledger.push(&agent(1.0, 0.5, 2.0));
        ledger.push(&agent(3.0, 1.5, 4.0));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_consistent());
        assert!((ledger.mean_step().unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((ledger.mean_diversion().unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((ledger.mean_x().unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clear_empties_every_list() {
        let mut ledger = TraitLedger::new();
        ledger.push(&agent(1.0, 0.5, 2.0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.xs().is_empty());
        assert!(ledger.diversions().is_empty());
        assert!(ledger.mean_step().is_none());
    }
}
