//! Energy bookkeeping applied to agents each tick.
//!
//! The balance only decreases through metabolic and transport costs and only
//! increases through foraging. An agent whose balance is zero or below is
//! starved and must not act again.

use crate::agent::Agent;

/// Deduct one tick of metabolic cost. Returns the energy spent.
pub fn charge_metabolism(agent: &mut Agent) -> f64 {
    let cost = agent.physiology.metabolic_cost;
    agent.resources -= cost;
    cost
}

/// Deduct the transport cost of a step of length `step`. Returns the energy
/// spent.
pub fn charge_transport(agent: &mut Agent, step: u32) -> f64 {
    let cost = agent.physiology.transport_for(step);
    agent.resources -= cost;
    cost
}

/// Amount the agent asks for from a cell holding `level`.
pub fn forage_request(agent: &Agent, level: f64) -> f64 {
    agent.physiology.ingestion_request(level)
}

/// Credit energy granted by the environment. Negative grants are ignored.
pub fn forage(agent: &mut Agent, granted: f64) {
    if granted > 0.0 {
        agent.resources += granted;
    }
}

/// Whether the balance has dropped to zero or below.
pub fn is_starved(agent: &Agent) -> bool {
    agent.resources <= 0.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, Position, Traits};
    use crate::physiology::Physiology;

    fn agent() -> Agent {
        Agent::new(
            AgentId(1),
            Position::new(0.0, 0.0),
            Physiology::from_mass(0.001, 0.25).unwrap(),
            Traits {
                step_mean: 2.0,
                diversion: 0.1,
            },
            0.0,
            400,
        )
    }

    #[test]
    fn metabolism_reduces_balance() {
        let mut a = agent();
        let before = a.resources;
        let spent = charge_metabolism(&mut a);
        assert!((before - spent - a.resources).abs() < 1e-12);
        assert!(spent > 0.0);
    }

    #[test]
    fn transport_is_proportional_to_step() {
        let mut a = agent();
        let spent = charge_transport(&mut a, 3);
        assert!((spent - 3.0 * a.physiology.transport_cost).abs() < 1e-12);
        let mut b = agent();
        assert!(charge_transport(&mut b, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn foraging_only_adds() {
        let mut a = agent();
        let before = a.resources;
        forage(&mut a, 1.5);
        assert!((a.resources - before - 1.5).abs() < 1e-12);
        forage(&mut a, -10.0);
        assert!((a.resources - before - 1.5).abs() < 1e-12);
    }

    #[test]
    fn hourly_budget_covers_metabolism_and_ten_steps() {
        let mut a = agent();
        charge_metabolism(&mut a);
        charge_transport(&mut a, 9);
        assert!(!is_starved(&a));
        charge_transport(&mut a, 1);
        assert!(is_starved(&a) || a.resources.abs() < 1e-12);
    }

    #[test]
    fn starved_at_zero_balance() {
        let mut a = agent();
        a.resources = 0.0;
        assert!(is_starved(&a));
        a.resources = -1.0;
        assert!(is_starved(&a));
    }
}
