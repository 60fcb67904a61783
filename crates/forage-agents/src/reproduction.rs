//! Semelparous reproduction with per-trait mutation.
//!
//! A mature agent converts its whole balance into offspring once and is then
//! removed. The brood size is Poisson-distributed with mean
//! `floor(resources / reproduction_cost)`. Each offspring inherits each
//! trait independently: with probability `mutation_rate` the trait is
//! redrawn uniformly from its configured range, otherwise it is copied.
//!
//! Per offspring the randomness is consumed in a fixed order: step-mean
//! mutation test (and redraw), diversion mutation test (and redraw),
//! heading, reproductive age.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, Position, Traits};
use crate::config::{OrganismConfig, TraitRange};
use crate::error::AgentError;
use crate::random;

/// Everything needed to place one offspring, minus its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthSpec {
    /// The parent.
    pub parent: AgentId,
    /// Birth position (the parent's position).
    pub position: Position,
    /// Inherited or mutated traits.
    pub traits: Traits,
    /// Fresh uniform heading.
    pub heading: f64,
    /// Age at which the offspring will reproduce.
    pub reproductive_age: u32,
    /// The step mean was redrawn rather than inherited.
    pub step_mutated: bool,
    /// The diversion was redrawn rather than inherited.
    pub diversion_mutated: bool,
}

/// Mean brood size for the agent's current balance.
pub fn expected_offspring(agent: &Agent) -> f64 {
    (agent.resources / agent.physiology.reproduction_cost).floor()
}

/// Copy `parent_value`, or redraw from `range` with probability `rate`.
///
/// Returns the value and whether it mutated.
pub fn inherit_trait(
    rng: &mut impl Rng,
    parent_value: f64,
    range: TraitRange,
    rate: f64,
) -> (f64, bool) {
    if random::chance(rng, rate) {
        (random::uniform_in(rng, range), true)
    } else {
        (parent_value, false)
    }
}

/// Produce the brood of `agent`.
///
/// The parent is not modified; the caller must remove it with
/// [`crate::death::die`] and [`crate::death::DeathCause::Reproduced`]
/// whatever the brood size.
///
/// # Errors
///
/// Returns [`AgentError::NotAlive`] for a dead parent and
/// [`AgentError::Distribution`] if the brood mean cannot parameterise a
/// Poisson draw.
pub fn reproduce(
    agent: &Agent,
    organism: &OrganismConfig,
    rng: &mut impl Rng,
) -> Result<Vec<BirthSpec>, AgentError> {
    if !agent.alive {
        return Err(AgentError::NotAlive(agent.id));
    }

    let count = random::poisson(rng, expected_offspring(agent))?;
    let mut brood = Vec::new();
    for _ in 0..count {
        let (step_mean, step_mutated) = inherit_trait(
            rng,
            agent.traits.step_mean,
            organism.step_mean_range,
            organism.mutation_rate,
        );
        let (diversion, diversion_mutated) = inherit_trait(
            rng,
            agent.traits.diversion,
            organism.diversion_range,
            organism.mutation_rate,
        );
        brood.push(BirthSpec {
            parent: agent.id,
            position: agent.position,
            traits: Traits {
                step_mean,
                diversion,
            },
            heading: random::heading(rng),
            reproductive_age: random::reproductive_age(rng),
            step_mutated,
            diversion_mutated,
        });
    }
    Ok(brood)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::physiology::Physiology;

    fn parent(broods: f64) -> Agent {
        let physiology = Physiology::from_mass(0.001, 0.25).unwrap();
        let mut a = Agent::new(
            AgentId(9),
            Position::new(3.5, 4.5),
            physiology,
            Traits {
                step_mean: 2.0,
                diversion: 0.25,
            },
            0.0,
            336,
        );
        a.resources = physiology.reproduction_cost * broods;
        a
    }

    #[test]
    fn expected_offspring_floors_the_ratio() {
        assert!((expected_offspring(&parent(3.7)) - 3.0).abs() < f64::EPSILON);
        assert!(expected_offspring(&parent(0.4)).abs() < f64::EPSILON);
    }

    #[test]
    fn poor_parent_has_no_offspring() {
        let mut rng = SmallRng::seed_from_u64(1);
        let brood = reproduce(&parent(0.9), &OrganismConfig::default(), &mut rng).unwrap();
        assert!(brood.is_empty());
    }

    #[test]
    fn mean_brood_size_matches_floor_ratio() {
        let cfg = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let trials = 5_000_u32;
        let p = parent(4.5);
        let total: usize = (0..trials)
            .map(|_| reproduce(&p, &cfg, &mut rng).unwrap().len())
            .sum();
        let mean = total as f64 / f64::from(trials);
        assert!((mean - 4.0).abs() < 0.15, "mean brood {mean}");
    }

    #[test]
    fn offspring_start_at_parent_position() {
        let mut rng = SmallRng::seed_from_u64(5);
        let p = parent(6.0);
        let brood = reproduce(&p, &OrganismConfig::default(), &mut rng).unwrap();
        for spec in &brood {
            assert_eq!(spec.position, p.position);
            assert_eq!(spec.parent, p.id);
            assert!((336..504).contains(&spec.reproductive_age));
        }
    }

    #[test]
    fn zero_mutation_rate_copies_traits() {
        let cfg = OrganismConfig {
            mutation_rate: 0.0,
            ..OrganismConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(8);
        let p = parent(8.0);
        for spec in reproduce(&p, &cfg, &mut rng).unwrap() {
            assert_eq!(spec.traits, p.traits);
            assert!(!spec.step_mutated && !spec.diversion_mutated);
        }
    }

    #[test]
    fn mutation_fraction_tracks_rate() {
        let mut rng = SmallRng::seed_from_u64(17);
        let rate = 0.1;
        let range = TraitRange::new(0.0, 10.0);
        let n = 20_000_u32;
        let mutated = (0..n)
            .filter(|_| inherit_trait(&mut rng, 5.0, range, rate).1)
            .count();
        let fraction = mutated as f64 / f64::from(n);
        // Binomial standard deviation is about 0.0021 here.
        assert!((fraction - rate).abs() < 0.01, "fraction {fraction}");
    }

    #[test]
    fn mutated_traits_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(21);
        let range = TraitRange::new(1.0, 2.0);
        for _ in 0..1000 {
            let (v, mutated) = inherit_trait(&mut rng, 1.5, range, 1.0);
            assert!(mutated);
            assert!(range.contains(v));
        }
    }

    #[test]
    fn dead_parent_cannot_reproduce() {
        let mut p = parent(3.0);
        p.alive = false;
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(matches!(
            reproduce(&p, &OrganismConfig::default(), &mut rng),
            Err(AgentError::NotAlive(_))
        ));
    }
}
