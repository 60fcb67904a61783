//! The forager: identity, position, heritable traits, and energy balance.
//!
//! An [`Agent`] owns its state and nothing else. It never holds a reference
//! to the population or the environment; behaviours in [`crate::movement`],
//! [`crate::vitals`], [`crate::reproduction`], and [`crate::death`] return
//! outcome values that the population applies.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rand::Rng;

use crate::config::OrganismConfig;
use crate::physiology::Physiology;
use crate::random;
use crate::reproduction::BirthSpec;

/// Sequential identifier assigned by the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Raw numeric value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Continuous position on the landscape, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate; bounded by reflection.
    pub x: f64,
    /// Vertical coordinate; periodic.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Heritable movement traits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    /// Mean of the Poisson-distributed step length, in cells.
    pub step_mean: f64,
    /// Half-width of the uniform turning-angle perturbation, in radians.
    pub diversion: f64,
}

/// A single forager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Identifier, unique within a run.
    pub id: AgentId,
    /// Current position.
    pub position: Position,
    /// Ticks survived without reproducing.
    pub age: u32,
    /// Fixed energy constants.
    pub physiology: Physiology,
    /// Heritable movement traits.
    pub traits: Traits,
    /// Current heading in radians.
    pub heading: f64,
    /// Age at which the agent reproduces.
    pub reproductive_age: u32,
    /// Energy balance. Zero or below means death.
    pub resources: f64,
    /// Whether the agent is still part of the population.
    pub alive: bool,
}

impl Agent {
    /// Create a newborn with the starting balance of one hourly budget.
    pub const fn new(
        id: AgentId,
        position: Position,
        physiology: Physiology,
        traits: Traits,
        heading: f64,
        reproductive_age: u32,
    ) -> Self {
        Self {
            id,
            position,
            age: 0,
            physiology,
            traits,
            heading,
            reproductive_age,
            resources: physiology.hourly_cost,
            alive: true,
        }
    }

    /// Create a founder at `position`, drawing every trait from the
    /// configured ranges.
    ///
    /// Draw order: step mean, diversion, heading, reproductive age.
    pub fn founder(
        id: AgentId,
        position: Position,
        physiology: Physiology,
        organism: &OrganismConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let step_mean = random::uniform_in(rng, organism.step_mean_range);
        let diversion = random::uniform_in(rng, organism.diversion_range);
        let heading = random::heading(rng);
        let reproductive_age = random::reproductive_age(rng);
        Self::new(
            id,
            position,
            physiology,
            Traits {
                step_mean,
                diversion,
            },
            heading,
            reproductive_age,
        )
    }

    /// Create an offspring from a birth produced by
    /// [`crate::reproduction::reproduce`].
    pub fn born(id: AgentId, spec: &BirthSpec, physiology: Physiology) -> Self {
        debug!(
            agent_id = %id,
            parent_id = %spec.parent,
            step_mean = spec.traits.step_mean,
            diversion = spec.traits.diversion,
            mutated = spec.step_mutated || spec.diversion_mutated,
            "Agent born"
        );
        Self::new(
            id,
            spec.position,
            physiology,
            spec.traits,
            spec.heading,
            spec.reproductive_age,
        )
    }

    /// Whether the agent has reached its reproductive age.
    pub const fn is_mature(&self) -> bool {
        self.age >= self.reproductive_age
    }

    /// Age by one tick. Saturates rather than wrapping.
    pub const fn grow_older(&mut self) {
        self.age = self.age.saturating_add(1);
    }
}
