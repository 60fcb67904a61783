//! Error types for the forage-agents crate.
//!
//! Starvation, boundary loss, and reproduction are ordinary life-cycle
//! outcomes and are reported through [`crate::death::DeathCause`], never as
//! errors. The variants here cover invalid parameters and misuse of an
//! agent's life cycle.

use crate::agent::AgentId;

/// Errors that can occur during agent construction and behaviour.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Organism parameters are out of range.
    #[error("invalid organism parameters: {reason}")]
    InvalidOrganism {
        /// Description of what is wrong.
        reason: String,
    },

    /// A heritable trait range has `min > max` or non-finite bounds.
    #[error("invalid {name} range [{min}, {max}]")]
    InvalidTraitRange {
        /// Trait name (`step_mean` or `diversion`).
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A probability distribution could not be built from its parameters.
    #[error("distribution error: {reason}")]
    Distribution {
        /// Description of the rejected parameters.
        reason: String,
    },

    /// The agent has already died and cannot die again.
    #[error("agent {0} is already dead")]
    AlreadyDead(AgentId),

    /// A behaviour was requested from a dead agent.
    #[error("agent {0} is not alive")]
    NotAlive(AgentId),
}
