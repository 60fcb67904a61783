//! Death causes and records.
//!
//! Agents leave the population in three ways: their balance runs out, a
//! step carries them outside the reflecting x range, or they reproduce.
//! All three end in [`die`], which marks the agent dead exactly once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::{Agent, AgentId, Position};
use crate::error::AgentError;

/// Why an agent left the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Balance reached zero or below.
    Starvation,
    /// Position left `[0, max_x)` after reflection.
    BoundaryLoss,
    /// Removed after its single reproduction event.
    Reproduced,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::BoundaryLoss => write!(f, "boundary_loss"),
            Self::Reproduced => write!(f, "reproduced"),
        }
    }
}

/// Snapshot of an agent at the moment it died.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// The agent that died.
    pub id: AgentId,
    /// Why it died.
    pub cause: DeathCause,
    /// Age in ticks at death.
    pub age: u32,
    /// Where it died.
    pub position: Position,
}

/// Mark `agent` dead.
///
/// # Errors
///
/// Returns [`AgentError::AlreadyDead`] if the agent was already dead.
pub fn die(agent: &mut Agent, cause: DeathCause) -> Result<DeathRecord, AgentError> {
    if !agent.alive {
        return Err(AgentError::AlreadyDead(agent.id));
    }
    agent.alive = false;
    debug!(
        agent_id = %agent.id,
        cause = %cause,
        age = agent.age,
        x = agent.position.x,
        y = agent.position.y,
        "Agent died"
    );
    Ok(DeathRecord {
        id: agent.id,
        cause,
        age: agent.age,
        position: agent.position,
    })
}
