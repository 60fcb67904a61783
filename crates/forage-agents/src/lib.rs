//! Forager state and behaviour for the Forage simulation.
//!
//! This crate holds everything that operates on a single agent without
//! touching the shared landscape. Behaviours return outcome values; the
//! population in `forage-core` applies them to the live set and the
//! environment.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`], [`AgentId`], [`Position`], and [`Traits`].
//! - [`config`] -- Per-run organism parameters ([`OrganismConfig`], [`TraitRange`]).
//! - [`death`] -- Death causes and records ([`DeathCause`], [`DeathRecord`]).
//! - [`error`] -- Error types for agent operations ([`AgentError`]).
//! - [`movement`] -- Poisson-step correlated random walk with x reflection and y wrap.
//! - [`physiology`] -- Allometric energy constants ([`Physiology`]).
//! - [`random`] -- The seedable randomness provider ([`SimRng`]).
//! - [`reproduction`] -- Semelparous reproduction and trait mutation ([`BirthSpec`]).
//! - [`vitals`] -- Metabolic and transport charges, foraging credit, starvation.

pub mod agent;
pub mod config;
pub mod death;
pub mod error;
pub mod movement;
pub mod physiology;
pub mod random;
pub mod reproduction;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentId, Position, Traits};
pub use config::{OrganismConfig, TraitRange};
pub use death::{DeathCause, DeathRecord, die};
pub use error::AgentError;
pub use movement::{Bounds, MoveOutcome, move_agent, reflect_x, wrap_y};
pub use physiology::{Physiology, ingestion_for_mass};
pub use random::SimRng;
pub use reproduction::{BirthSpec, expected_offspring, inherit_trait, reproduce};
