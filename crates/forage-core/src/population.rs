//! The population: live agents, the shared environment, and the per-tick
//! protocol that ties them together.
//!
//! Each call to [`Population::tick`] runs these steps:
//!
//! 1. Shuffle the live agents and take them out of the live collection; clear
//!    the trait ledger.
//! 2. For each agent in shuffled order:
//!    - move; if the balance ran out, it dies of starvation;
//!    - if its x coordinate is inside the grid, it forages from its cell, then
//!      either reproduces (if mature) or ages by one tick and is re-admitted;
//!    - otherwise it dies of boundary loss without foraging.
//!
//!    Offspring join the live collection immediately but do not act until
//!    the next tick.
//! 3. Regrow every suitable cell, then clamp all levels to capacity.
//! 4. Append a [`TickStats`] record to the history.
//!
//! The shuffle order decides which agent gets to a depleted cell first.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info, warn};

use forage_agents::{
    Agent, AgentError, AgentId, Bounds, DeathCause, OrganismConfig, Physiology, Position,
    move_agent, reproduce, vitals,
};
use forage_world::{CapacityGrid, Environment, WorldError};

use crate::config::{ConfigError, SimulationConfig};
use crate::ledger::TraitLedger;
use crate::stats::{Census, TickStats, TraitSample};

/// Errors that can occur while building or advancing a population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// The capacity grid has no resource-bearing cell to place founders on.
    #[error("landscape has no resource-bearing cells")]
    NoHabitat,

    /// The configuration was rejected.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The environment could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent behaviour failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },
}

/// Live agents, the environment, and the statistics history of one run.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    environment: Environment,
    ledger: TraitLedger,
    history: Vec<TickStats>,
    organism: OrganismConfig,
    physiology: Physiology,
    bounds: Bounds,
    next_id: u64,
    tick: u64,
}

impl Population {
    /// Build the environment from `capacity` and place the founders.
    ///
    /// Founders are placed on uniformly chosen resource-bearing cells, at the
    /// cell's integer corner. For each founder the cell is drawn first, then
    /// its traits, heading, and reproductive age.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::NoHabitat`] if `capacity` has no
    /// resource-bearing cell, and [`PopulationError::Config`] or
    /// [`PopulationError::World`] for invalid parameters.
    pub fn new(
        config: &SimulationConfig,
        capacity: CapacityGrid,
        rng: &mut impl Rng,
    ) -> Result<Self, PopulationError> {
        config.validate()?;
        let physiology = config.physiology()?;
        let params = config.environment_params();
        let bounds = Bounds::from_grid(capacity.width(), capacity.height());
        let environment = Environment::new(capacity, params.regrowth_rate)?;

        let habitat = environment.suitable_cells();
        if habitat.is_empty() {
            warn!(
                width = environment.width(),
                height = environment.height(),
                "No resource-bearing cells; refusing to place founders"
            );
            return Err(PopulationError::NoHabitat);
        }

        let mut population = Self {
            agents: Vec::new(),
            environment,
            ledger: TraitLedger::new(),
            history: Vec::new(),
            organism: config.organism(),
            physiology,
            bounds,
            next_id: 0,
            tick: 0,
        };

        for _ in 0..config.population.initial_agents {
            let Some(cell) = habitat.choose(rng) else {
                return Err(PopulationError::NoHabitat);
            };
            let position = Position::new(f64::from(cell.x), f64::from(cell.y));
            let id = population.allocate_id();
            let founder = Agent::founder(id, position, physiology, &population.organism, rng);
            population.admit(founder);
        }

        info!(
            founders = population.agents.len(),
            habitat_cells = habitat.len(),
            width = population.environment.width(),
            height = population.environment.height(),
            regrowth_rate = params.regrowth_rate,
            "Population initialised"
        );

        Ok(population)
    }

    /// Run one tick of the protocol and return its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::Agent`] if an agent behaviour fails, which
    /// only happens for trait values no Poisson sampler accepts. The failing
    /// agent and every agent not yet processed stay in the live set, no
    /// statistics are recorded, and the tick counter is not advanced.
    /// Consumption and births that already happened are kept.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Result<TickStats, PopulationError> {
        let tick = self.tick.saturating_add(1);

        let mut cohort = std::mem::take(&mut self.agents);
        cohort.shuffle(rng);
        self.ledger.clear();
        let mut census = Census::default();

        let mut pending = cohort.into_iter();
        let mut failure = None;
        for mut agent in pending.by_ref() {
            match self.advance(&mut agent, rng, &mut census) {
                Ok(true) => self.admit(agent),
                Ok(false) => {}
                Err(err) => {
                    if agent.alive {
                        self.admit(agent);
                    }
                    failure = Some(err);
                    break;
                }
            }
        }
        if let Some(err) = failure {
            for agent in pending {
                self.admit(agent);
            }
            warn!(
                tick,
                population = self.agents.len(),
                error = %err,
                "Tick aborted; unprocessed agents kept"
            );
            return Err(err);
        }

        let regrowth = self.environment.regrow_all();
        self.environment.clip();

        let stats = TickStats {
            tick,
            population: self.agents.len(),
            mean_resources: self.environment.mean_level(),
            mean_step: self.ledger.mean_step(),
            mean_diversion: self.ledger.mean_diversion(),
            mean_regrowth: regrowth.mean(),
            mean_x: self.ledger.mean_x(),
            census,
        };

        debug!(
            tick,
            population = stats.population,
            births = census.births,
            starved = census.starved,
            lost = census.lost,
            reproduced = census.reproduced,
            mean_resources = stats.mean_resources,
            "Tick complete"
        );

        self.tick = tick;
        self.history.push(stats.clone());
        Ok(stats)
    }

    /// Move, feed, and then either age or reproduce one agent.
    ///
    /// Returns whether the agent stays in the live set. Offspring are
    /// admitted here.
    fn advance(
        &mut self,
        agent: &mut Agent,
        rng: &mut impl Rng,
        census: &mut Census,
    ) -> Result<bool, PopulationError> {
        let outcome =
            move_agent(agent, self.bounds, rng).map_err(|source| PopulationError::Agent {
                agent_id: agent.id,
                source,
            })?;

        if outcome.died {
            bury(agent, DeathCause::Starvation)?;
            census.starved = census.starved.saturating_add(1);
            return Ok(false);
        }

        let cell = if self.bounds.contains_x(agent.position.x) {
            self.environment
                .cell_at(agent.position.x, agent.position.y)
        } else {
            None
        };
        let Some(cell) = cell else {
            bury(agent, DeathCause::BoundaryLoss)?;
            census.lost = census.lost.saturating_add(1);
            return Ok(false);
        };

        let level = self.environment.level(cell).unwrap_or(0.0);
        let granted = self
            .environment
            .consume(cell, vitals::forage_request(agent, level));
        vitals::forage(agent, granted);

        if !agent.is_mature() {
            agent.grow_older();
            return Ok(true);
        }

        let brood = reproduce(agent, &self.organism, rng).map_err(|source| {
            PopulationError::Agent {
                agent_id: agent.id,
                source,
            }
        })?;
        bury(agent, DeathCause::Reproduced)?;
        census.reproduced = census.reproduced.saturating_add(1);
        for spec in &brood {
            let id = self.allocate_id();
            self.admit(Agent::born(id, spec, self.physiology));
            census.births = census.births.saturating_add(1);
        }
        Ok(false)
    }

    /// Uniform sample of trait values from the live agents.
    ///
    /// Returns every agent when there are at most `n`, otherwise `n`
    /// distinct agents.
    pub fn sample(&self, rng: &mut impl Rng, n: usize) -> Vec<TraitSample> {
        if self.agents.len() <= n {
            self.agents.iter().map(TraitSample::from).collect()
        } else {
            self.agents
                .choose_multiple(rng, n)
                .map(TraitSample::from)
                .collect()
        }
    }

    /// Live agents in their current order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population is extinct.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// The shared environment.
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Trait lists of the live agents.
    pub const fn ledger(&self) -> &TraitLedger {
        &self.ledger
    }

    /// Statistics of every completed tick, oldest first.
    pub fn history(&self) -> &[TickStats] {
        &self.history
    }

    /// Number of completed ticks.
    pub const fn ticks_elapsed(&self) -> u64 {
        self.tick
    }

    /// Energy constants shared by every agent.
    pub const fn physiology(&self) -> &Physiology {
        &self.physiology
    }

    /// Walkable extent.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn admit(&mut self, agent: Agent) {
        self.ledger.push(&agent);
        self.agents.push(agent);
    }
}

fn bury(agent: &mut Agent, cause: DeathCause) -> Result<(), PopulationError> {
    forage_agents::die(agent, cause)
        .map(|_record| ())
        .map_err(|source| PopulationError::Agent {
            agent_id: agent.id,
            source,
        })
}
