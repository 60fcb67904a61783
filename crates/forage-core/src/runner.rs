//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`Population::tick`] for a fixed number of
//! ticks, notifies the observer and the export sink after each one, and
//! hands the end-of-run trait sample to the sink. Extinction is logged when
//! it first happens; the loop keeps running so every run produces the same
//! number of tick records.
//!
//! [`Population::tick`]: crate::population::Population::tick

use rand::Rng;
use tracing::{info, warn};

use crate::config::SimulationBoundsConfig;
use crate::export::{ExportError, ExportSink};
use crate::observer::TickObserver;
use crate::population::{Population, PopulationError};
use crate::stats::{TickStats, TraitSample};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: PopulationError,
    },

    /// The export sink failed.
    #[error("export error: {source}")]
    Export {
        /// The underlying export error.
        #[from]
        source: ExportError,
    },
}

/// Result of the simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Statistics of the last tick, if any tick ran.
    pub final_stats: Option<TickStats>,
    /// First tick after which no agent was alive.
    pub extinct_at: Option<u64>,
    /// End-of-run trait sample.
    pub sample: Vec<TraitSample>,
}

/// Run `bounds.max_ticks` ticks and sample `bounds.sample_size` agents at
/// the end.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick or the export sink fails.
pub fn run_simulation(
    population: &mut Population,
    rng: &mut impl Rng,
    bounds: &SimulationBoundsConfig,
    observer: &mut dyn TickObserver,
    sink: &mut dyn ExportSink,
) -> Result<SimulationResult, RunnerError> {
    let mut final_stats: Option<TickStats> = None;
    let mut extinct_at: Option<u64> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        sample_size = bounds.sample_size,
        founders = population.len(),
        "Simulation starting"
    );

    while total_ticks < bounds.max_ticks {
        let stats = population.tick(rng)?;
        total_ticks = total_ticks.saturating_add(1);

        observer.on_tick(&stats, population);
        sink.record_tick(&stats)?;

        if stats.population == 0 && extinct_at.is_none() {
            warn!(tick = stats.tick, "All agents dead -- extinction");
            extinct_at = Some(stats.tick);
        }

        final_stats = Some(stats);
    }

    let sample = population.sample(rng, bounds.sample_size);
    sink.record_sample(&sample)?;
    sink.finish()?;

    Ok(SimulationResult {
        total_ticks,
        final_stats,
        extinct_at,
        sample,
    })
}

/// Log the end-of-run summary.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        extinct_at = ?result.extinct_at,
        sampled = result.sample.len(),
        "Simulation ended"
    );

    if let Some(ref stats) = result.final_stats {
        info!(
            tick = stats.tick,
            population = stats.population,
            mean_resources = stats.mean_resources,
            mean_step = ?stats.mean_step,
            mean_diversion = ?stats.mean_diversion,
            mean_x = ?stats.mean_x,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_agents::random::seeded;
    use forage_world::CapacityGrid;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::export::RecordingSink;
    use crate::observer::NoOpObserver;

    struct CountingObserver {
        seen: Vec<u64>,
    }

    impl TickObserver for CountingObserver {
        fn on_tick(&mut self, stats: &TickStats, population: &Population) {
            assert_eq!(stats.population, population.len());
            self.seen.push(stats.tick);
        }
    }

    fn population(agents: u32, capacity: f64) -> Population {
        let mut config = SimulationConfig::default();
        config.world.width = 4;
        config.world.height = 4;
        config.population.initial_agents = agents;
        let grid = CapacityGrid::uniform(4, 4, capacity).unwrap();
        Population::new(&config, grid, &mut seeded(1)).unwrap()
    }

    #[test]
    fn bounded_by_max_ticks() {
        let mut pop = population(20, 50.0);
        let bounds = SimulationBoundsConfig {
            max_ticks: 5,
            sample_size: 3,
        };
        let mut sink = RecordingSink::new();
        let result = run_simulation(
            &mut pop,
            &mut seeded(2),
            &bounds,
            &mut NoOpObserver,
            &mut sink,
        )
        .unwrap();
        assert_eq!(result.total_ticks, 5);
        assert_eq!(sink.ticks.len(), 5);
        assert_eq!(result.final_stats.map(|s| s.tick), Some(5));
        assert!(sink.sample.len() <= 3);
        assert_eq!(sink.sample, result.sample);
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut pop = population(10, 50.0);
        let bounds = SimulationBoundsConfig {
            max_ticks: 4,
            sample_size: 10,
        };
        let mut observer = CountingObserver { seen: Vec::new() };
        run_simulation(
            &mut pop,
            &mut seeded(3),
            &bounds,
            &mut observer,
            &mut RecordingSink::new(),
        )
        .unwrap();
        assert_eq!(observer.seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn extinction_does_not_stop_the_loop() {
        let mut pop = population(0, 50.0);
        let bounds = SimulationBoundsConfig {
            max_ticks: 3,
            sample_size: 10,
        };
        let mut sink = RecordingSink::new();
        let result = run_simulation(
            &mut pop,
            &mut seeded(4),
            &bounds,
            &mut NoOpObserver,
            &mut sink,
        )
        .unwrap();
        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.extinct_at, Some(1));
        assert_eq!(sink.ticks.len(), 3);
        assert!(sink.ticks.iter().all(|s| s.mean_step.is_none()));
        assert!(result.sample.is_empty());
    }

    #[test]
    fn zero_ticks_still_samples() {
        let mut pop = population(5, 50.0);
        let bounds = SimulationBoundsConfig {
            max_ticks: 0,
            sample_size: 10,
        };
        let result = run_simulation(
            &mut pop,
            &mut seeded(5),
            &bounds,
            &mut NoOpObserver,
            &mut RecordingSink::new(),
        )
        .unwrap();
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_stats.is_none());
        assert_eq!(result.sample.len(), 5);
        log_simulation_end(&result);
    }
}
