//! Engine binary for the Forage simulation.
//!
//! Runs one simulation end to end and writes its statistics as JSON lines.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `forage-config.yaml` (or `FORAGE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Seed the random number generator
//! 4. Generate the landscape and classify habitat
//! 5. Place the founders
//! 6. Run the simulation loop, exporting every tick
//! 7. Log the result

mod error;
mod json_sink;
mod landscape;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use forage_agents::random;
use forage_core::config::SimulationConfig;
use forage_core::observer::ProgressObserver;
use forage_core::population::Population;
use forage_core::runner;
use forage_world::MidpointDisplacement;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::json_sink::JsonLinesSink;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "FORAGE_CONFIG";

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "forage-config.yaml";

/// Ticks between progress log lines.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!("forage-engine starting");
    info!(
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        initial_agents = config.population.initial_agents,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Seed the generator.
    let mut rng = random::seeded(config.world.seed);

    // 4. Generate the landscape.
    let grid = landscape::build_capacity_grid(&config, &MidpointDisplacement::new(), &mut rng)
        .map_err(EngineError::from)?;

    // 5. Place the founders.
    let mut population = Population::new(&config, grid, &mut rng).map_err(EngineError::from)?;

    // 6. Run.
    let output = &config.output.path;
    let file = File::create(output).map_err(|source| EngineError::Output {
        path: output.clone(),
        source,
    })?;
    let mut sink = JsonLinesSink::new(BufWriter::new(file));
    let mut observer = ProgressObserver::new(PROGRESS_INTERVAL);

    let result = runner::run_simulation(
        &mut population,
        &mut rng,
        &config.simulation,
        &mut observer,
        &mut sink,
    )
    .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_simulation_end(&result);
    info!(
        output = output.as_str(),
        lines = sink.lines(),
        "forage-engine shutdown complete"
    );

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the simulation configuration.
///
/// Uses the file named by `FORAGE_CONFIG`, falling back to
/// `forage-config.yaml` in the working directory, and to defaults when
/// neither exists.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = std::env::var(CONFIG_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = if config_path.exists() {
        SimulationConfig::from_file(&config_path)?
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides()?;
        config
    };
    config.validate()?;
    Ok(config)
}
