//! Capacity grid construction from configuration.

use rand::Rng;
use tracing::info;

use forage_core::config::SimulationConfig;
use forage_world::{CapacityGrid, LandscapeGenerator, WorldError, classify};

/// Generate a field with `generator` and classify it into habitat.
pub fn build_capacity_grid(
    config: &SimulationConfig,
    generator: &impl LandscapeGenerator,
    rng: &mut impl Rng,
) -> Result<CapacityGrid, WorldError> {
    let field = generator.generate(
        config.world.width,
        config.world.height,
        config.landscape.autocorrelation,
        rng,
    )?;
    let params = config.environment_params();
    let grid = classify(
        &field,
        config.landscape.suitable_fraction,
        params.carrying_capacity,
    )?;
    info!(
        width = grid.width(),
        height = grid.height(),
        autocorrelation = config.landscape.autocorrelation,
        suitable_fraction = config.landscape.suitable_fraction,
        habitat_cells = grid.suitable_count(),
        carrying_capacity = params.carrying_capacity,
        "Landscape generated"
    );
    Ok(grid)
}
