//! Configuration loading and typed config structures for the Forage simulation.
//!
//! The canonical configuration lives in `forage-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads the file, and [`SimulationConfig::validate`]
//! which rejects parameter combinations the model cannot run with.
//!
//! Carrying capacity and regrowth rate are configured in hours of maximum
//! ingestion for the configured body mass; [`SimulationConfig::environment_params`]
//! converts them to absolute resource units.

use std::path::Path;

use serde::Deserialize;

use forage_agents::{Bounds, OrganismConfig, Physiology, TraitRange, ingestion_for_mass};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV: &str = "FORAGE_SEED";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of range or inconsistent with another value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the rejected value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `forage-config.yaml`. Every field has a default
/// matching the reference parameterisation of the model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid extent, cell size, and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Landscape generation parameters.
    #[serde(default)]
    pub landscape: LandscapeConfig,

    /// Founder count and organism parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Resource capacity and regrowth.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Run length and end-of-run sampling.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Export destination.
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `FORAGE_SEED` overrides `world.seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if `FORAGE_SEED` is not an unsigned integer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides are
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_seed_override(std::env::var(SEED_ENV).ok().as_deref())
    }

    /// Replace the seed with `value` when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `value` is not an unsigned integer.
    pub fn apply_seed_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            self.world.seed = raw.trim().parse().map_err(|_err| ConfigError::Invalid {
                reason: format!("{SEED_ENV} must be an unsigned integer, got {raw:?}"),
            })?;
        }
        Ok(())
    }

    /// Check every value the model depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(invalid(format!(
                "grid dimensions must be at least 1x1, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if !self.world.cell_size.is_finite() || self.world.cell_size <= 0.0 {
            return Err(invalid(format!(
                "cell_size must be positive, got {}",
                self.world.cell_size
            )));
        }
        if !(0.0..=1.0).contains(&self.landscape.suitable_fraction) {
            return Err(invalid(format!(
                "suitable_fraction must lie in [0, 1], got {}",
                self.landscape.suitable_fraction
            )));
        }
        if !self.landscape.autocorrelation.is_finite() || self.landscape.autocorrelation < 0.0 {
            return Err(invalid(format!(
                "autocorrelation must be finite and non-negative, got {}",
                self.landscape.autocorrelation
            )));
        }
        if !self.environment.carrying_capacity_hours.is_finite()
            || self.environment.carrying_capacity_hours <= 0.0
        {
            return Err(invalid(format!(
                "carrying_capacity_hours must be positive, got {}",
                self.environment.carrying_capacity_hours
            )));
        }
        if !self.environment.regrowth_hours.is_finite() || self.environment.regrowth_hours < 0.0 {
            return Err(invalid(format!(
                "regrowth_hours must be non-negative, got {}",
                self.environment.regrowth_hours
            )));
        }
        self.organism()
            .validate()
            .map_err(|e| invalid(e.to_string()))
    }

    /// Organism parameters for agent construction and reproduction.
    pub const fn organism(&self) -> OrganismConfig {
        OrganismConfig {
            mass: self.population.mass,
            mutation_rate: self.population.mutation_rate,
            step_mean_range: self.population.step_mean_range,
            diversion_range: self.population.diversion_range,
        }
    }

    /// Energy constants for the configured mass and cell size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-positive mass or cell size.
    pub fn physiology(&self) -> Result<Physiology, ConfigError> {
        Physiology::from_mass(self.population.mass, self.world.cell_size)
            .map_err(|e| invalid(e.to_string()))
    }

    /// Carrying capacity and regrowth rate in absolute resource units.
    pub fn environment_params(&self) -> EnvironmentParams {
        let ingestion = ingestion_for_mass(self.population.mass);
        EnvironmentParams {
            carrying_capacity: self.environment.carrying_capacity_hours * ingestion,
            regrowth_rate: self.environment.regrowth_hours * ingestion,
        }
    }

    /// Walkable extent of the configured grid.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_grid(self.world.width, self.world.height)
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

/// Absolute resource parameters derived from [`EnvironmentConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentParams {
    /// Maximum level of a suitable cell.
    pub carrying_capacity: f64,
    /// Logistic regrowth constant.
    pub regrowth_rate: f64,
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid width in cells (the reflecting axis).
    #[serde(default = "default_extent")]
    pub width: u32,

    /// Grid height in cells (the periodic axis).
    #[serde(default = "default_extent")]
    pub height: u32,

    /// Side length of one cell in kilometres; scales transport cost.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            width: default_extent(),
            height: default_extent(),
            cell_size: default_cell_size(),
        }
    }
}

/// Landscape generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandscapeConfig {
    /// Spatial autocorrelation of the habitat field (0 = rough).
    #[serde(default = "default_autocorrelation")]
    pub autocorrelation: f64,

    /// Share of cells that carry resources.
    #[serde(default = "default_suitable_fraction")]
    pub suitable_fraction: f64,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            autocorrelation: default_autocorrelation(),
            suitable_fraction: default_suitable_fraction(),
        }
    }
}

/// Founder population and organism parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of founders placed at tick 0.
    #[serde(default = "default_initial_agents")]
    pub initial_agents: u32,

    /// Body mass in kilograms.
    #[serde(default = "default_mass")]
    pub mass: f64,

    /// Per-trait mutation probability at birth.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,

    /// Range of the step-length mean.
    #[serde(default = "default_step_mean_range")]
    pub step_mean_range: TraitRange,

    /// Range of the turning-angle half-width.
    #[serde(default = "default_diversion_range")]
    pub diversion_range: TraitRange,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_agents: default_initial_agents(),
            mass: default_mass(),
            mutation_rate: default_mutation_rate(),
            step_mean_range: default_step_mean_range(),
            diversion_range: default_diversion_range(),
        }
    }
}

/// Resource parameters in hours of maximum ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    /// Carrying capacity of a suitable cell.
    #[serde(default = "default_carrying_capacity_hours")]
    pub carrying_capacity_hours: f64,

    /// Logistic regrowth constant.
    #[serde(default = "default_regrowth_hours")]
    pub regrowth_hours: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            carrying_capacity_hours: default_carrying_capacity_hours(),
            regrowth_hours: default_regrowth_hours(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of ticks to run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Number of agents sampled for the end-of-run trait distribution.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            sample_size: default_sample_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Export destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON-lines file written by the engine.
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_extent() -> u32 {
    10
}

const fn default_cell_size() -> f64 {
    0.25
}

const fn default_autocorrelation() -> f64 {
    0.5
}

const fn default_suitable_fraction() -> f64 {
    0.5
}

const fn default_initial_agents() -> u32 {
    10_000
}

fn default_mass() -> f64 {
    OrganismConfig::default().mass
}

fn default_mutation_rate() -> f64 {
    OrganismConfig::default().mutation_rate
}

fn default_step_mean_range() -> TraitRange {
    OrganismConfig::default().step_mean_range
}

fn default_diversion_range() -> TraitRange {
    OrganismConfig::default().diversion_range
}

const fn default_carrying_capacity_hours() -> f64 {
    20.0
}

const fn default_regrowth_hours() -> f64 {
    15.0
}

const fn default_max_ticks() -> u64 {
    30_000
}

const fn default_sample_size() -> usize {
    100
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_output_path() -> String {
    String::from("forage-output.jsonl")
}
