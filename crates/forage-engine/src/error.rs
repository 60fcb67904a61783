//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: forage_core::config::ConfigError,
    },

    /// Landscape generation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: forage_world::WorldError,
    },

    /// Founder placement failed.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: forage_core::population::PopulationError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: forage_core::runner::RunnerError,
    },

    /// The output file could not be created.
    #[error("output error for {path}: {source}")]
    Output {
        /// Path that could not be opened.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
