//! Export sinks for per-tick aggregates and the end-of-run trait sample.
//!
//! Per tick a sink receives the six aggregates in a fixed order: population,
//! mean resources, mean step, mean diversion, mean regrowth, mean x. At the
//! end of the run it receives the sampled `(step_mean, diversion, x)`
//! triples. File formats live in the engine; [`RecordingSink`] keeps
//! everything in memory.

use crate::stats::{TickStats, TraitSample};

/// Errors raised by an export sink.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing to the underlying destination failed.
    #[error("export I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A record could not be serialised.
    #[error("export serialisation error: {reason}")]
    Serialize {
        /// Description of the failure.
        reason: String,
    },
}

/// The six aggregates of one tick, in export order.
pub const fn aggregates(stats: &TickStats) -> [Option<f64>; 6] {
    [
        Some(usize_to_f64(stats.population)),
        Some(stats.mean_resources),
        stats.mean_step,
        stats.mean_diversion,
        stats.mean_regrowth,
        stats.mean_x,
    ]
}

#[allow(clippy::cast_precision_loss)]
const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Destination for simulation output.
pub trait ExportSink {
    /// Record the statistics of one tick.
    fn record_tick(&mut self, stats: &TickStats) -> Result<(), ExportError>;

    /// Record the end-of-run trait sample.
    fn record_sample(&mut self, samples: &[TraitSample]) -> Result<(), ExportError>;

    /// Flush buffered output. The default does nothing.
    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Tick records in arrival order.
    pub ticks: Vec<TickStats>,
    /// The last trait sample received.
    pub sample: Vec<TraitSample>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub const fn new() -> Self {
        Self {
            ticks: Vec::new(),
            sample: Vec::new(),
        }
    }
}

impl ExportSink for RecordingSink {
    fn record_tick(&mut self, stats: &TickStats) -> Result<(), ExportError> {
        self.ticks.push(stats.clone());
        Ok(())
    }

    fn record_sample(&mut self, samples: &[TraitSample]) -> Result<(), ExportError> {
        self.sample = samples.to_vec();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::stats::Census;

    fn stats() -> TickStats {
        TickStats {
            tick: 1,
            population: 4,
            mean_resources: 2.5,
            mean_step: Some(1.0),
            mean_diversion: None,
            mean_regrowth: Some(0.5),
            mean_x: Some(3.0),
            census: Census::default(),
        }
    }

    #[test]
    fn aggregates_follow_export_order() {
        let values = aggregates(&stats());
        assert_eq!(values.len(), 6);
        assert!((values[0].unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((values[1].unwrap() - 2.5).abs() < f64::EPSILON);
        assert!(values[3].is_none());
        assert!((values[5].unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recording_sink_keeps_records() {
        let mut sink = RecordingSink::new();
        sink.record_tick(&stats()).unwrap();
        sink.record_sample(&[TraitSample {
            step_mean: 1.0,
            diversion: 0.5,
            x: 2.0,
        }])
        .unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.ticks.len(), 1);
        assert_eq!(sink.sample.len(), 1);
    }
}
