//! JSON-lines export sink.
//!
//! Writes one JSON object per line: a `tick` record per completed tick and a
//! single `sample` record at the end of the run. A tick record carries the
//! six aggregates as an array in export order, followed by the census.

use std::io::Write;

use serde::Serialize;

use forage_core::export::{ExportError, ExportSink, aggregates};
use forage_core::stats::{Census, TickStats, TraitSample};

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record<'a> {
    Tick {
        tick: u64,
        aggregates: [Option<f64>; 6],
        census: Census,
    },
    Sample {
        samples: &'a [TraitSample],
    },
}

/// Sink that serialises records to any writer, one per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of lines written so far.
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &Record<'_>) -> Result<(), ExportError> {
        serde_json::to_writer(&mut self.writer, record).map_err(|e| ExportError::Serialize {
            reason: e.to_string(),
        })?;
        self.writer.write_all(b"\n")?;
        self.lines = self.lines.saturating_add(1);
        Ok(())
    }
}

impl<W: Write> ExportSink for JsonLinesSink<W> {
    fn record_tick(&mut self, stats: &TickStats) -> Result<(), ExportError> {
        self.write_record(&Record::Tick {
            tick: stats.tick,
            aggregates: aggregates(stats),
            census: stats.census,
        })
    }

    fn record_sample(&mut self, samples: &[TraitSample]) -> Result<(), ExportError> {
        self.write_record(&Record::Sample { samples })
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use forage_core::stats::Census;
    use serde_json::Value;

    use super::*;

    fn stats(tick: u64) -> TickStats {
        TickStats {
            tick,
            population: 3,
            mean_resources: 4.5,
            mean_step: Some(2.0),
            mean_diversion: Some(0.5),
            mean_regrowth: None,
            mean_x: Some(1.25),
            census: Census::default(),
        }
    }

    #[test]
    fn writes_one_line_per_record() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.record_tick(&stats(1)).unwrap();
        sink.record_tick(&stats(2)).unwrap();
        sink.record_sample(&[TraitSample {
            step_mean: 1.0,
            diversion: 0.1,
            x: 2.0,
        }])
        .unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.lines(), 3);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["record"], "tick");
        assert_eq!(lines[1]["tick"], 2);
        let values = lines[1]["aggregates"].as_array().unwrap();
        assert_eq!(values.len(), 6);
        assert_eq!(values[0], 3.0);
        assert_eq!(values[1], 4.5);
        assert_eq!(values[2], 2.0);
        assert_eq!(values[3], 0.5);
        assert!(values[4].is_null());
        assert_eq!(values[5], 1.25);
        assert_eq!(lines[1]["census"]["births"], 0);
        assert_eq!(lines[2]["record"], "sample");
        assert_eq!(lines[2]["samples"][0]["x"], 2.0);
    }
}
