//! Population dynamics and the run loop for the Forage simulation.
//!
//! This crate owns the per-tick protocol that moves, feeds, breeds, and
//! buries agents on the shared resource landscape, the statistics recorded
//! after every tick, and the synchronous loop that drives a run.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `forage-config.yaml` into
//!   strongly-typed structs.
//! - [`export`] -- [`ExportSink`] trait and the in-memory [`RecordingSink`].
//! - [`ledger`] -- Parallel trait lists kept in lockstep with the live set.
//! - [`observer`] -- [`TickObserver`] trait, [`NoOpObserver`], and a
//!   progress logger.
//! - [`population`] -- [`Population`] and the per-tick protocol.
//! - [`runner`] -- [`run_simulation`] and end-of-run logging.
//! - [`stats`] -- [`TickStats`] and [`TraitSample`].
//!
//! [`ExportSink`]: export::ExportSink
//! [`RecordingSink`]: export::RecordingSink
//! [`TickObserver`]: observer::TickObserver
//! [`NoOpObserver`]: observer::NoOpObserver
//! [`Population`]: population::Population
//! [`run_simulation`]: runner::run_simulation
//! [`TickStats`]: stats::TickStats
//! [`TraitSample`]: stats::TraitSample

pub mod config;
pub mod export;
pub mod ledger;
pub mod observer;
pub mod population;
pub mod runner;
pub mod stats;
