//! Read-only hook invoked after every tick.
//!
//! Visualisers and progress reporters implement [`TickObserver`]. The run
//! loop works with none attached ([`NoOpObserver`]).

use tracing::info;

use crate::population::Population;
use crate::stats::TickStats;

/// Callback invoked after each tick completes.
pub trait TickObserver {
    /// Called with the statistics of the tick that just ran and read-only
    /// access to the population.
    fn on_tick(&mut self, stats: &TickStats, population: &Population);
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&mut self, _stats: &TickStats, _population: &Population) {}
}

/// Observer that logs a progress line every `interval` ticks.
#[derive(Debug, Clone, Copy)]
pub struct ProgressObserver {
    interval: u64,
}

impl ProgressObserver {
    /// Log every `interval` ticks. An interval of 0 is treated as 1.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval: if interval == 0 { 1 } else { interval },
        }
    }

    /// Whether tick `tick` falls on the logging interval.
    pub const fn is_due(self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.interval), Some(0))
    }
}

impl TickObserver for ProgressObserver {
    fn on_tick(&mut self, stats: &TickStats, population: &Population) {
        if self.is_due(stats.tick) {
            info!(
                tick = stats.tick,
                population = stats.population,
                mean_resources = stats.mean_resources,
                mean_step = ?stats.mean_step,
                mean_diversion = ?stats.mean_diversion,
                mean_x = ?stats.mean_x,
                habitat_cells = population.environment().capacity().suitable_count(),
                "Progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_logs_every_tick() {
        let observer = ProgressObserver::new(0);
        assert!(observer.is_due(1));
        assert!(observer.is_due(2));
    }

    #[test]
    fn interval_selects_multiples() {
        let observer = ProgressObserver::new(100);
        assert!(!observer.is_due(1));
        assert!(observer.is_due(100));
        assert!(observer.is_due(300));
    }

    #[test]
    fn due_check_is_usable_in_const_context() {
        const EVERY_TEN: ProgressObserver = ProgressObserver::new(10);
        const DUE: bool = EVERY_TEN.is_due(20);
        const NOT_DUE: bool = EVERY_TEN.is_due(21);
        assert_eq!((DUE, NOT_DUE), (true, false));
    }
}
