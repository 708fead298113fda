//! Simulation observer trait for progress reporting and data collection.

use fleet_core::Tick;
use fleet_dispatch::{TurnSummary, Vehicle};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the dispatcher has run for `tick`.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TurnSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with the fleet as the dispatcher left it.
    fn on_snapshot(&mut self, _tick: Tick, _vehicles: &[Vehicle]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs a one-line tick summary through `tracing` every `interval` ticks.
pub struct LogObserver {
    interval: u64,
}

impl LogObserver {
    pub fn new(interval: u64) -> Self {
        Self { interval: interval.max(1) }
    }
}

impl SimObserver for LogObserver {
    fn on_tick_end(&mut self, tick: Tick, s: &TurnSummary) {
        if !tick.is_every(self.interval) {
            return;
        }
        tracing::info!(
            %tick,
            advanced    = s.advanced,
            dropped_off = s.dropped_off,
            pickups     = s.direct_pickups,
            approaches  = s.approaches_started,
            pending     = s.pending,
            "tick"
        );
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        tracing::info!(%final_tick, "simulation finished");
    }
}

/// Forward every callback to two observers in turn.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TurnSummary) {
        self.0.on_tick_end(tick, summary);
        self.1.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, vehicles: &[Vehicle]) {
        self.0.on_snapshot(tick, vehicles);
        self.1.on_snapshot(tick, vehicles);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.0.on_sim_end(final_tick);
        self.1.on_sim_end(final_tick);
    }
}

/// An absent observer does nothing.
impl<O: SimObserver> SimObserver for Option<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        if let Some(o) = self {
            o.on_tick_start(tick);
        }
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TurnSummary) {
        if let Some(o) = self {
            o.on_tick_end(tick, summary);
        }
    }

    fn on_snapshot(&mut self, tick: Tick, vehicles: &[Vehicle]) {
        if let Some(o) = self {
            o.on_snapshot(tick, vehicles);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        if let Some(o) = self {
            o.on_sim_end(final_tick);
        }
    }
}
