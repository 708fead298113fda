//! The `Sim` struct and its tick loop.

use fleet_core::{CarId, SimClock, SimConfig, Tick};
use fleet_dispatch::{DispatchController, TurnSummary, Vehicle};

use crate::scenario::RequestSource;
use crate::{SimError, SimObserver, SimResult};

/// Running totals across all ticks simulated so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks:              u64,
    pub requests_issued:    usize,
    pub dropped_off:        usize,
    pub direct_pickups:     usize,
    pub instant_trips:      usize,
    pub approaches_started: usize,
}

impl SimStats {
    fn record(&mut self, issued: usize, s: &TurnSummary) {
        self.ticks              += 1;
        self.requests_issued    += issued;
        self.dropped_off        += s.dropped_off;
        self.direct_pickups     += s.direct_pickups;
        self.instant_trips      += s.instant_trips;
        self.approaches_started += s.approaches_started;
    }
}

/// Drives a [`DispatchController`] over a fleet, one tick at a time.
///
/// Each tick:
///
/// 1. Ask the [`RequestSource`] for this tick's new requests.
/// 2. Call [`DispatchController::on_turn`] with the live fleet.
/// 3. Report to the observer; snapshot the fleet every
///    `config.output_interval_ticks` ticks.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<Q: RequestSource> {
    pub config: SimConfig,

    /// Simulation clock; tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// The live fleet, passed to the dispatcher every tick.
    pub vehicles: Vec<Vehicle>,

    pub controller: DispatchController,

    pub requests: Q,

    pub stats: SimStats,
}

impl<Q: RequestSource> Sim<Q> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Simulate a single tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TurnSummary> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let node_count = self.controller.network().node_count();
        let new_requests = self.requests.requests_for(now, node_count);
        let summary = self.controller.on_turn(&mut self.vehicles, &new_requests)?;
        self.stats.record(new_requests.len(), &summary);

        observer.on_tick_end(now, &summary);
        if now.is_every(self.config.output_interval_ticks) {
            observer.on_snapshot(now, &self.vehicles);
        }

        self.clock.advance();
        Ok(summary)
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Fleet changes between ticks ───────────────────────────────────────

    /// Put a vehicle on the grid.  It is dispatched from the next tick on.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> SimResult<()> {
        if self.vehicles.iter().any(|v| v.car_id == vehicle.car_id) {
            return Err(SimError::Config(format!("{} is already on the grid", vehicle.car_id)));
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Take a vehicle off the grid.  A passenger on board is lost with it;
    /// the dispatcher forgets the vehicle on the next tick.
    pub fn remove_vehicle(&mut self, car: CarId) -> Option<Vehicle> {
        let pos = self.vehicles.iter().position(|v| v.car_id == car)?;
        let vehicle = self.vehicles.remove(pos);
        tracing::debug!(car = car.0, "vehicle removed from the grid");
        Some(vehicle)
    }
}
