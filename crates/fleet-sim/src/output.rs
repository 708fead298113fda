//! CSV trajectory output.
//!
//! Creates two files in the configured output directory:
//! - `vehicle_snapshots.csv`: one row per vehicle per snapshot tick
//! - `tick_summaries.csv`: one row per tick

use std::fs::File;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use fleet_core::{SimClock, SimConfig, Tick};
use fleet_dispatch::{TurnSummary, Vehicle};

use crate::{SimError, SimObserver, SimResult};

// ── Row types ─────────────────────────────────────────────────────────────────

/// One vehicle's position at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleSnapshotRow {
    pub car_id:          u32,
    pub tick:            u64,
    pub intersection_id: u32,
    /// Empty when the vehicle is idle.
    pub passenger_id:    Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSummaryRow {
    pub tick:               u64,
    pub unix_time_secs:     i64,
    pub advanced:           usize,
    pub dropped_off:        usize,
    pub direct_pickups:     usize,
    pub instant_trips:      usize,
    pub approaches_started: usize,
    pub pending:            usize,
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// A [`SimObserver`] that writes vehicle snapshots and tick summaries to CSV.
///
/// Errors are stored internally because `SimObserver` methods have no return
/// value.  After `sim.run()` returns, check with [`take_error`](Self::take_error).
pub struct CsvTrajectoryWriter {
    snapshots:          Writer<File>,
    summaries:          Writer<File>,
    clock:              SimClock,
    finished:           bool,
    last_error:         Option<SimError>,
}

impl CsvTrajectoryWriter {
    /// Create the two CSV files in `dir`.  Headers are written with the
    /// first row.
    pub fn new(dir: &Path, config: &SimConfig) -> SimResult<Self> {
        Ok(Self {
            snapshots:          Writer::from_path(dir.join("vehicle_snapshots.csv"))?,
            summaries:          Writer::from_path(dir.join("tick_summaries.csv"))?,
            clock:              config.make_clock(),
            finished:           false,
            last_error:         None,
        })
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush both files.  Idempotent.
    pub fn finish(&mut self) -> SimResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "trajectory output failed");
                self.last_error = Some(e);
            }
        }
    }

    fn write_snapshot(&mut self, tick: Tick, vehicles: &[Vehicle]) -> SimResult<()> {
        for v in vehicles {
            self.snapshots.serialize(VehicleSnapshotRow {
                car_id:          v.car_id.0,
                tick:            tick.0,
                intersection_id: v.intersection_id.0,
                passenger_id:    v.passenger_id.map(|p| p.0),
            })?;
        }
        Ok(())
    }

    fn write_summary(&mut self, tick: Tick, s: &TurnSummary) -> SimResult<()> {
        self.summaries.serialize(TickSummaryRow {
            tick:               tick.0,
            unix_time_secs:     self.clock.unix_secs_at(tick),
            advanced:           s.advanced,
            dropped_off:        s.dropped_off,
            direct_pickups:     s.direct_pickups,
            instant_trips:      s.instant_trips,
            approaches_started: s.approaches_started,
            pending:            s.pending,
        })?;
        Ok(())
    }
}

impl SimObserver for CsvTrajectoryWriter {
    fn on_tick_end(&mut self, tick: Tick, summary: &TurnSummary) {
        let result = self.write_summary(tick, summary);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, vehicles: &[Vehicle]) {
        let result = self.write_snapshot(tick, vehicles);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
