//! Simulation time.
//!
//! One `Tick` is one dispatch round: every vehicle moves at most one hop and
//! every request is matched at most once.  The dispatcher only ever sees
//! ticks.  Wall-clock seconds exist for the harness's progress lines and CSV
//! output:
//!
//!   unix_secs = start_unix_secs + tick * tick_duration_secs

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute dispatch-round counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// True on every `interval`-th tick, starting at tick 0.  An interval of
    /// 0 never matches.
    #[inline]
    pub fn is_every(self, interval: u64) -> bool {
        interval > 0 && self.0 % interval == 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The harness's current round plus its wall-clock mapping.
#[derive(Clone, Debug)]
pub struct SimClock {
    pub start_unix_secs:    i64,
    pub tick_duration_secs: u32,
    /// Advanced once per completed `on_turn`.
    pub current_tick:       Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self {
            start_unix_secs,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }

    /// Simulated seconds between tick 0 and `tick`.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> i64 {
        tick.0 as i64 * self.tick_duration_secs as i64
    }

    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + self.secs_at(tick)
    }
}

impl fmt::Display for SimClock {
    /// `T<tick> (+hh:mm)` measured from tick 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.secs_at(self.current_tick).max(0);
        write!(f, "{} (+{:02}:{:02})", self.current_tick, secs / 3_600, (secs % 3_600) / 60)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Harness configuration.  The dispatcher has its own `DispatchConfig`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Unix timestamp of tick 0.
    pub start_unix_secs: i64,

    /// Seconds per tick.  Reporting only.  Default: 60.
    pub tick_duration_secs: u32,

    pub total_ticks: u64,

    /// Master seed.  Same seed, same run.
    pub seed: u64,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// First tick that is not simulated.
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:       0,
            tick_duration_secs:    60,
            total_ticks:           100,
            seed:                  42,
            output_interval_ticks: 1,
        }
    }
}
