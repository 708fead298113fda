//! Where ride requests and vehicles come from.
//!
//! The dispatcher never invents demand; each tick the harness asks a
//! [`RequestSource`] for that tick's new requests.  Two sources ship with the
//! crate:
//!
//! | Source               | Behavior                                          |
//! |----------------------|---------------------------------------------------|
//! | [`RequestGenerator`] | Random pickups/drop-offs at a mean rate per tick  |
//! | [`RequestSchedule`]  | Fixed timetable, e.g. loaded from CSV             |

use std::collections::BTreeMap;

use fleet_core::{CarId, NodeId, PassengerId, SimRng, Tick};
use fleet_dispatch::{Request, Vehicle};

use crate::{SimError, SimResult};

/// Supplies the requests issued at each tick.
pub trait RequestSource {
    /// New requests for `tick`.  `node_count` is the size of the network the
    /// requests must fit in.
    fn requests_for(&mut self, tick: Tick, node_count: usize) -> Vec<Request>;
}

/// A source that never issues requests.
pub struct NoRequests;

impl RequestSource for NoRequests {
    fn requests_for(&mut self, _tick: Tick, _node_count: usize) -> Vec<Request> {
        Vec::new()
    }
}

// ── RequestGenerator ──────────────────────────────────────────────────────────

/// Random request generator.
///
/// Each tick issues `floor(rate)` requests plus one more with probability
/// `fract(rate)`.  Pickup and drop-off are drawn uniformly and differ
/// whenever the network has more than one intersection.  Passenger ids are
/// sequential from 0.
pub struct RequestGenerator {
    rng:            SimRng,
    rate:           f64,
    next_passenger: u32,
}

impl RequestGenerator {
    pub fn new(rng: SimRng, rate: f64) -> SimResult<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(SimError::Config(format!(
                "request rate must be a non-negative number, got {rate}"
            )));
        }
        Ok(Self { rng, rate, next_passenger: 0 })
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u32 {
        self.next_passenger
    }
}

impl RequestSource for RequestGenerator {
    fn requests_for(&mut self, _tick: Tick, node_count: usize) -> Vec<Request> {
        if node_count == 0 {
            return Vec::new();
        }
        let whole = self.rate.trunc() as usize;
        let extra = usize::from(self.rng.gen_bool(self.rate.fract()));

        (0..whole + extra)
            .map(|_| {
                let src = self.rng.gen_range(0..node_count);
                let mut dst = self.rng.gen_range(0..node_count);
                if node_count > 1 && dst == src {
                    dst = (dst + 1 + self.rng.gen_range(0..node_count - 1)) % node_count;
                }
                let passenger = PassengerId(self.next_passenger);
                self.next_passenger += 1;
                Request::new(passenger, NodeId(src as u32), NodeId(dst as u32))
            })
            .collect()
    }
}

// ── RequestSchedule ───────────────────────────────────────────────────────────

/// Fixed request timetable keyed by issue tick.
#[derive(Debug, Clone, Default)]
pub struct RequestSchedule {
    by_tick: BTreeMap<Tick, Vec<Request>>,
}

impl RequestSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, request: Request) {
        self.by_tick.entry(tick).or_default().push(request);
    }

    /// Total requests not yet handed out.
    pub fn len(&self) -> usize {
        self.by_tick.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }

    /// The last tick with a scheduled request.
    pub fn last_tick(&self) -> Option<Tick> {
        self.by_tick.keys().next_back().copied()
    }
}

impl RequestSource for RequestSchedule {
    fn requests_for(&mut self, tick: Tick, _node_count: usize) -> Vec<Request> {
        self.by_tick.remove(&tick).unwrap_or_default()
    }
}

// ── Fleet placement ───────────────────────────────────────────────────────────

/// Place `count` idle vehicles (`CarId(0)..`) at uniformly random
/// intersections.
pub fn place_fleet(rng: &mut SimRng, count: usize, node_count: usize) -> SimResult<Vec<Vehicle>> {
    if count > 0 && node_count == 0 {
        return Err(SimError::Config(format!(
            "cannot place {count} vehicles on an empty road network"
        )));
    }
    let fleet = (0..count)
        .map(|i| {
            let at = rng.gen_range(0..node_count);
            Vehicle::idle(CarId(i as u32), NodeId(at as u32))
        })
        .collect();
    Ok(fleet)
}
