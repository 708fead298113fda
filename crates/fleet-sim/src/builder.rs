//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use fleet_core::{SimConfig, SimRng};
use fleet_dispatch::{DispatchConfig, DispatchController, Vehicle};
use fleet_spatial::RoadNetwork;

use crate::scenario::{RequestSource, place_fleet};
use crate::sim::SimStats;
use crate::{Sim, SimError, SimResult};

/// Seed offset of the fleet-placement stream.
const FLEET_STREAM: u64 = 1;

/// Fluent builder for [`Sim<Q>`].
///
/// # Required inputs
///
/// - [`SimConfig`] (total ticks, seed, tick duration)
/// - [`RoadNetwork`]
/// - `Q: RequestSource`, where new requests come from
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                    |
/// |--------------------|--------------------------------------------|
/// | `.dispatch(c)`     | `DispatchConfig::default()`                |
/// | `.vehicles(v)`     | none                                       |
/// | `.random_fleet(n)` | none; places `n` idle vehicles from `seed` |
///
/// `.vehicles` and `.random_fleet` are mutually exclusive.
///
/// # Example
///
/// ```rust,ignore
/// let rng = SimRng::new(config.seed).child(2);
/// let mut sim = SimBuilder::new(config, network, RequestGenerator::new(rng, 0.5)?)
///     .random_fleet(20)
///     .build()?;
/// sim.run(&mut LogObserver::new(10))?;
/// ```
pub struct SimBuilder<Q: RequestSource> {
    config:     SimConfig,
    network:    RoadNetwork,
    requests:   Q,
    dispatch:   DispatchConfig,
    vehicles:   Option<Vec<Vehicle>>,
    fleet_size: Option<usize>,
}

impl<Q: RequestSource> SimBuilder<Q> {
    pub fn new(config: SimConfig, network: RoadNetwork, requests: Q) -> Self {
        Self {
            config,
            network,
            requests,
            dispatch:   DispatchConfig::default(),
            vehicles:   None,
            fleet_size: None,
        }
    }

    /// Scoring and congestion-release policy for the dispatcher.
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Start with an explicit fleet.
    pub fn vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.vehicles = Some(vehicles);
        self
    }

    /// Start with `count` idle vehicles at random intersections.
    pub fn random_fleet(mut self, count: usize) -> Self {
        self.fleet_size = Some(count);
        self
    }

    /// Validate inputs, place the fleet, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<Q>> {
        let node_count = self.network.node_count();

        let vehicles = match (self.vehicles, self.fleet_size) {
            (Some(_), Some(_)) => {
                return Err(SimError::Config(
                    "use either an explicit fleet or a random fleet, not both".into(),
                ));
            }
            (Some(v), None) => v,
            (None, Some(n)) => {
                let mut rng = SimRng::new(self.config.seed).child(FLEET_STREAM);
                place_fleet(&mut rng, n, node_count)?
            }
            (None, None) => Vec::new(),
        };

        let mut seen = HashSet::with_capacity(vehicles.len());
        for v in &vehicles {
            if !seen.insert(v.car_id) {
                return Err(SimError::Config(format!("{} appears twice in the fleet", v.car_id)));
            }
            if v.intersection_id.index() >= node_count {
                return Err(SimError::Config(format!(
                    "{} starts at {}, outside 0..{node_count}",
                    v.car_id, v.intersection_id
                )));
            }
            if v.passenger_id.is_some() {
                return Err(SimError::Config(format!("{} must start without a passenger", v.car_id)));
            }
        }

        tracing::info!(
            vehicles      = vehicles.len(),
            intersections = node_count,
            ticks         = self.config.total_ticks,
            "simulation built"
        );

        Ok(Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            vehicles,
            controller: DispatchController::new(self.network, self.dispatch),
            requests:   self.requests,
            stats:      SimStats::default(),
        })
    }
}
