//! The `DispatchController` and its tick algorithm.

use std::collections::VecDeque;

use fleet_core::{CarId, NodeId, PassengerId};
use fleet_spatial::{DijkstraScratch, IntersectionInfo, RoadInfo, RoadNetwork, RouteCursor};

use crate::scorer::{AssignmentScorer, Candidate, ScoringPolicy, rank_candidates};
use crate::{
    ArrivalAccounting, DispatchConfig, DispatchError, DispatchResult, Request, RequestBacklog,
    Subject, Vehicle,
};

#[cfg(feature = "fx-hash")]
type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type FastMap<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "fx-hash")]
type FastSet<K> = rustc_hash::FxHashSet<K>;
#[cfg(not(feature = "fx-hash"))]
type FastSet<K> = std::collections::HashSet<K>;

/// Idle vehicles by intersection; values are positions in the vehicle slice,
/// lowest first.
type Buckets = FastMap<NodeId, VecDeque<usize>>;

// ── Per-tick report ───────────────────────────────────────────────────────────

/// Counters describing one [`DispatchController::on_turn`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// Vehicles moved one hop (in transit, approaching, or just matched).
    pub advanced:           usize,
    /// Passengers delivered at their destination.
    pub dropped_off:        usize,
    /// Requests served by a vehicle already at the pickup.
    pub direct_pickups:     usize,
    /// Requests whose pickup equals their destination, completed on the spot.
    pub instant_trips:      usize,
    /// Vehicles newly sent toward a pickup by greedy matching.
    pub approaches_started: usize,
    /// Backlog length after the tick.
    pub pending:            usize,
}

/// An idle vehicle driving toward a waiting passenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approach {
    pub passenger_id: PassengerId,
    pub route:        RouteCursor,
}

// ── DispatchController ────────────────────────────────────────────────────────

/// Owns the road network, the request backlog and every vehicle's in-flight
/// route, and runs one dispatch round per [`on_turn`](Self::on_turn).
///
/// # Type parameter
///
/// `S` ranks greedy candidates.  The default, [`ScoringPolicy`], is chosen
/// at runtime from [`DispatchConfig::scoring`]; any other
/// [`AssignmentScorer`] can be supplied through [`with_scorer`](Self::with_scorer).
pub struct DispatchController<S: AssignmentScorer = ScoringPolicy> {
    network: RoadNetwork,
    config:  DispatchConfig,
    scorer:  S,

    backlog: RequestBacklog,

    /// `CarId → trip route` for vehicles carrying a passenger.
    active_routes: FastMap<CarId, RouteCursor>,

    /// `CarId → route to a pickup` for idle vehicles committed by greedy
    /// matching on an earlier tick.
    approaches: FastMap<CarId, Approach>,

    /// `CarId → (from, to)` of the road each vehicle entered on its last move.
    on_edge: FastMap<CarId, (NodeId, NodeId)>,

    /// Routing buffers for the sequential phases.
    scratch: DijkstraScratch,
}

impl DispatchController<ScoringPolicy> {
    /// Create a controller whose scorer is `config.scoring`.
    pub fn new(network: RoadNetwork, config: DispatchConfig) -> Self {
        let scorer = config.scoring;
        Self::with_scorer(network, config, scorer)
    }

    /// Build the network from harness records and wrap it in a controller.
    ///
    /// Intersection ids are taken to be dense `0..intersections.len()`.
    pub fn from_definitions(
        intersections: &[IntersectionInfo],
        roads:         &[RoadInfo],
        config:        DispatchConfig,
    ) -> DispatchResult<Self> {
        let network = RoadNetwork::build(intersections.len(), roads)?;
        Ok(Self::new(network, config))
    }
}

impl<S: AssignmentScorer> DispatchController<S> {
    /// Create a controller with a custom scorer.  `config.scoring` is ignored.
    pub fn with_scorer(network: RoadNetwork, config: DispatchConfig, scorer: S) -> Self {
        let scratch = DijkstraScratch::with_nodes(network.node_count());
        Self {
            network,
            config,
            scorer,
            backlog:       RequestBacklog::new(),
            active_routes: FastMap::default(),
            approaches:    FastMap::default(),
            on_edge:       FastMap::default(),
            scratch,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Requests still waiting, oldest first.
    pub fn pending_requests(&self) -> &RequestBacklog {
        &self.backlog
    }

    /// Trip route of a vehicle currently carrying a passenger.
    pub fn active_route(&self, car: CarId) -> Option<&RouteCursor> {
        self.active_routes.get(&car)
    }

    /// Pickup route of an idle vehicle committed to a waiting passenger.
    pub fn approach(&self, car: CarId) -> Option<&Approach> {
        self.approaches.get(&car)
    }

    // ── Tick entry point ──────────────────────────────────────────────────

    /// Run one dispatch round.
    ///
    /// Mutates `intersection_id` and `passenger_id` of `vehicles` in place.
    /// Each vehicle moves at most one hop, except that a vehicle reaching a
    /// waiting passenger (or its drop-off) this tick may immediately leave
    /// with that passenger.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::OutOfRangeIntersection`] if any vehicle or new
    ///   request names an intersection outside the network.  Checked before
    ///   any state changes.
    /// - [`DispatchError::MissingRoute`] if a vehicle carries a passenger this
    ///   controller never assigned.
    /// - [`DispatchError::Spatial`] if a stored route no longer matches the
    ///   network.
    ///
    /// An unreachable pickup or destination is not an error: the request
    /// simply stays in the backlog.
    pub fn on_turn(
        &mut self,
        vehicles:     &mut [Vehicle],
        new_requests: &[Request],
    ) -> DispatchResult<TurnSummary> {
        let node_count = self.network.node_count();
        validate(vehicles, new_requests, node_count)?;

        self.backlog.extend(new_requests.iter().copied());

        let mut summary = TurnSummary::default();
        if vehicles.is_empty() {
            summary.pending = self.backlog.len();
            return Ok(summary);
        }

        self.prune_departed(vehicles);
        let (mut buckets, moved) = self.advance_and_bucket(vehicles, &mut summary)?;
        self.direct_pickups(vehicles, &mut buckets, &mut summary)?;
        self.greedy_match(vehicles, buckets, &moved, &mut summary)?;

        summary.pending = self.backlog.len();
        tracing::debug!(
            vehicles    = vehicles.len(),
            advanced    = summary.advanced,
            dropped_off = summary.dropped_off,
            pickups     = summary.direct_pickups,
            approaches  = summary.approaches_started,
            pending     = summary.pending,
            "turn complete"
        );
        Ok(summary)
    }

    // ── Step ③: advance in-transit vehicles, bucket idle ones ─────────────

    /// Returns the idle buckets and, per slice position, whether the vehicle
    /// already moved along a pickup route this tick.
    fn advance_and_bucket(
        &mut self,
        vehicles: &mut [Vehicle],
        summary:  &mut TurnSummary,
    ) -> DispatchResult<(Buckets, Vec<bool>)> {
        let mut buckets = Buckets::default();
        let mut moved = vec![false; vehicles.len()];

        for (idx, vehicle) in vehicles.iter_mut().enumerate() {
            let car = vehicle.car_id;
            self.release_edge_of(car);

            let available = match vehicle.passenger_id {
                Some(passenger) => {
                    let route = self
                        .active_routes
                        .get_mut(&car)
                        .ok_or(DispatchError::MissingRoute(car))?;
                    if route.is_complete() {
                        self.active_routes.remove(&car);
                        vehicle.passenger_id = None;
                        summary.dropped_off += 1;
                        tracing::info!(
                            car = car.0,
                            passenger = passenger.0,
                            at = vehicle.intersection_id.0,
                            "passenger dropped off"
                        );
                        true
                    } else {
                        step(&mut self.network, &mut self.on_edge, self.config.arrival, vehicle, route)?;
                        summary.advanced += 1;
                        false
                    }
                }
                None => {
                    if self.active_routes.remove(&car).is_some() {
                        tracing::warn!(car = car.0, "idle vehicle still had a trip route; discarded");
                    }
                    moved[idx] = self.continue_approach(vehicle, summary)?;
                    true
                }
            };

            if available {
                buckets.entry(vehicle.intersection_id).or_default().push_back(idx);
            }
        }
        Ok((buckets, moved))
    }

    /// Move an idle vehicle one hop along its pickup route, if it has one
    /// left.  Returns `true` if it moved.
    ///
    /// The vehicle stays available either way: it can serve a request waiting
    /// where it now stands, and greedy matching reconsiders its target.
    fn continue_approach(
        &mut self,
        vehicle: &mut Vehicle,
        summary: &mut TurnSummary,
    ) -> DispatchResult<bool> {
        let Some(approach) = self.approaches.get_mut(&vehicle.car_id) else {
            return Ok(false);
        };
        if approach.route.is_complete() {
            return Ok(false);
        }
        step(&mut self.network, &mut self.on_edge, self.config.arrival, vehicle, &mut approach.route)?;
        summary.advanced += 1;
        Ok(true)
    }

    // ── Step ④: direct pickups ────────────────────────────────────────────

    fn direct_pickups(
        &mut self,
        vehicles: &mut [Vehicle],
        buckets:  &mut Buckets,
        summary:  &mut TurnSummary,
    ) -> DispatchResult<()> {
        let mut served = Vec::new();

        for (pos, &request) in self.backlog.iter().enumerate() {
            let Some(bucket) = buckets.get_mut(&request.src_intersection_id) else {
                continue;
            };
            if bucket.is_empty() {
                continue;
            }

            let mut route = self.network.shortest_route_with(
                &mut self.scratch,
                request.src_intersection_id,
                request.dst_intersection_id,
            );
            if route.is_unreachable() {
                tracing::debug!(
                    passenger = request.passenger_id.0,
                    "destination unreachable; request stays queued"
                );
                continue;
            }
            if route.is_complete() {
                served.push(pos);
                summary.instant_trips += 1;
                tracing::info!(
                    passenger = request.passenger_id.0,
                    at = request.src_intersection_id.0,
                    "pickup equals destination; trip completed in place"
                );
                continue;
            }

            let Some(idx) = bucket.pop_front() else {
                continue;
            };
            let vehicle = &mut vehicles[idx];
            vehicle.passenger_id = Some(request.passenger_id);
            step(&mut self.network, &mut self.on_edge, self.config.arrival, vehicle, &mut route)?;
            tracing::debug!(
                car = vehicle.car_id.0,
                passenger = request.passenger_id.0,
                distance = route.remaining_distance,
                "direct pickup"
            );
            self.active_routes.insert(vehicle.car_id, route);

            served.push(pos);
            summary.direct_pickups += 1;
            summary.advanced += 1;
        }

        self.backlog.remove_positions(&served);
        Ok(())
    }

    // ── Step ⑤: congestion-weighted greedy matching ───────────────────────

    /// Every bucketed vehicle is matched afresh, including those already
    /// approaching a pickup: an approach survives only if it wins again.  A
    /// vehicle that moved in step ③ keeps its new target but does not move a
    /// second time.
    fn greedy_match(
        &mut self,
        vehicles: &mut [Vehicle],
        buckets:  Buckets,
        moved:    &[bool],
        summary:  &mut TurnSummary,
    ) -> DispatchResult<()> {
        let previous = std::mem::take(&mut self.approaches);

        let mut available: Vec<usize> = buckets.into_values().flatten().collect();
        available.sort_unstable();
        let open: Vec<(usize, Request)> = self.backlog.iter().copied().enumerate().collect();

        if !available.is_empty() && !open.is_empty() {
            self.commit_greedy(vehicles, &available, &open, &previous, moved, summary)?;
        }

        for (car, old) in previous {
            if !self.approaches.contains_key(&car) {
                tracing::debug!(
                    car = car.0,
                    passenger = old.passenger_id.0,
                    "approach dropped"
                );
            }
        }
        Ok(())
    }

    fn commit_greedy(
        &mut self,
        vehicles:  &mut [Vehicle],
        available: &[usize],
        open:      &[(usize, Request)],
        previous:  &FastMap<CarId, Approach>,
        moved:     &[bool],
        summary:   &mut TurnSummary,
    ) -> DispatchResult<()> {
        let candidates = self.build_candidates(vehicles, available, open);
        let ranked = rank_candidates(&self.scorer, &self.network, candidates);

        let mut vehicle_taken = vec![false; vehicles.len()];
        let mut request_taken = vec![false; self.backlog.len()];

        for scored in ranked {
            let c = scored.candidate;
            if vehicle_taken[c.vehicle] || request_taken[c.request] {
                continue;
            }
            vehicle_taken[c.vehicle] = true;
            request_taken[c.request] = true;

            let mut route = c.route;
            if !moved[c.vehicle] {
                step(&mut self.network, &mut self.on_edge, self.config.arrival, &mut vehicles[c.vehicle], &mut route)?;
                summary.advanced += 1;
            }
            let retained = previous
                .get(&c.car_id)
                .is_some_and(|a| a.passenger_id == c.passenger_id);
            if !retained {
                summary.approaches_started += 1;
                tracing::debug!(
                    car = c.car_id.0,
                    passenger = c.passenger_id.0,
                    score = scored.score,
                    "approaching pickup"
                );
            }
            self.approaches.insert(c.car_id, Approach { passenger_id: c.passenger_id, route });
        }
        Ok(())
    }

    /// Every reachable (vehicle, request) pairing that needs at least one
    /// move, in vehicle order then backlog order.
    #[cfg(not(feature = "parallel"))]
    fn build_candidates(
        &mut self,
        vehicles:  &[Vehicle],
        available: &[usize],
        open:      &[(usize, Request)],
    ) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(available.len() * open.len());
        for &v in available {
            out.extend(candidates_for(&self.network, &mut self.scratch, vehicles, v, open));
        }
        out
    }

    /// Parallel variant: one `DijkstraScratch` per Rayon worker.  Collecting
    /// per-vehicle lists keeps the serial candidate order.
    #[cfg(feature = "parallel")]
    fn build_candidates(
        &mut self,
        vehicles:  &[Vehicle],
        available: &[usize],
        open:      &[(usize, Request)],
    ) -> Vec<Candidate> {
        use rayon::prelude::*;

        let network = &self.network;
        let per_vehicle: Vec<Vec<Candidate>> = available
            .par_iter()
            .map_init(
                || DijkstraScratch::with_nodes(network.node_count()),
                |scratch, &v| candidates_for(network, scratch, vehicles, v, open),
            )
            .collect();
        per_vehicle.into_iter().flatten().collect()
    }

    // ── Bookkeeping ───────────────────────────────────────────────────────

    /// The vehicle finished the road it entered on its last move.
    fn release_edge_of(&mut self, car: CarId) {
        if let Some((from, to)) = self.on_edge.remove(&car) {
            release(&mut self.network, self.config.arrival, from, to);
        }
    }

    /// Forget vehicles that are no longer in the harness's list.
    fn prune_departed(&mut self, vehicles: &[Vehicle]) {
        let present: FastSet<CarId> = vehicles.iter().map(|v| v.car_id).collect();
        let mut departed: Vec<CarId> = self
            .active_routes
            .keys()
            .chain(self.approaches.keys())
            .chain(self.on_edge.keys())
            .filter(|car| !present.contains(car))
            .copied()
            .collect();
        if departed.is_empty() {
            return;
        }
        departed.sort_unstable();
        departed.dedup();

        for car in departed {
            self.active_routes.remove(&car);
            self.approaches.remove(&car);
            self.release_edge_of(car);
            tracing::debug!(car = car.0, "vehicle left the grid; state released");
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Advance `vehicle` one hop along `route` and remember the road it entered.
///
/// A vehicle that already moved this tick (reached a pickup, then left with
/// the passenger) has finished its previous road, which is released first.
fn step(
    network: &mut RoadNetwork,
    on_edge: &mut FastMap<CarId, (NodeId, NodeId)>,
    arrival: ArrivalAccounting,
    vehicle: &mut Vehicle,
    route:   &mut RouteCursor,
) -> DispatchResult<()> {
    let from = route.current().unwrap_or(vehicle.intersection_id);
    let next = network.advance(route)?;
    if let Some((prev_from, prev_to)) = on_edge.insert(vehicle.car_id, (from, next)) {
        release(network, arrival, prev_from, prev_to);
    }
    vehicle.intersection_id = next;
    Ok(())
}

fn release(network: &mut RoadNetwork, arrival: ArrivalAccounting, from: NodeId, to: NodeId) {
    match arrival {
        ArrivalAccounting::Disabled => {}
        ArrivalAccounting::ByTarget => {
            network.vehicle_arrived(to);
        }
        ArrivalAccounting::PerVehicle => {
            network.vehicle_left_edge(from, to);
        }
    }
}

fn candidates_for(
    network:  &RoadNetwork,
    scratch:  &mut DijkstraScratch,
    vehicles: &[Vehicle],
    v:        usize,
    open:     &[(usize, Request)],
) -> Vec<Candidate> {
    let vehicle = &vehicles[v];
    open.iter()
        .filter_map(|&(pos, request)| {
            let route = network.shortest_route_with(
                scratch,
                vehicle.intersection_id,
                request.src_intersection_id,
            );
            // Unreachable pickups are never candidates; a zero-length route
            // means the vehicle is already there and direct pickup declined
            // the request (its destination is unreachable).
            if route.is_unreachable() || route.is_complete() {
                return None;
            }
            Some(Candidate {
                vehicle:      v,
                car_id:       vehicle.car_id,
                request:      pos,
                passenger_id: request.passenger_id,
                origin:       vehicle.intersection_id,
                route,
            })
        })
        .collect()
}

fn validate(vehicles: &[Vehicle], requests: &[Request], node_count: usize) -> DispatchResult<()> {
    let check = |subject: Subject, node: NodeId| {
        if node.index() < node_count {
            Ok(())
        } else {
            Err(DispatchError::OutOfRangeIntersection { subject, node, node_count })
        }
    };
    for r in requests {
        check(Subject::Request(r.passenger_id), r.src_intersection_id)?;
        check(Subject::Request(r.passenger_id), r.dst_intersection_id)?;
    }
    for v in vehicles {
        check(Subject::Vehicle(v.car_id), v.intersection_id)?;
    }
    Ok(())
}
