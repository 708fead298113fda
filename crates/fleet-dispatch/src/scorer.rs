//! Ranking policy for greedy (vehicle, request) assignment.
//!
//! # Pluggability
//!
//! The controller scores candidates through the [`AssignmentScorer`] trait, so
//! applications can swap in their own cost model without touching the tick
//! algorithm.  Two policies ship with the crate:
//!
//! | Policy               | Score                                                     |
//! |----------------------|-----------------------------------------------------------|
//! | [`DistanceOnly`]     | `route.remaining_distance`                                |
//! | [`CongestionWeighted`] | `route.remaining_distance + congestion(origin, next hop)` |
//!
//! Lower scores are committed first.  Ranking is a stable sort, so equal
//! scores keep candidate generation order (vehicle order, then backlog
//! order) and replays are deterministic.

use fleet_core::{CarId, NodeId, PassengerId};
use fleet_spatial::{RoadNetwork, RouteCursor};

// ── Candidate ─────────────────────────────────────────────────────────────────

/// One feasible pairing considered during greedy matching.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position of the vehicle in this tick's vehicle slice.
    pub vehicle:      usize,
    pub car_id:       CarId,
    /// Position of the request in the backlog.
    pub request:      usize,
    pub passenger_id: PassengerId,
    /// Intersection the vehicle departs from.
    pub origin:       NodeId,
    /// Shortest route from `origin` to the pickup point.  Never the no-route
    /// sentinel and always at least one edge long.
    pub route:        RouteCursor,
}

/// A candidate together with the score it was ranked by.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub score:     u64,
    pub candidate: Candidate,
}

// ── AssignmentScorer trait ────────────────────────────────────────────────────

/// Cost model used to rank candidates.  Lower is better.
///
/// Implementations must be `Send + Sync` so a controller can be moved across
/// threads and shared with Rayon workers.
pub trait AssignmentScorer: Send + Sync {
    fn score(&self, candidate: &Candidate, network: &RoadNetwork) -> u64;
}

/// Rank by route length alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceOnly;

impl AssignmentScorer for DistanceOnly {
    fn score(&self, candidate: &Candidate, _network: &RoadNetwork) -> u64 {
        candidate.route.remaining_distance
    }
}

/// Rank by route length plus the occupancy of the first road, biasing
/// assignment away from crowded roads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CongestionWeighted;

impl AssignmentScorer for CongestionWeighted {
    fn score(&self, candidate: &Candidate, network: &RoadNetwork) -> u64 {
        let first_edge = candidate
            .route
            .next_hop()
            .map_or(0, |next| network.congestion(candidate.origin, next) as u64);
        candidate.route.remaining_distance.saturating_add(first_edge)
    }
}

/// Config-selectable scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoringPolicy {
    DistanceOnly,
    #[default]
    CongestionWeighted,
}

impl AssignmentScorer for ScoringPolicy {
    fn score(&self, candidate: &Candidate, network: &RoadNetwork) -> u64 {
        match self {
            ScoringPolicy::DistanceOnly       => DistanceOnly.score(candidate, network),
            ScoringPolicy::CongestionWeighted => CongestionWeighted.score(candidate, network),
        }
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Score every candidate and sort ascending (stable).
pub fn rank_candidates<S: AssignmentScorer + ?Sized>(
    scorer:     &S,
    network:    &RoadNetwork,
    candidates: Vec<Candidate>,
) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: scorer.score(&candidate, network),
            candidate,
        })
        .collect();
    ranked.sort_by_key(|c| c.score);
    ranked
}
