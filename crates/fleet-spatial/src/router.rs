//! Shortest-route queries and incremental route consumption.
//!
//! # Route cursors
//!
//! A [`RouteCursor`] stores the hops of a shortest path **destination first,
//! origin last**, so consuming the route one intersection at a time is a
//! `Vec::pop` from the tail:
//!
//! ```text
//! shortest_route(0, 3)  →  hops = [3, 2, 1, 0], remaining_distance = w01+w12+w23
//! advance               →  hops = [3, 2, 1],    returns 1
//! advance               →  hops = [3, 2],       returns 2
//! advance               →  hops = [3],          returns 3, remaining_distance = 0
//! ```
//!
//! # Scratch buffers
//!
//! Dijkstra's working state (tentative distances, predecessors, settled set,
//! frontier) lives in a caller-owned [`DijkstraScratch`].  The network is only
//! borrowed immutably during a query, so any number of threads may route in
//! parallel as long as each brings its own scratch.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fleet_core::NodeId;

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── RouteCursor ───────────────────────────────────────────────────────────────

/// Remaining distance plus remaining hop sequence of one in-progress trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCursor {
    /// Sum of edge weights still to be traversed.  `UNREACHABLE` for the
    /// no-route sentinel; reset to 0 once only the final hop remains, after
    /// which it is no longer consulted.
    pub remaining_distance: u64,

    /// Intersections from the final destination (index 0) back to the
    /// current position (last index).
    pub hops: Vec<NodeId>,
}

impl RouteCursor {
    /// Distance carried by the no-route sentinel.
    pub const UNREACHABLE: u64 = u64::MAX;

    /// The "no route" sentinel: infinite distance, no hops.
    pub fn unreachable() -> Self {
        Self { remaining_distance: Self::UNREACHABLE, hops: Vec::new() }
    }

    /// A zero-length route that is already at `node`.
    pub fn stationary(node: NodeId) -> Self {
        Self { remaining_distance: 0, hops: vec![node] }
    }

    /// `true` for the no-route sentinel.  Such a cursor must never be used as
    /// an assignment candidate.
    #[inline]
    pub fn is_unreachable(&self) -> bool {
        self.hops.is_empty()
    }

    /// `true` once only the final hop remains (nothing left to advance).
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.hops.len() == 1
    }

    /// Intersection the route currently stands on.
    #[inline]
    pub fn current(&self) -> Option<NodeId> {
        self.hops.last().copied()
    }

    /// Intersection the next `advance` will move to.
    #[inline]
    pub fn next_hop(&self) -> Option<NodeId> {
        let n = self.hops.len();
        if n < 2 { None } else { Some(self.hops[n - 2]) }
    }

    /// Final intersection of the route.
    #[inline]
    pub fn destination(&self) -> Option<NodeId> {
        self.hops.first().copied()
    }

    /// Number of edges still to traverse.
    #[inline]
    pub fn edges_remaining(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }
}

// ── DijkstraScratch ───────────────────────────────────────────────────────────

/// Reusable working buffers for one Dijkstra search at a time.
///
/// Not shared: one instance per thread (or per sequential caller).
#[derive(Debug, Default)]
pub struct DijkstraScratch {
    /// dist[v] = best known cost to reach v.
    dist:    Vec<u64>,
    /// prev[v] = predecessor of v on the best known path.
    prev:    Vec<NodeId>,
    settled: Vec<bool>,
    /// Min-heap keyed by (cost, node): ties resolve to the lower node id.
    heap:    BinaryHeap<Reverse<(u64, NodeId)>>,
}

impl DijkstraScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the buffers for a network of `node_count` intersections.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut s = Self::default();
        s.reset(node_count);
        s
    }

    fn reset(&mut self, node_count: usize) {
        self.dist.clear();
        self.dist.resize(node_count, u64::MAX);
        self.prev.clear();
        self.prev.resize(node_count, NodeId::INVALID);
        self.settled.clear();
        self.settled.resize(node_count, false);
        self.heap.clear();
    }
}

// ── Route queries ─────────────────────────────────────────────────────────────

impl RoadNetwork {
    /// Shortest route from `src` to `dst` using a freshly allocated scratch.
    ///
    /// See [`shortest_route_with`](Self::shortest_route_with).
    pub fn shortest_route(&self, src: NodeId, dst: NodeId) -> RouteCursor {
        let mut scratch = DijkstraScratch::new();
        self.shortest_route_with(&mut scratch, src, dst)
    }

    /// Shortest route from `src` to `dst` (Dijkstra, O((V+E) log V)).
    ///
    /// - `src == dst` → one hop, distance 0.
    /// - `dst` unreachable, or either node outside the network →
    ///   [`RouteCursor::unreachable`].
    pub fn shortest_route_with(
        &self,
        scratch: &mut DijkstraScratch,
        src:     NodeId,
        dst:     NodeId,
    ) -> RouteCursor {
        if !self.has_node(src) || !self.has_node(dst) {
            return RouteCursor::unreachable();
        }
        if src == dst {
            return RouteCursor::stationary(dst);
        }

        scratch.reset(self.node_count());
        scratch.dist[src.index()] = 0;
        scratch.heap.push(Reverse((0, src)));

        while let Some(Reverse((cost, node))) = scratch.heap.pop() {
            if node == dst {
                return reconstruct(scratch, src, dst, cost);
            }
            // Skip stale heap entries.
            if scratch.settled[node.index()] {
                continue;
            }
            scratch.settled[node.index()] = true;

            for edge in self.out_edges(node) {
                let neighbor = self.edge_to[edge.index()];
                if scratch.settled[neighbor.index()] {
                    continue;
                }
                let new_cost = cost.saturating_add(self.edge_weight[edge.index()] as u64);
                if new_cost < scratch.dist[neighbor.index()] {
                    scratch.dist[neighbor.index()] = new_cost;
                    scratch.prev[neighbor.index()] = node;
                    scratch.heap.push(Reverse((new_cost, neighbor)));
                }
            }
        }

        RouteCursor::unreachable()
    }

    /// Consume one hop of `cursor`: step from its current intersection to the
    /// next one, charge the road's weight against `remaining_distance`, and
    /// count the vehicle onto that road.  Returns the new current
    /// intersection, which the caller stores on the vehicle.
    ///
    /// The cursor is left untouched on error.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::RouteExhausted`] if fewer than two hops remain.
    /// - [`SpatialError::RouteInconsistency`] if there is no road between the
    ///   two hops (the cursor was not produced by this network or was edited).
    pub fn advance(&mut self, cursor: &mut RouteCursor) -> SpatialResult<NodeId> {
        let (Some(current), Some(next)) = (cursor.current(), cursor.next_hop()) else {
            return Err(SpatialError::RouteExhausted);
        };
        let weight = self
            .edge_weight(current, next)
            .ok_or(SpatialError::RouteInconsistency { from: current, to: next })?;

        cursor.hops.pop();
        cursor.remaining_distance = if cursor.is_complete() {
            0
        } else {
            cursor.remaining_distance.saturating_sub(weight as u64)
        };

        self.congestion.record_traversal(current, next);
        Ok(next)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn reconstruct(scratch: &DijkstraScratch, src: NodeId, dst: NodeId, total: u64) -> RouteCursor {
    let mut hops = vec![dst];
    let mut cur = dst;
    while cur != src {
        cur = scratch.prev[cur.index()];
        hops.push(cur);
    }
    RouteCursor { remaining_distance: total, hops }
}
