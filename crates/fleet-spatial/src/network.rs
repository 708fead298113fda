//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_weight`) are sorted by
//! source node and indexed by `EdgeId`.  Parallel roads between the same pair
//! of intersections are kept as separate edges, in insertion order.
//!
//! The network is immutable after [`RoadNetworkBuilder::build`] apart from the
//! [`CongestionTable`] it owns.

use fleet_core::{EdgeId, NodeId};

use crate::{CongestionTable, SpatialError, SpatialResult};

// ── Input records ─────────────────────────────────────────────────────────────

/// One intersection as supplied by the harness.  Only the id matters to the
/// routing engine; intersections are dense `0..n-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionInfo {
    pub intersection_id: NodeId,
}

/// One directed road as supplied by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadInfo {
    pub src_intersection_id: NodeId,
    pub dst_intersection_id: NodeId,
    /// Travel cost of the road (time or distance unit, caller's choice).
    pub weight: u32,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus live per-edge congestion.
///
/// The CSR arrays are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetwork::build`] or [`RoadNetworkBuilder`].
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Travel cost of each edge.  Used as the Dijkstra edge cost.
    pub edge_weight: Vec<u32>,

    // ── Mutable traffic state ─────────────────────────────────────────────
    pub(crate) congestion: CongestionTable,
}

impl RoadNetwork {
    /// Build a network over intersections `0..intersection_count` from a list
    /// of directed roads.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidEdge`] if any road references a node outside
    /// `0..intersection_count`.
    pub fn build(intersection_count: usize, roads: &[RoadInfo]) -> SpatialResult<Self> {
        let mut b = RoadNetworkBuilder::with_capacity(intersection_count, roads.len());
        for road in roads {
            b.add_directed_edge(road.src_intersection_id, road.dst_intersection_id, road.weight);
        }
        b.build()
    }

    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        Self {
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_weight:    Vec::new(),
            congestion:     CongestionTable::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_out_start.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// `true` if `node` lies in `0..node_count`.
    #[inline]
    pub fn has_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Cheapest weight among the roads `from -> to`, or `None` if there is no
    /// such road (or `from` is not a node of this network).
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<u32> {
        if !self.has_node(from) {
            return None;
        }
        self.out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .map(|e| self.edge_weight[e.index()])
            .min()
    }

    // ── Congestion ────────────────────────────────────────────────────────

    /// Number of vehicles currently recorded on the directed pair
    /// `(src, dst)`; 0 if never traversed.
    #[inline]
    pub fn congestion(&self, src: NodeId, dst: NodeId) -> u32 {
        self.congestion.get(src, dst)
    }

    /// A vehicle reached `node`: release one occupied edge that ends there.
    ///
    /// The edge is chosen by target alone, so when several occupied edges
    /// share the target the one with the lowest source id is decremented, not
    /// necessarily the one the vehicle used.  Returns the released pair, or
    /// `None` (no-op) if no occupied edge ends at `node`.
    pub fn vehicle_arrived(&mut self, node: NodeId) -> Option<(NodeId, NodeId)> {
        let released = self.congestion.release_by_target(node);
        if released.is_none() {
            tracing::trace!(node = node.0, "vehicle_arrived: no occupied edge ends here");
        }
        released
    }

    /// Release exactly one occupancy of `(src, dst)`.  Returns `false` if the
    /// edge was not occupied.
    pub fn vehicle_left_edge(&mut self, src: NodeId, dst: NodeId) -> bool {
        self.congestion.release_edge(src, dst)
    }

    /// Read-only view of the whole congestion table.
    pub fn congestion_table(&self) -> &CongestionTable {
        &self.congestion
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts directed edges in any order.  `build()` validates the
/// endpoints, sorts edges by source node (stable, so parallel roads keep their
/// insertion order) and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use fleet_core::NodeId;
/// use fleet_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new(3);
/// b.add_road(NodeId(0), NodeId(1), 5);
/// b.add_directed_edge(NodeId(1), NodeId(2), 7);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 3);
/// assert_eq!(net.edge_count(), 3);
/// ```
pub struct RoadNetworkBuilder {
    node_count: usize,
    raw_edges:  Vec<RawEdge>,
}

struct RawEdge {
    from:   NodeId,
    to:     NodeId,
    weight: u32,
}

impl RoadNetworkBuilder {
    /// Start a network over intersections `0..node_count`.
    pub fn new(node_count: usize) -> Self {
        Self { node_count, raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of edges.
    pub fn with_capacity(node_count: usize, edges: usize) -> Self {
        Self { node_count, raw_edges: Vec::with_capacity(edges) }
    }

    /// Add a **directed** road from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: u32) {
        self.raw_edges.push(RawEdge { from, to, weight });
    }

    /// Convenience: add roads in **both directions** with the same weight.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: u32) {
        self.add_directed_edge(a, b, weight);
        self.add_directed_edge(b, a, weight);
    }

    pub fn node_count(&self) -> usize { self.node_count }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidEdge`] for the first edge whose endpoint is not
    /// in `0..node_count`.
    pub fn build(self) -> SpatialResult<RoadNetwork> {
        let node_count = self.node_count;
        let edge_count = self.raw_edges.len();

        if let Some(bad) = self
            .raw_edges
            .iter()
            .find(|e| e.from.index() >= node_count || e.to.index() >= node_count)
        {
            return Err(SpatialError::InvalidEdge {
                from: bad.from,
                to:   bad.to,
                node_count,
            });
        }

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<u32>    = raw.iter().map(|e| e.weight).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        tracing::debug!(nodes = node_count, edges = edge_count, "road network built");

        Ok(RoadNetwork {
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            congestion: CongestionTable::new(),
        })
    }
}
