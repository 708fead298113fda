//! Per-edge vehicle occupancy.
//!
//! Keys are directed intersection pairs rather than `EdgeId`s: a vehicle
//! route is a sequence of intersections, so parallel roads between the same
//! pair share one counter.  A `BTreeMap` keeps iteration (and therefore the
//! by-target release choice) deterministic across runs.

use std::collections::BTreeMap;

use fleet_core::NodeId;

/// Mapping `(src, dst) -> number of vehicles on that road`.
///
/// Entries that drop to zero are removed, so every stored count is positive.
#[derive(Debug, Clone, Default)]
pub struct CongestionTable {
    occupancy: BTreeMap<(NodeId, NodeId), u32>,
}

impl CongestionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current occupancy of `(src, dst)`, 0 if never traversed.
    #[inline]
    pub fn get(&self, src: NodeId, dst: NodeId) -> u32 {
        self.occupancy.get(&(src, dst)).copied().unwrap_or(0)
    }

    /// One vehicle entered `(src, dst)`.
    pub fn record_traversal(&mut self, src: NodeId, dst: NodeId) {
        *self.occupancy.entry((src, dst)).or_insert(0) += 1;
    }

    /// One vehicle left `(src, dst)`.  Returns `false` (and changes nothing)
    /// if the edge was not occupied; counts never go negative.
    pub fn release_edge(&mut self, src: NodeId, dst: NodeId) -> bool {
        let Some(count) = self.occupancy.get_mut(&(src, dst)) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.occupancy.remove(&(src, dst));
        }
        true
    }

    /// Release one occupied edge whose target is `node`, choosing the lowest
    /// source id among ties.  O(occupied edges).
    pub fn release_by_target(&mut self, node: NodeId) -> Option<(NodeId, NodeId)> {
        let key = self.occupancy.keys().find(|(_, to)| *to == node).copied()?;
        self.release_edge(key.0, key.1);
        Some(key)
    }

    /// Sum of all occupancies.
    pub fn total(&self) -> u64 {
        self.occupancy.values().map(|&c| c as u64).sum()
    }

    /// Number of distinct occupied edges.
    pub fn occupied_edges(&self) -> usize {
        self.occupancy.len()
    }

    /// Occupied edges in `(src, dst)` order.
    pub fn iter(&self) -> impl Iterator<Item = ((NodeId, NodeId), u32)> + '_ {
        self.occupancy.iter().map(|(&k, &v)| (k, v))
    }
}
