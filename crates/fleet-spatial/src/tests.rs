//! Unit tests for fleet-spatial.
//!
//! All tests use hand-crafted networks.

#[cfg(test)]
mod helpers {
    use fleet_core::NodeId;
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small grid-like network:
    ///
    /// ```text
    ///   0 ── 1 ── 2
    ///   │         │
    ///   3 ─────── 4
    /// ```
    ///
    /// Undirected roads: 0-1 (10), 1-2 (10), 2-4 (10), 0-3 (50), 3-4 (10).
    /// Shortest 0→4 is 0→1→2→4 (30) rather than 0→3→4 (60).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let n = [NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)];
        let mut b = RoadNetworkBuilder::new(5);
        b.add_road(n[0], n[1], 10);
        b.add_road(n[1], n[2], 10);
        b.add_road(n[2], n[4], 10);
        b.add_road(n[0], n[3], 50);
        b.add_road(n[3], n[4], 10);
        (b.build().unwrap(), n)
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fleet_core::NodeId;
    use crate::{RoadInfo, RoadNetwork, RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new(0).build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(RoadNetwork::empty().is_empty());
    }

    #[test]
    fn build_from_road_records() {
        let roads = [
            RoadInfo { src_intersection_id: NodeId(0), dst_intersection_id: NodeId(1), weight: 5 },
            RoadInfo { src_intersection_id: NodeId(1), dst_intersection_id: NodeId(2), weight: 5 },
        ];
        let net = RoadNetwork::build(3, &roads).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.out_degree(NodeId(0)), 1);
        assert_eq!(net.out_degree(NodeId(2)), 0);
    }

    #[test]
    fn out_of_range_edge_rejected() {
        let roads = [RoadInfo { src_intersection_id: NodeId(0), dst_intersection_id: NodeId(3), weight: 1 }];
        let err = RoadNetwork::build(3, &roads).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::InvalidEdge { from: NodeId(0), to: NodeId(3), node_count: 3 }
        ));
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn parallel_edges_kept_and_cheapest_weight_reported() {
        let mut b = RoadNetworkBuilder::new(2);
        b.add_directed_edge(NodeId(0), NodeId(1), 9);
        b.add_directed_edge(NodeId(0), NodeId(1), 4);
        let net = b.build().unwrap();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.edge_weight(NodeId(0), NodeId(1)), Some(4));
        assert_eq!(net.edge_weight(NodeId(1), NodeId(0)), None);
        assert_eq!(net.edge_weight(NodeId(7), NodeId(0)), None);
    }
}

// ── Shortest routes ───────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use fleet_core::NodeId;
    use crate::{DijkstraScratch, RoadNetworkBuilder, RouteCursor};

    #[test]
    fn same_node_is_single_hop() {
        let (net, nodes) = super::helpers::grid_network();
        for n in nodes {
            let r = net.shortest_route(n, n);
            assert_eq!(r.remaining_distance, 0);
            assert_eq!(r.hops, vec![n]);
            assert!(r.is_complete());
        }
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = net.shortest_route(n0, n4);
        assert_eq!(route.remaining_distance, 30);
        assert_eq!(route.hops, vec![n4, n2, n1, n0]);
        assert_eq!(route.current(), Some(n0));
        assert_eq!(route.next_hop(), Some(n1));
        assert_eq!(route.destination(), Some(n4));
        assert_eq!(route.edges_remaining(), 3);
    }

    #[test]
    fn unreachable_is_sentinel() {
        let mut b = RoadNetworkBuilder::new(3);
        b.add_directed_edge(NodeId(0), NodeId(1), 1);
        let net = b.build().unwrap();

        let r = net.shortest_route(NodeId(0), NodeId(2));
        assert!(r.is_unreachable());
        assert_eq!(r.remaining_distance, RouteCursor::UNREACHABLE);
        // One-way road blocks the return trip.
        assert!(net.shortest_route(NodeId(1), NodeId(0)).is_unreachable());
        // Out-of-range nodes never route.
        assert!(net.shortest_route(NodeId(0), NodeId(9)).is_unreachable());
    }

    #[test]
    fn equal_cost_tie_prefers_lower_node_id() {
        // 0→1→3 and 0→2→3 both cost 2.  Node 1 is settled first, so the path
        // through node 1 wins.
        let mut b = RoadNetworkBuilder::new(4);
        b.add_directed_edge(NodeId(0), NodeId(2), 1);
        b.add_directed_edge(NodeId(0), NodeId(1), 1);
        b.add_directed_edge(NodeId(2), NodeId(3), 1);
        b.add_directed_edge(NodeId(1), NodeId(3), 1);
        let net = b.build().unwrap();
        let r = net.shortest_route(NodeId(0), NodeId(3));
        assert_eq!(r.hops, vec![NodeId(3), NodeId(1), NodeId(0)]);
        assert_eq!(r.remaining_distance, 2);
    }

    #[test]
    fn zero_weight_roads_route() {
        let mut b = RoadNetworkBuilder::new(3);
        b.add_road(NodeId(0), NodeId(1), 0);
        b.add_road(NodeId(1), NodeId(2), 0);
        let net = b.build().unwrap();
        let r = net.shortest_route(NodeId(0), NodeId(2));
        assert_eq!(r.remaining_distance, 0);
        assert_eq!(r.edges_remaining(), 2);
    }

    #[test]
    fn scratch_reuse_matches_fresh_queries() {
        let (net, nodes) = super::helpers::grid_network();
        let mut scratch = DijkstraScratch::with_nodes(net.node_count());
        for &a in &nodes {
            for &b in &nodes {
                assert_eq!(net.shortest_route_with(&mut scratch, a, b), net.shortest_route(a, b));
            }
        }
    }
}

// ── Advancing cursors and congestion ──────────────────────────────────────────

#[cfg(test)]
mod advance {
    use fleet_core::NodeId;
    use crate::{RoadNetworkBuilder, RouteCursor, SpatialError};

    #[test]
    fn full_consumption_visits_every_edge_and_ends_at_destination() {
        let (mut net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let mut route = net.shortest_route(n0, n4);
        let expected_steps = route.hops.len() - 1;

        let mut steps = 0;
        let mut last = n0;
        while !route.is_complete() {
            last = net.advance(&mut route).unwrap();
            steps += 1;
        }
        assert_eq!(steps, expected_steps);
        assert_eq!(last, n4);
        assert_eq!(route.remaining_distance, 0);
    }

    #[test]
    fn remaining_distance_decreases_per_hop() {
        let (mut net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let mut route = net.shortest_route(n0, n4);
        assert_eq!(net.advance(&mut route).unwrap(), n1);
        assert_eq!(route.remaining_distance, 20);
        assert_eq!(net.advance(&mut route).unwrap(), n2);
        assert_eq!(route.remaining_distance, 10);
        assert_eq!(net.advance(&mut route).unwrap(), n4);
        assert_eq!(route.remaining_distance, 0);
    }

    #[test]
    fn advance_increments_congestion_once_per_edge() {
        let (mut net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        assert_eq!(net.congestion(n0, n1), 0);

        let mut a = net.shortest_route(n0, n4);
        let mut b = net.shortest_route(n0, n2);
        net.advance(&mut a).unwrap();
        assert_eq!(net.congestion(n0, n1), 1);
        net.advance(&mut b).unwrap();
        assert_eq!(net.congestion(n0, n1), 2);
        net.advance(&mut a).unwrap();
        assert_eq!(net.congestion(n1, n2), 1);
        assert_eq!(net.congestion(n1, n0), 0, "direction matters");

        let table = net.congestion_table();
        assert_eq!(table.total(), 3);
        assert_eq!(table.occupied_edges(), 2);
        let occupied: Vec<_> = table.iter().collect();
        assert_eq!(occupied, vec![((n0, n1), 2), ((n1, n2), 1)]);
    }

    #[test]
    fn exhausted_cursor_errors() {
        let (mut net, [n0, ..]) = super::helpers::grid_network();
        let mut trivial = net.shortest_route(n0, n0);
        assert!(matches!(net.advance(&mut trivial), Err(SpatialError::RouteExhausted)));
        let mut none = RouteCursor::unreachable();
        assert!(matches!(net.advance(&mut none), Err(SpatialError::RouteExhausted)));
    }

    #[test]
    fn edited_cursor_is_inconsistent_and_left_untouched() {
        let mut b = RoadNetworkBuilder::new(3);
        b.add_directed_edge(NodeId(0), NodeId(1), 1);
        let mut net = b.build().unwrap();
        let mut bogus = RouteCursor { remaining_distance: 1, hops: vec![NodeId(2), NodeId(0)] };
        let err = net.advance(&mut bogus).unwrap_err();
        assert!(matches!(err, SpatialError::RouteInconsistency { from: NodeId(0), to: NodeId(2) }));
        assert_eq!(bogus.hops, vec![NodeId(2), NodeId(0)]);
        assert_eq!(net.congestion_table().total(), 0);
    }

    #[test]
    fn vehicle_arrived_releases_by_target() {
        let mut b = RoadNetworkBuilder::new(3);
        b.add_directed_edge(NodeId(0), NodeId(2), 1);
        b.add_directed_edge(NodeId(1), NodeId(2), 1);
        let mut net = b.build().unwrap();

        let mut via0 = net.shortest_route(NodeId(0), NodeId(2));
        let mut via1 = net.shortest_route(NodeId(1), NodeId(2));
        net.advance(&mut via1).unwrap();
        net.advance(&mut via0).unwrap();

        // Lowest source id among edges ending at 2 is released first.
        assert_eq!(net.vehicle_arrived(NodeId(2)), Some((NodeId(0), NodeId(2))));
        assert_eq!(net.congestion(NodeId(0), NodeId(2)), 0);
        assert_eq!(net.congestion(NodeId(1), NodeId(2)), 1);
        assert_eq!(net.vehicle_arrived(NodeId(2)), Some((NodeId(1), NodeId(2))));
        // Nothing left: no-op, never negative.
        assert_eq!(net.vehicle_arrived(NodeId(2)), None);
        assert_eq!(net.congestion_table().total(), 0);
    }

    #[test]
    fn vehicle_left_edge_is_exact() {
        let (mut net, [n0, n1, ..]) = super::helpers::grid_network();
        let mut r = net.shortest_route(n0, n1);
        net.advance(&mut r).unwrap();
        assert!(!net.vehicle_left_edge(n1, n0));
        assert!(net.vehicle_left_edge(n0, n1));
        assert!(!net.vehicle_left_edge(n0, n1));
        assert_eq!(net.congestion(n0, n1), 0);
    }
}
