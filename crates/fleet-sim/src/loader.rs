//! CSV loaders for the road network and scripted ride requests.
//!
//! # CSV formats
//!
//! Intersections: one row per intersection; ids must cover `0..n-1`
//! exactly once, in any order:
//!
//! ```csv
//! intersection_id
//! 0
//! 1
//! 2
//! ```
//!
//! Roads: one row per directed road.  The optional `two_way` column adds
//! the reverse road with the same weight:
//!
//! ```csv
//! src_intersection_id,dst_intersection_id,weight,two_way
//! 0,1,5,true
//! 1,2,5,false
//! ```
//!
//! Requests: one row per ride request, issued at the given tick:
//!
//! ```csv
//! tick,passenger_id,src_intersection_id,dst_intersection_id
//! 0,0,2,0
//! 3,1,1,2
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::{NodeId, PassengerId, Tick};
use fleet_dispatch::Request;
use fleet_spatial::{IntersectionInfo, RoadInfo, RoadNetwork};

use crate::scenario::RequestSchedule;
use crate::{SimError, SimResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IntersectionRecord {
    intersection_id: u32,
}

#[derive(Deserialize)]
struct RoadRecord {
    src_intersection_id: u32,
    dst_intersection_id: u32,
    weight:              u32,
    #[serde(default)]
    two_way:             bool,
}

#[derive(Deserialize)]
struct RequestRecord {
    tick:                u64,
    passenger_id:        u32,
    src_intersection_id: u32,
    dst_intersection_id: u32,
}

// ── Intersections ─────────────────────────────────────────────────────────────

/// Load intersection definitions, sorted by id.
pub fn load_intersections_csv(path: &Path) -> SimResult<Vec<IntersectionInfo>> {
    let file = std::fs::File::open(path)?;
    load_intersections_reader(file)
}

/// Like [`load_intersections_csv`] but accepts any `Read` source.
pub fn load_intersections_reader<R: Read>(reader: R) -> SimResult<Vec<IntersectionInfo>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ids: Vec<u32> = Vec::new();
    for result in csv_reader.deserialize::<IntersectionRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        ids.push(row.intersection_id);
    }
    ids.sort_unstable();

    // Dense 0..n-1: after sorting, position i must hold id i.
    for (i, &id) in ids.iter().enumerate() {
        if id as usize != i {
            return Err(SimError::Parse(format!(
                "intersection ids must be unique and cover 0..{}; found {id} at sorted position {i}",
                ids.len()
            )));
        }
    }

    Ok(ids
        .into_iter()
        .map(|id| IntersectionInfo { intersection_id: NodeId(id) })
        .collect())
}

// ── Roads ─────────────────────────────────────────────────────────────────────

/// Load road definitions.  `two_way` rows expand into two directed roads.
pub fn load_roads_csv(path: &Path) -> SimResult<Vec<RoadInfo>> {
    let file = std::fs::File::open(path)?;
    load_roads_reader(file)
}

/// Like [`load_roads_csv`] but accepts any `Read` source.
pub fn load_roads_reader<R: Read>(reader: R) -> SimResult<Vec<RoadInfo>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut roads = Vec::new();
    for result in csv_reader.deserialize::<RoadRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        let (src, dst) = (NodeId(row.src_intersection_id), NodeId(row.dst_intersection_id));
        roads.push(RoadInfo { src_intersection_id: src, dst_intersection_id: dst, weight: row.weight });
        if row.two_way {
            roads.push(RoadInfo { src_intersection_id: dst, dst_intersection_id: src, weight: row.weight });
        }
    }
    Ok(roads)
}

/// Load both files and build the network.
pub fn load_network(intersections: &Path, roads: &Path) -> SimResult<RoadNetwork> {
    let intersections = load_intersections_csv(intersections)?;
    let roads = load_roads_csv(roads)?;
    let network = RoadNetwork::build(intersections.len(), &roads)?;
    tracing::info!(
        intersections = network.node_count(),
        roads         = network.edge_count(),
        "road network loaded"
    );
    Ok(network)
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// Load a scripted request timetable.
pub fn load_requests_csv(path: &Path) -> SimResult<RequestSchedule> {
    let file = std::fs::File::open(path)?;
    load_requests_reader(file)
}

/// Like [`load_requests_csv`] but accepts any `Read` source.
///
/// Rows for the same tick keep their file order.
pub fn load_requests_reader<R: Read>(reader: R) -> SimResult<RequestSchedule> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut schedule = RequestSchedule::new();
    for result in csv_reader.deserialize::<RequestRecord>() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        schedule.push(
            Tick(row.tick),
            Request::new(
                PassengerId(row.passenger_id),
                NodeId(row.src_intersection_id),
                NodeId(row.dst_intersection_id),
            ),
        );
    }
    Ok(schedule)
}
