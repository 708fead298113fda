//! `fleet-spatial`: road network, shortest routes, and congestion.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`network`]    | `RoadNetwork` (CSR), `RoadNetworkBuilder`, input records   |
//! | [`router`]     | `RouteCursor`, `DijkstraScratch`, route queries + `advance`|
//! | [`congestion`] | `CongestionTable`, per-edge vehicle occupancy             |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |
//!
//! The network knows nothing about vehicles or requests.  It answers routing
//! queries (`&self`, safe to run from many threads given one
//! [`DijkstraScratch`] per thread) and records opaque edge traversals
//! (`&mut self`).

pub mod congestion;
pub mod error;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use congestion::CongestionTable;
pub use error::{SpatialError, SpatialResult};
pub use network::{IntersectionInfo, RoadInfo, RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraScratch, RouteCursor};
