//! `fleet-sim`: simulation harness around the dispatch controller.
//!
//! The dispatcher core only knows `on_turn(vehicles, new_requests)`.  This
//! crate supplies everything around it: loading a road network from CSV,
//! placing a fleet, issuing requests, driving the clock, and recording what
//! happened.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`loader`]   | CSV loaders for intersections, roads, and request timetables    |
//! | [`scenario`] | `RequestSource`, `RequestGenerator`, `RequestSchedule`, `place_fleet` |
//! | [`builder`]  | `SimBuilder`                                                    |
//! | [`sim`]      | `Sim`, `SimStats`                                               |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `LogObserver`                    |
//! | [`output`]   | `CsvTrajectoryWriter`                                           |
//! | [`error`]    | `SimError`, `SimResult<T>`                                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::{SimConfig, SimRng};
//! use fleet_sim::{LogObserver, RequestGenerator, SimBuilder, load_network};
//!
//! let config  = SimConfig::default();
//! let network = load_network("intersections.csv".as_ref(), "roads.csv".as_ref())?;
//! let demand  = RequestGenerator::new(SimRng::new(config.seed).child(2), 0.5)?;
//! let mut sim = SimBuilder::new(config, network, demand).random_fleet(10).build()?;
//! sim.run(&mut LogObserver::new(10))?;
//! ```

pub mod builder;
pub mod error;
pub mod loader;
pub mod observer;
pub mod output;
pub mod scenario;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use loader::{
    load_intersections_csv, load_intersections_reader, load_network, load_requests_csv,
    load_requests_reader, load_roads_csv, load_roads_reader,
};
pub use observer::{LogObserver, NoopObserver, SimObserver};
pub use output::{CsvTrajectoryWriter, TickSummaryRow, VehicleSnapshotRow};
pub use scenario::{NoRequests, RequestGenerator, RequestSchedule, RequestSource, place_fleet};
pub use sim::{Sim, SimStats};
