//! `fleet-dispatch`: the per-tick dispatch controller.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`vehicle`]    | `Vehicle`, `Request`: the harness-facing records             |
//! | [`backlog`]    | `RequestBacklog`: FIFO of unmatched requests                 |
//! | [`scorer`]     | `AssignmentScorer`, `DistanceOnly`, `CongestionWeighted`, `ScoringPolicy`, `rank_candidates` |
//! | [`config`]     | `DispatchConfig`, `ArrivalAccounting`                        |
//! | [`controller`] | `DispatchController`, `TurnSummary`, `Approach`              |
//! | [`error`]      | `DispatchError`, `DispatchResult<T>`                         |
//!
//! # Tick algorithm
//!
//! ```text
//! on_turn(vehicles, new_requests):
//!   ⓪ Validate     every intersection id must be inside the network
//!   ① Ingest       append new_requests to the FIFO backlog
//!   ② Early exit   stop here when there are no vehicles
//!   ③ Advance      occupied vehicles step along their trip (or drop off);
//!                  approaching vehicles step toward their pickup;
//!                  every idle vehicle is then bucketed where it stands
//!   ④ Pickup       FIFO: a request whose source bucket holds an idle
//!                  vehicle is served on the spot
//!   ⑤ Greedy       all bucketed vehicles x all waiting requests, ranked by
//!                  score and committed first-fit; committed vehicles that
//!                  have not moved yet this tick step one hop
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Builds step ⑤ candidates on Rayon's pool.                   |
//! | `fx-hash`  | FxHash for per-car / per-node maps.                         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on records and config.    |

pub mod backlog;
pub mod config;
pub mod controller;
pub mod error;
pub mod scorer;
pub mod vehicle;


pub use backlog::RequestBacklog;
pub use config::{ArrivalAccounting, DispatchConfig};
pub use controller::{Approach, DispatchController, TurnSummary};
pub use error::{DispatchError, DispatchResult, Subject};
pub use scorer::{
    AssignmentScorer, Candidate, CongestionWeighted, DistanceOnly, ScoredCandidate,
    ScoringPolicy, rank_candidates,
};
pub use vehicle::{Request, Vehicle};
