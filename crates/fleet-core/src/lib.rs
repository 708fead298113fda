//! `fleet-core`: foundational types shared by every `fleet-*` crate.
//!
//! This crate has no `fleet-*` dependencies and only one required external
//! one (`rand`), plus optional `serde`.
//!
//! # What lives here
//!
//! | Module   | Contents                                          |
//! |----------|---------------------------------------------------|
//! | [`ids`]  | `NodeId`, `EdgeId`, `CarId`, `PassengerId`        |
//! | [`time`] | `Tick`, `SimClock`, `SimConfig`                   |
//! | [`rng`]  | `SimRng` (seeded scenario randomness)             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{CarId, EdgeId, NodeId, PassengerId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
