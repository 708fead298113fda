//! Harness-facing records.
//!
//! Both types are plain `Copy` values.  The controller mutates vehicles in
//! place through a `&mut [Vehicle]` and never keeps references into the
//! slice between calls; per-tick bookkeeping refers to vehicles by slice
//! index and, across ticks, by `CarId`.

use fleet_core::{CarId, NodeId, PassengerId};

/// One vehicle on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    pub car_id: CarId,

    /// The vehicle's next target intersection for this tick, not necessarily
    /// the one it currently occupies.
    pub intersection_id: NodeId,

    /// `None` marks the vehicle idle and available for matching.
    pub passenger_id: Option<PassengerId>,
}

impl Vehicle {
    /// An idle vehicle at `at`.
    pub fn idle(car_id: CarId, at: NodeId) -> Self {
        Self { car_id, intersection_id: at, passenger_id: None }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.passenger_id.is_none()
    }
}

/// A ride request as issued by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub passenger_id:        PassengerId,
    pub src_intersection_id: NodeId,
    pub dst_intersection_id: NodeId,
}

impl Request {
    pub fn new(passenger_id: PassengerId, src: NodeId, dst: NodeId) -> Self {
        Self { passenger_id, src_intersection_id: src, dst_intersection_id: dst }
    }
}
