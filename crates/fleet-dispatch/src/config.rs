//! Dispatcher configuration.
//!
//! Two independent switches select between the congestion-aware and the
//! distance-only variants of the matching policy:
//!
//! | Field     | Default              | Alternatives                  |
//! |-----------|----------------------|-------------------------------|
//! | `scoring` | `CongestionWeighted` | `DistanceOnly`                |
//! | `arrival` | `ByTarget`           | `PerVehicle`, `Disabled`      |

use crate::ScoringPolicy;

/// How congestion is released when a vehicle reaches the end of a road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrivalAccounting {
    /// Never release: congestion counts every traversal ever made.
    Disabled,

    /// Release one occupied road ending at the arrival intersection, chosen
    /// by target alone.  With several occupied roads into the same
    /// intersection the released one may not be the road the vehicle used.
    #[default]
    ByTarget,

    /// Remember the road each vehicle is on and release exactly that road.
    PerVehicle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchConfig {
    /// Ranking used by greedy matching.  Ignored by
    /// [`DispatchController::with_scorer`](crate::DispatchController::with_scorer).
    pub scoring: ScoringPolicy,

    pub arrival: ArrivalAccounting,
}

impl DispatchConfig {
    /// Plain shortest-distance matching with no congestion bookkeeping.
    pub fn distance_only() -> Self {
        Self {
            scoring: ScoringPolicy::DistanceOnly,
            arrival: ArrivalAccounting::Disabled,
        }
    }
}
