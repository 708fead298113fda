use std::fmt;

use fleet_core::{CarId, NodeId, PassengerId};
use fleet_spatial::SpatialError;
use thiserror::Error;

/// Which harness record carried a bad intersection id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Vehicle(CarId),
    Request(PassengerId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Vehicle(car)       => write!(f, "{car}"),
            Subject::Request(passenger) => write!(f, "request of {passenger}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{subject} references {node}, outside 0..{node_count}")]
    OutOfRangeIntersection {
        subject:    Subject,
        node:       NodeId,
        node_count: usize,
    },

    #[error("{0} carries a passenger but has no active route")]
    MissingRoute(CarId),

    #[error("routing failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
