//! Spatial-subsystem error type.

use thiserror::Error;

use fleet_core::NodeId;

/// Errors produced by `fleet-spatial`.
///
/// "No route between two valid nodes" is deliberately absent: it is an
/// ordinary outcome represented by [`RouteCursor::unreachable`](crate::RouteCursor::unreachable).
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("road {from} -> {to} references a node outside 0..{node_count}")]
    InvalidEdge {
        from:       NodeId,
        to:         NodeId,
        node_count: usize,
    },

    #[error("route steps {from} -> {to} but the network has no such road")]
    RouteInconsistency { from: NodeId, to: NodeId },

    #[error("route has no hop left to advance")]
    RouteExhausted,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
