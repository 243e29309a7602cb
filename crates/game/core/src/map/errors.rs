//! Map generation errors.

use crate::error::{ErrorSeverity, GameError};

use super::options::Difficulty;
use super::types::NodeId;

/// A broken topology invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopologyViolation {
    #[error("map has no nodes")]
    Empty,

    #[error("edge {from} -> {to} points to a missing node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} does not move to a later layer")]
    BackwardEdge { from: NodeId, to: NodeId },

    #[error("cycle detected through {0}")]
    Cycle(NodeId),

    #[error("start {0} has incoming edges")]
    StartHasIncoming(NodeId),

    #[error("boss {0} has outgoing edges")]
    BossHasOutgoing(NodeId),

    #[error("{0} has no incoming edge")]
    MissingIncoming(NodeId),

    #[error("{0} has no outgoing edge")]
    MissingOutgoing(NodeId),

    #[error("{0} is not reachable from the start")]
    UnreachableFromStart(NodeId),

    #[error("{0} cannot reach the boss")]
    CannotReachBoss(NodeId),
}

/// Generation options that cannot produce a valid map.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigurationError {
    #[error("node count {requested} is below the minimum of {minimum} for {difficulty} difficulty")]
    TooFewNodes {
        requested: usize,
        minimum: usize,
        difficulty: Difficulty,
    },

    #[error("every sampleable node weight is zero")]
    AllWeightsZero,

    #[error("canvas dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("map invariants still violated after {passes} repair passes: {violation}")]
    Unsatisfiable {
        passes: usize,
        violation: TopologyViolation,
    },
}

impl GameError for ConfigurationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewNodes { .. } => "CONFIG_TOO_FEW_NODES",
            Self::AllWeightsZero => "CONFIG_ALL_WEIGHTS_ZERO",
            Self::InvalidDimensions { .. } => "CONFIG_INVALID_DIMENSIONS",
            Self::Unsatisfiable { .. } => "CONFIG_UNSATISFIABLE",
        }
    }
}
