//! Illegal transition errors.

use crate::error::{ErrorSeverity, GameError};
use crate::items::ItemId;
use crate::map::{NodeId, NodeType};

/// A request that is well-formed but illegal in the current state.
///
/// Raising one of these never mutates anything; the caller keeps the prior
/// state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateConflictError {
    #[error("{0} does not exist on this map")]
    UnknownNode(NodeId),

    #[error("{0} is locked")]
    NodeLocked(NodeId),

    #[error("{0} failed and cannot be retried")]
    NodeSealed(NodeId),

    #[error("{0} is already completed")]
    NodeCompleted(NodeId),

    #[error("{0} is already active")]
    NodeAlreadyActive(NodeId),

    #[error("cannot activate {requested} while {active} is active")]
    AnotherNodeActive { requested: NodeId, active: NodeId },

    #[error("{0} is not active")]
    NodeNotActive(NodeId),

    #[error("no node is active")]
    NoActiveNode,

    #[error("no challenge is running")]
    NoActiveChallenge,

    #[error("a challenge is already running on {0}")]
    ChallengeAlreadyActive(NodeId),

    #[error("{node} is a {node_type} node and must be resolved through a challenge")]
    ChallengeRequired { node: NodeId, node_type: NodeType },

    #[error("{node} is a {node_type} node and has no challenge")]
    NoChallengeForNode { node: NodeId, node_type: NodeType },

    #[error("items can only be bought while a shop node is active")]
    NotInShop,

    #[error("cannot spend {cost} insight with only {available} available")]
    InsufficientInsight { cost: u32, available: u32 },

    #[error("{0} is not in the inventory")]
    UnknownItem(ItemId),

    #[error("{0} is already owned")]
    ItemAlreadyOwned(ItemId),

    #[error("the run is over")]
    RunOver,
}

impl GameError for StateConflictError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownNode(_) => "CONFLICT_UNKNOWN_NODE",
            Self::NodeLocked(_) => "CONFLICT_NODE_LOCKED",
            Self::NodeSealed(_) => "CONFLICT_NODE_SEALED",
            Self::NodeCompleted(_) => "CONFLICT_NODE_COMPLETED",
            Self::NodeAlreadyActive(_) => "CONFLICT_NODE_ALREADY_ACTIVE",
            Self::AnotherNodeActive { .. } => "CONFLICT_ANOTHER_NODE_ACTIVE",
            Self::NodeNotActive(_) => "CONFLICT_NODE_NOT_ACTIVE",
            Self::NoActiveNode => "CONFLICT_NO_ACTIVE_NODE",
            Self::NoActiveChallenge => "CONFLICT_NO_ACTIVE_CHALLENGE",
            Self::ChallengeAlreadyActive(_) => "CONFLICT_CHALLENGE_ALREADY_ACTIVE",
            Self::ChallengeRequired { .. } => "CONFLICT_CHALLENGE_REQUIRED",
            Self::NoChallengeForNode { .. } => "CONFLICT_NO_CHALLENGE_FOR_NODE",
            Self::NotInShop => "CONFLICT_NOT_IN_SHOP",
            Self::InsufficientInsight { .. } => "CONFLICT_INSUFFICIENT_INSIGHT",
            Self::UnknownItem(_) => "CONFLICT_UNKNOWN_ITEM",
            Self::ItemAlreadyOwned(_) => "CONFLICT_ITEM_ALREADY_OWNED",
            Self::RunOver => "CONFLICT_RUN_OVER",
        }
    }
}
