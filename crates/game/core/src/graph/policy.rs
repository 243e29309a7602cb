//! Per-node-type traversal policy.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::map::NodeType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePolicy {
    /// A failed node returns to available when true; otherwise it stays
    /// locked for the rest of the run.
    pub retryable: bool,
}

impl NodePolicy {
    pub const RETRYABLE: Self = Self { retryable: true };
    pub const SINGLE_ATTEMPT: Self = Self { retryable: false };
}

/// Policy table covering every [`NodeType`].
///
/// Defaults: every node type is retryable except [`NodeType::Boss`], which
/// gets a single attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePolicies {
    policies: BTreeMap<NodeType, NodePolicy>,
}

impl NodePolicies {
    /// Every node type retryable.
    pub fn all_retryable() -> Self {
        Self {
            policies: NodeType::iter()
                .map(|node_type| (node_type, NodePolicy::RETRYABLE))
                .collect(),
        }
    }

    pub fn with(mut self, node_type: NodeType, policy: NodePolicy) -> Self {
        self.policies.insert(node_type, policy);
        self
    }

    pub fn set(&mut self, node_type: NodeType, policy: NodePolicy) {
        self.policies.insert(node_type, policy);
    }

    /// Missing entries fall back to retryable.
    pub fn policy(&self, node_type: NodeType) -> NodePolicy {
        self.policies
            .get(&node_type)
            .copied()
            .unwrap_or(NodePolicy::RETRYABLE)
    }

    pub fn is_retryable(&self, node_type: NodeType) -> bool {
        self.policy(node_type).retryable
    }
}

impl Default for NodePolicies {
    fn default() -> Self {
        Self::all_retryable().with(NodeType::Boss, NodePolicy::SINGLE_ATTEMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_node_type() {
        let policies = NodePolicies::default();
        for node_type in NodeType::iter() {
            assert_eq!(
                policies.is_retryable(node_type),
                node_type != NodeType::Boss,
                "{node_type}"
            );
        }
    }

    #[test]
    fn overrides_apply_per_type() {
        let policies = NodePolicies::all_retryable().with(NodeType::Quiz, NodePolicy::SINGLE_ATTEMPT);
        assert!(!policies.is_retryable(NodeType::Quiz));
        assert!(policies.is_retryable(NodeType::Boss));
    }
}
