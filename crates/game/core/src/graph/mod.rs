//! Traversal state over a generated map.
//!
//! [`NodeGraph`] owns the [`GeneratedMap`] for a run and is the only writer
//! of node status. Rules:
//!
//! - a node is available iff every direct predecessor is completed
//! - the start node is available from the beginning
//! - at most one node is active at any time
//! - completion re-evaluates only the completed node's direct successors
//! - a failed node is retried or sealed according to [`NodePolicies`]

mod errors;
mod policy;

pub use errors::StateConflictError;
pub use policy::{NodePolicies, NodePolicy};

use std::collections::BTreeSet;

use crate::map::{GeneratedMap, NodeId, NodeStatus, NodeType};

/// Result of [`NodeGraph::complete_node`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeCompletion {
    pub node: NodeId,
    /// Status the node ended in.
    pub status: NodeStatus,
    /// True when a failure sealed the node for the rest of the run.
    pub sealed: bool,
    /// Successors that became available.
    pub unlocked: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGraph {
    map: GeneratedMap,
    policies: NodePolicies,
    active: Option<NodeId>,
    sealed: BTreeSet<NodeId>,
}

impl NodeGraph {
    /// Wraps a freshly generated map. Every node is locked except the start.
    pub fn new(mut map: GeneratedMap, policies: NodePolicies) -> Self {
        let start = map.start_node_id();
        let ids: Vec<NodeId> = map.nodes().iter().map(|node| node.id).collect();
        for id in ids {
            if let Some(node) = map.node_mut(id) {
                node.status = if id == start {
                    NodeStatus::Available
                } else {
                    NodeStatus::Locked
                };
            }
        }

        Self {
            map,
            policies,
            active: None,
            sealed: BTreeSet::new(),
        }
    }

    pub fn map(&self) -> &GeneratedMap {
        &self.map
    }

    pub fn policies(&self) -> &NodePolicies {
        &self.policies
    }

    pub fn status(&self, id: NodeId) -> Option<NodeStatus> {
        self.map.node(id).map(|node| node.status)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.map.node(id).map(|node| node.node_type)
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active
    }

    pub fn is_sealed(&self, id: NodeId) -> bool {
        self.sealed.contains(&id)
    }

    /// True when any node has been sealed. Every node precedes the boss,
    /// so the boss can no longer be reached.
    pub fn has_sealed_nodes(&self) -> bool {
        !self.sealed.is_empty()
    }

    pub fn available_nodes(&self) -> Vec<NodeId> {
        self.nodes_with(NodeStatus::Available)
    }

    pub fn completed_nodes(&self) -> Vec<NodeId> {
        self.nodes_with(NodeStatus::Completed)
    }

    fn nodes_with(&self, status: NodeStatus) -> Vec<NodeId> {
        self.map
            .nodes()
            .iter()
            .filter(|node| node.status == status)
            .map(|node| node.id)
            .collect()
    }

    /// True once the boss is completed.
    pub fn is_cleared(&self) -> bool {
        self.status(self.map.boss_node_id()) == Some(NodeStatus::Completed)
    }

    /// True when every direct predecessor of `id` is completed.
    pub fn predecessors_completed(&self, id: NodeId) -> bool {
        self.map
            .predecessors(id)
            .iter()
            .all(|&pred| self.status(pred) == Some(NodeStatus::Completed))
    }

    /// available → active.
    pub fn select_node(&mut self, id: NodeId) -> Result<(), StateConflictError> {
        let status = self.status(id).ok_or(StateConflictError::UnknownNode(id))?;

        if let Some(active) = self.active {
            return Err(if active == id {
                StateConflictError::NodeAlreadyActive(id)
            } else {
                StateConflictError::AnotherNodeActive {
                    requested: id,
                    active,
                }
            });
        }

        match status {
            NodeStatus::Available => {}
            NodeStatus::Locked if self.is_sealed(id) => {
                return Err(StateConflictError::NodeSealed(id));
            }
            NodeStatus::Locked => return Err(StateConflictError::NodeLocked(id)),
            NodeStatus::Completed => return Err(StateConflictError::NodeCompleted(id)),
            NodeStatus::Active => return Err(StateConflictError::NodeAlreadyActive(id)),
        }

        self.set_status(id, NodeStatus::Active);
        self.active = Some(id);
        Ok(())
    }

    /// active → completed on success; on failure back to available, or
    /// sealed when the node type is not retryable.
    pub fn complete_node(
        &mut self,
        id: NodeId,
        success: bool,
    ) -> Result<NodeCompletion, StateConflictError> {
        let node_type = self.ensure_active(id)?;
        self.active = None;

        if success {
            self.set_status(id, NodeStatus::Completed);
            let unlocked = self.refresh_successors(id);
            return Ok(NodeCompletion {
                node: id,
                status: NodeStatus::Completed,
                sealed: false,
                unlocked,
            });
        }

        let sealed = !self.policies.is_retryable(node_type);
        let status = if sealed {
            self.sealed.insert(id);
            NodeStatus::Locked
        } else {
            NodeStatus::Available
        };
        self.set_status(id, status);

        Ok(NodeCompletion {
            node: id,
            status,
            sealed,
            unlocked: Vec::new(),
        })
    }

    /// active → available. Never completes the node.
    pub fn cancel(&mut self, id: NodeId) -> Result<(), StateConflictError> {
        self.ensure_active(id)?;
        self.active = None;
        self.set_status(id, NodeStatus::Available);
        Ok(())
    }

    fn ensure_active(&self, id: NodeId) -> Result<NodeType, StateConflictError> {
        let node = self.map.node(id).ok_or(StateConflictError::UnknownNode(id))?;
        if self.active != Some(id) || node.status != NodeStatus::Active {
            return Err(StateConflictError::NodeNotActive(id));
        }
        Ok(node.node_type)
    }

    /// Unlocks direct successors whose predecessors are now all completed.
    fn refresh_successors(&mut self, id: NodeId) -> Vec<NodeId> {
        let successors: Vec<NodeId> = self.map.successors(id).collect();
        let mut unlocked = Vec::new();
        for next in successors {
            if self.status(next) == Some(NodeStatus::Locked)
                && !self.is_sealed(next)
                && self.predecessors_completed(next)
            {
                self.set_status(next, NodeStatus::Available);
                unlocked.push(next);
            }
        }
        unlocked
    }

    fn set_status(&mut self, id: NodeId, status: NodeStatus) {
        if let Some(node) = self.map.node_mut(id) {
            node.status = status;
        }
    }
}
