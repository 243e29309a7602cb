//! Node-level transitions: selection, encounters, cancellation.

use crate::challenge::ChallengeOutcome;
use crate::graph::StateConflictError;
use crate::ledger::{DeltaResult, ResourceKind};
use crate::map::{NodeId, NodeType};
use crate::run::RunState;

use super::errors::RunError;
use super::events::{Cancel, NodeResolution, ResolveEncounter, RunOutcome, SelectNode};
use super::transition::EventTransition;

pub(super) fn active_node(state: &RunState) -> Result<(NodeId, NodeType), RunError> {
    let node = state
        .graph
        .active_node()
        .ok_or(StateConflictError::NoActiveNode)?;
    let node_type = state
        .graph
        .node_type(node)
        .ok_or(StateConflictError::UnknownNode(node))?;
    Ok((node, node_type))
}

/// Completes `node` and settles its rewards or penalty.
pub(super) fn resolve_node(
    state: &mut RunState,
    node: NodeId,
    success: bool,
    outcome: Option<ChallengeOutcome>,
    mut deltas: Vec<DeltaResult>,
) -> Result<NodeResolution, RunError> {
    let completion = state.graph.complete_node(node, success)?;
    let items = state.inventory.active_items();

    match outcome {
        Some(outcome) if outcome.success => {
            let reward = state.config.rewards.for_grade(outcome.grade);
            deltas.push(state.ledger.apply_modified_delta(
                ResourceKind::Insight,
                i64::from(reward.insight),
                items.clone(),
            ));
            deltas.push(state.ledger.apply_modified_delta(
                ResourceKind::ResearchPoints,
                reward.research_points,
                items,
            ));
        }
        Some(_) => {
            deltas.push(state.ledger.apply_modified_delta(
                ResourceKind::Lives,
                -i64::from(state.config.failure_penalty),
                items,
            ));
        }
        None => {}
    }

    state.game_over = state.ledger.is_game_over();
    if completion.sealed {
        state.defeated = true;
    }
    Ok(NodeResolution {
        completion,
        outcome,
        deltas,
        game_over: state.game_over,
        defeated: state.defeated,
    })
}

impl EventTransition for SelectNode {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        state.graph.select_node(self.node)?;
        let node_type = state
            .graph
            .node_type(self.node)
            .ok_or(StateConflictError::UnknownNode(self.node))?;
        Ok(RunOutcome::NodeSelected {
            node: self.node,
            node_type,
        })
    }
}

impl EventTransition for ResolveEncounter {
    fn pre_validate(&self, state: &RunState) -> Result<(), RunError> {
        let (node, node_type) = active_node(state)?;
        if node_type.is_challenge() {
            return Err(StateConflictError::ChallengeRequired { node, node_type }.into());
        }
        Ok(())
    }

    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let (node, node_type) = active_node(state)?;
        let mut deltas = Vec::new();
        if node_type == NodeType::Rest {
            deltas.push(state.ledger.apply_modified_delta(
                ResourceKind::Lives,
                i64::from(state.config.rest_heal),
                state.inventory.active_items(),
            ));
        }
        let resolution = resolve_node(state, node, true, None, deltas)?;
        Ok(RunOutcome::NodeResolved(resolution))
    }
}

impl EventTransition for Cancel {
    fn pre_validate(&self, state: &RunState) -> Result<(), RunError> {
        active_node(state).map(|_| ())
    }

    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let (node, _) = active_node(state)?;
        state.challenge = None;
        state.graph.cancel(node)?;
        Ok(RunOutcome::Cancelled { node })
    }
}
