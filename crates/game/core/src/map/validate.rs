//! Topology invariant checks for generated maps.

use std::collections::VecDeque;

use super::errors::TopologyViolation;
use super::types::{GeneratedMap, NodeId};

/// Verifies the map invariants in a fixed order so the first violation
/// reported is stable:
///
/// 1. every edge targets an existing node in a later layer
/// 2. the edge relation is acyclic
/// 3. start has no incoming edge and boss has no outgoing edge
/// 4. every other node has at least one incoming and one outgoing edge
/// 5. every node is reachable from start and can reach boss
pub(crate) fn check_topology(map: &GeneratedMap) -> Result<(), TopologyViolation> {
    if map.is_empty() {
        return Err(TopologyViolation::Empty);
    }

    for edge in map.edges() {
        let (Some(source), Some(target)) = (map.node(edge.source), map.node(edge.target)) else {
            return Err(TopologyViolation::DanglingEdge {
                from: edge.source,
                to: edge.target,
            });
        };
        if source.layer >= target.layer {
            return Err(TopologyViolation::BackwardEdge {
                from: edge.source,
                to: edge.target,
            });
        }
    }

    check_acyclic(map)?;

    let start = map.start_node_id();
    let boss = map.boss_node_id();
    if !map.predecessors(start).is_empty() {
        return Err(TopologyViolation::StartHasIncoming(start));
    }
    if map.successors(boss).next().is_some() {
        return Err(TopologyViolation::BossHasOutgoing(boss));
    }

    for node in map.nodes() {
        if node.id != start && map.predecessors(node.id).is_empty() {
            return Err(TopologyViolation::MissingIncoming(node.id));
        }
        if node.id != boss && node.connections.is_empty() {
            return Err(TopologyViolation::MissingOutgoing(node.id));
        }
    }

    let from_start = map.reachable_from(start);
    let to_boss = map.reaching(boss);
    for node in map.nodes() {
        if !from_start.contains(&node.id) {
            return Err(TopologyViolation::UnreachableFromStart(node.id));
        }
        if !to_boss.contains(&node.id) {
            return Err(TopologyViolation::CannotReachBoss(node.id));
        }
    }

    Ok(())
}

/// Kahn's algorithm; any node left with a non-zero in-degree sits on a cycle.
fn check_acyclic(map: &GeneratedMap) -> Result<(), TopologyViolation> {
    let mut in_degree: Vec<usize> = map
        .nodes()
        .iter()
        .map(|node| map.predecessors(node.id).len())
        .collect();
    let mut queue: VecDeque<NodeId> = map
        .nodes()
        .iter()
        .filter(|node| in_degree[node.id.index()] == 0)
        .map(|node| node.id)
        .collect();

    let mut visited = 0;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        for next in map.successors(id) {
            let degree = &mut in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(next);
            }
        }
    }

    if visited == map.len() {
        return Ok(());
    }
    let stuck = in_degree
        .iter()
        .position(|&degree| degree > 0)
        .map(|index| NodeId(index as u32))
        .unwrap_or_default();
    Err(TopologyViolation::Cycle(stuck))
}
