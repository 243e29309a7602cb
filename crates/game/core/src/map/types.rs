//! Map data model: nodes, edges and the generated map aggregate.

use std::collections::{BTreeSet, VecDeque};

use super::errors::TopologyViolation;

/// Stable node identifier, assigned in layer order then slot order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The closed set of node kinds a map can contain.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NodeType {
    /// Entry point of the run; always layer 0.
    Start,
    /// Multiple-choice questions.
    Quiz,
    /// Region selection on an image.
    Imaging,
    /// Numeric answers with a tolerance.
    Calculation,
    /// Spend insight on items.
    Shop,
    /// Recover lives.
    Rest,
    /// Final challenge; always the last layer.
    Boss,
}

impl NodeType {
    /// Node kinds that are resolved through the challenge stage machine.
    pub const fn is_challenge(self) -> bool {
        matches!(
            self,
            Self::Quiz | Self::Imaging | Self::Calculation | Self::Boss
        )
    }

    /// Node kinds the generator may draw for interior layers.
    pub const fn is_sampleable(self) -> bool {
        !matches!(self, Self::Start | Self::Boss)
    }
}

/// Per-node traversal status.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Locked,
    Available,
    Active,
    Completed,
}

/// Integer canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Deterministic per-node draw used by content to pick a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioRef(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapNode {
    pub id: NodeId,
    pub node_type: NodeType,
    /// Generation layer; edges always point to a strictly greater layer.
    pub layer: u32,
    pub position: Position,
    /// Outgoing connections.
    pub connections: BTreeSet<NodeId>,
    pub status: NodeStatus,
    /// Difficulty tier for challenge nodes.
    pub difficulty: Option<u8>,
    pub scenario: Option<ScenarioRef>,
}

impl MapNode {
    pub fn new(id: NodeId, node_type: NodeType, layer: u32, position: Position) -> Self {
        Self {
            id,
            node_type,
            layer,
            position,
            connections: BTreeSet::new(),
            status: NodeStatus::Locked,
            difficulty: None,
            scenario: None,
        }
    }

    pub fn out_degree(&self) -> usize {
        self.connections.len()
    }
}

/// Directed edge between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// All nodes and edges of one run.
///
/// Topology is fixed at construction; only node status is mutable, and only
/// from inside the crate (see [`NodeGraph`](crate::graph::NodeGraph)).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedMap {
    seed: u64,
    nodes: Vec<MapNode>,
    edges: Vec<Edge>,
    layers: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
    start: NodeId,
    boss: NodeId,
}

impl GeneratedMap {
    /// Assembles a map from nodes whose ids equal their index.
    ///
    /// Edges and predecessor lists are derived from node connections. The
    /// first node of layer 0 is the start and the first node of the last
    /// layer is the boss.
    pub(crate) fn from_parts(seed: u64, nodes: Vec<MapNode>, layers: Vec<Vec<NodeId>>) -> Self {
        let mut edges = Vec::new();
        let mut predecessors = vec![Vec::new(); nodes.len()];
        for node in &nodes {
            for &target in &node.connections {
                edges.push(Edge {
                    source: node.id,
                    target,
                });
                if let Some(preds) = predecessors.get_mut(target.index()) {
                    preds.push(node.id);
                }
            }
        }
        for preds in &mut predecessors {
            preds.sort_unstable();
        }

        let start = layers
            .first()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default();
        let boss = layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default();

        Self {
            seed,
            nodes,
            edges,
            layers,
            predecessors,
            start,
            boss,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn start_node_id(&self) -> NodeId {
        self.start
    }

    pub fn boss_node_id(&self) -> NodeId {
        self.boss
    }

    pub fn node(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut MapNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> &[NodeId] {
        self.layers.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.connections.iter().copied())
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.node(source)
            .is_some_and(|node| node.connections.contains(&target))
    }

    /// Every node reachable from `origin` by following edges forward,
    /// including `origin` itself.
    pub fn reachable_from(&self, origin: NodeId) -> BTreeSet<NodeId> {
        self.walk(origin, |map, id| map.successors(id).collect())
    }

    /// Every node that can reach `target`, including `target` itself.
    pub fn reaching(&self, target: NodeId) -> BTreeSet<NodeId> {
        self.walk(target, |map, id| map.predecessors(id).to_vec())
    }

    fn walk<F>(&self, origin: NodeId, next: F) -> BTreeSet<NodeId>
    where
        F: Fn(&Self, NodeId) -> Vec<NodeId>,
    {
        let mut seen = BTreeSet::new();
        if self.node(origin).is_none() {
            return seen;
        }
        let mut queue = VecDeque::from([origin]);
        seen.insert(origin);
        while let Some(id) = queue.pop_front() {
            for neighbour in next(self, id) {
                if seen.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        seen
    }

    /// Checks every topology invariant of a finished map.
    pub fn validate(&self) -> Result<(), TopologyViolation> {
        super::validate::check_topology(self)
    }
}
