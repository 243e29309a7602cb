//! Layered, seeded map generation.
//!
//! Pipeline:
//! 1. check options (dimensions, minimum node count, weights)
//! 2. partition interior nodes across layers
//! 3. place nodes and draw their types
//! 4. connect each layer to the next with bounded out-degree
//! 5. repair nodes missing an incoming or outgoing edge
//! 6. validate the finished map
//!
//! Every random draw comes from a [`SeededStream`] keyed by the options'
//! seed, so identical options produce identical maps.

use crate::config::GameConfig;
use crate::rng::{SeededStream, compute_seed};

use super::errors::{ConfigurationError, TopologyViolation};
use super::options::GenerationOptions;
use super::types::{GeneratedMap, MapNode, NodeId, NodeType, Position, ScenarioRef};

const LAYOUT_STREAM: u32 = 1;
const TYPE_STREAM: u32 = 2;
const EDGE_STREAM: u32 = 3;
const SCENARIO_STREAM: u32 = 4;

/// Generates a map from options, or explains why the options are unusable.
pub fn generate_map(options: &GenerationOptions) -> Result<GeneratedMap, ConfigurationError> {
    MapGenerator::new(options).generate()
}

/// Stateful generator for one map. Use [`generate_map`] unless you need a
/// custom repair bound.
pub struct MapGenerator<'a> {
    options: &'a GenerationOptions,
    max_repair_passes: usize,
    layout: SeededStream,
    types: SeededStream,
    edges: SeededStream,
}

impl<'a> MapGenerator<'a> {
    pub fn new(options: &'a GenerationOptions) -> Self {
        Self {
            options,
            max_repair_passes: GameConfig::MAX_REPAIR_PASSES,
            layout: SeededStream::new(options.seed, LAYOUT_STREAM),
            types: SeededStream::new(options.seed, TYPE_STREAM),
            edges: SeededStream::new(options.seed, EDGE_STREAM),
        }
    }

    pub fn with_max_repair_passes(mut self, passes: usize) -> Self {
        self.max_repair_passes = passes;
        self
    }

    pub fn generate(mut self) -> Result<GeneratedMap, ConfigurationError> {
        let table = self.check_options()?;

        let sizes = self.partition_layers();
        let (mut nodes, layers) = self.place_nodes(&sizes, &table);
        self.connect_layers(&mut nodes, &layers);
        repair_connectivity(&mut nodes, &layers, self.max_repair_passes)?;

        let map = GeneratedMap::from_parts(self.options.seed, nodes, layers);
        map.validate()
            .map_err(|violation| ConfigurationError::Unsatisfiable {
                passes: self.max_repair_passes,
                violation,
            })?;
        Ok(map)
    }

    fn check_options(&self) -> Result<Vec<(NodeType, u32)>, ConfigurationError> {
        let (width, height) = self.options.canvas();
        if width == 0 || height == 0 {
            return Err(ConfigurationError::InvalidDimensions { width, height });
        }

        let difficulty = self.options.difficulty;
        let minimum = difficulty.min_node_count();
        if self.options.node_count < minimum {
            return Err(ConfigurationError::TooFewNodes {
                requested: self.options.node_count,
                minimum,
                difficulty,
            });
        }

        let table = self.options.sampling_table();
        if table.iter().all(|&(_, weight)| weight == 0) {
            return Err(ConfigurationError::AllWeightsZero);
        }
        Ok(table)
    }

    /// Layer sizes including the single-node start and boss layers.
    ///
    /// Interior nodes are spread evenly; the remainder goes to randomly chosen
    /// layers so adjacent layers differ by at most one node.
    fn partition_layers(&mut self) -> Vec<usize> {
        let interior = self.options.difficulty.interior_layers();
        let interior_nodes = self.options.node_count - 2;
        let base = interior_nodes / interior;
        let remainder = interior_nodes % interior;

        let mut order: Vec<usize> = (0..interior).collect();
        self.layout.shuffle(&mut order);

        let mut sizes = vec![base; interior];
        for &layer in order.iter().take(remainder) {
            sizes[layer] += 1;
        }

        let mut all = Vec::with_capacity(interior + 2);
        all.push(1);
        all.extend(sizes);
        all.push(1);
        all
    }

    fn place_nodes(
        &mut self,
        sizes: &[usize],
        table: &[(NodeType, u32)],
    ) -> (Vec<MapNode>, Vec<Vec<NodeId>>) {
        let weights: Vec<u32> = table.iter().map(|&(_, weight)| weight).collect();
        let last_layer = sizes.len() - 1;

        let mut nodes = Vec::with_capacity(self.options.node_count);
        let mut layers = Vec::with_capacity(sizes.len());

        for (layer, &size) in sizes.iter().enumerate() {
            let mut ids = Vec::with_capacity(size);
            for slot in 0..size {
                let id = NodeId(nodes.len() as u32);
                let node_type = if layer == 0 {
                    NodeType::Start
                } else if layer == last_layer {
                    NodeType::Boss
                } else {
                    // check_options guarantees a non-zero weight exists
                    let index = self.types.weighted_index(&weights).unwrap_or(0);
                    table[index].0
                };

                let position = self.position(layer, sizes.len(), slot, size);
                let mut node = MapNode::new(id, node_type, layer as u32, position);
                if node_type.is_challenge() {
                    node.difficulty = Some(self.tier(layer, last_layer, node_type));
                    node.scenario = Some(ScenarioRef(compute_seed(
                        self.options.seed,
                        id.0 as u64,
                        SCENARIO_STREAM,
                        node_type as u32,
                    )));
                }

                ids.push(id);
                nodes.push(node);
            }
            layers.push(ids);
        }

        (nodes, layers)
    }

    fn position(&mut self, layer: usize, layer_count: usize, slot: usize, size: usize) -> Position {
        let (width, height) = self.options.canvas();
        let margin = width as i64 / 10;
        let span = (width as i64 - 2 * margin).max(0);
        let x = margin + span * layer as i64 / (layer_count as i64 - 1).max(1);

        let spacing = height as i64 / (size as i64 + 1);
        let jitter = (spacing / 4) as u32;
        let offset = self.layout.range(0, jitter * 2) as i64 - jitter as i64;
        let y = spacing * (slot as i64 + 1) + offset;

        Position::new(x as i32, y as i32)
    }

    fn tier(&self, layer: usize, last_layer: usize, node_type: NodeType) -> u8 {
        if node_type == NodeType::Boss {
            return GameConfig::MAX_DIFFICULTY_TIER;
        }
        let depth = (layer * 3 / last_layer.max(1)) as u8;
        (1 + depth + self.options.difficulty.tier_offset()).min(GameConfig::MAX_DIFFICULTY_TIER)
    }

    /// Initial edge placement.
    ///
    /// Start fans out to the whole first interior layer and the whole last
    /// interior layer feeds the boss. Interior nodes draw an out-degree in
    /// `[MIN_OUT_DEGREE, MAX_OUT_DEGREE]` and connect to the nearest slots of
    /// the next layer.
    fn connect_layers(&mut self, nodes: &mut [MapNode], layers: &[Vec<NodeId>]) {
        for (index, pair) in layers.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);

            if index == 0 {
                nodes[current[0].index()].connections.extend(next.iter().copied());
                continue;
            }

            let max_degree = GameConfig::MAX_OUT_DEGREE.min(next.len()) as u32;
            for (slot, &id) in current.iter().enumerate() {
                let degree = self
                    .edges
                    .range(GameConfig::MIN_OUT_DEGREE as u32, max_degree)
                    as usize;
                let anchor = scaled_slot(slot, current.len(), next.len());
                let targets = nearest_slots(next, anchor).into_iter().take(degree);
                nodes[id.index()].connections.extend(targets);
            }
        }
    }
}

/// Adds minimal edges until every non-start node has an incoming edge and
/// every non-boss node has an outgoing edge.
///
/// Missing incoming edges come from the nearest earlier layer that still has
/// out-degree headroom (start is exempt from the bound); missing outgoing
/// edges go to the nearest later layer. Returns the number of edges added, or
/// [`ConfigurationError::Unsatisfiable`] if violations remain after
/// `max_passes` passes.
pub(crate) fn repair_connectivity(
    nodes: &mut [MapNode],
    layers: &[Vec<NodeId>],
    max_passes: usize,
) -> Result<usize, ConfigurationError> {
    let mut added = 0;

    for _ in 0..max_passes {
        let (missing_in, missing_out) = connectivity_gaps(nodes, layers);
        if missing_in.is_empty() && missing_out.is_empty() {
            return Ok(added);
        }

        for id in missing_in {
            if let Some(source) = nearest_source(nodes, layers, id) {
                nodes[source.index()].connections.insert(id);
                added += 1;
            }
        }
        for id in missing_out {
            if let Some(target) = nearest_target(nodes, layers, id) {
                nodes[id.index()].connections.insert(target);
                added += 1;
            }
        }
    }

    let (missing_in, missing_out) = connectivity_gaps(nodes, layers);
    if let Some(&id) = missing_in.first() {
        return Err(ConfigurationError::Unsatisfiable {
            passes: max_passes,
            violation: TopologyViolation::MissingIncoming(id),
        });
    }
    if let Some(&id) = missing_out.first() {
        return Err(ConfigurationError::Unsatisfiable {
            passes: max_passes,
            violation: TopologyViolation::MissingOutgoing(id),
        });
    }
    Ok(added)
}

fn connectivity_gaps(nodes: &[MapNode], layers: &[Vec<NodeId>]) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut incoming = vec![0usize; nodes.len()];
    for node in nodes {
        for target in &node.connections {
            if let Some(count) = incoming.get_mut(target.index()) {
                *count += 1;
            }
        }
    }

    let last_layer = layers.len().saturating_sub(1) as u32;
    let missing_in = nodes
        .iter()
        .filter(|node| node.layer > 0 && incoming[node.id.index()] == 0)
        .map(|node| node.id)
        .collect();
    let missing_out = nodes
        .iter()
        .filter(|node| node.layer < last_layer && node.connections.is_empty())
        .map(|node| node.id)
        .collect();
    (missing_in, missing_out)
}

fn nearest_source(nodes: &[MapNode], layers: &[Vec<NodeId>], id: NodeId) -> Option<NodeId> {
    let node = &nodes[id.index()];
    let own_layer = &layers[node.layer as usize];
    let slot = slot_of(own_layer, id);

    (0..node.layer as usize).rev().find_map(|layer| {
        let candidates = &layers[layer];
        let anchor = scaled_slot(slot, own_layer.len(), candidates.len());
        nearest_slots(candidates, anchor).into_iter().find(|candidate| {
            let source = &nodes[candidate.index()];
            source.layer == 0 || source.out_degree() < GameConfig::MAX_OUT_DEGREE
        })
    })
}

fn nearest_target(nodes: &[MapNode], layers: &[Vec<NodeId>], id: NodeId) -> Option<NodeId> {
    let node = &nodes[id.index()];
    let own_layer = &layers[node.layer as usize];
    let slot = slot_of(own_layer, id);

    (node.layer as usize + 1..layers.len()).find_map(|layer| {
        let candidates = &layers[layer];
        let anchor = scaled_slot(slot, own_layer.len(), candidates.len());
        nearest_slots(candidates, anchor).into_iter().next()
    })
}

fn slot_of(layer: &[NodeId], id: NodeId) -> usize {
    layer.iter().position(|&other| other == id).unwrap_or(0)
}

/// Maps a slot in a layer of `from` nodes onto a layer of `to` nodes.
fn scaled_slot(slot: usize, from: usize, to: usize) -> usize {
    if from <= 1 || to <= 1 {
        return 0;
    }
    (slot * (to - 1) + (from - 1) / 2) / (from - 1)
}

/// Layer members ordered by distance from `anchor`, lower slot first on ties.
fn nearest_slots(layer: &[NodeId], anchor: usize) -> Vec<NodeId> {
    let mut ordered: Vec<(usize, NodeId)> = layer
        .iter()
        .enumerate()
        .map(|(slot, &id)| (slot.abs_diff(anchor), id))
        .collect();
    ordered.sort();
    ordered.into_iter().map(|(_, id)| id).collect()
}
