//! Map generation options.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::types::NodeType;

/// Run difficulty. Scales the number of interior layers and node tiers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Layers between the start layer and the boss layer.
    pub const fn interior_layers(self) -> usize {
        match self {
            Self::Easy => 4,
            Self::Normal => 5,
            Self::Hard => 6,
        }
    }

    /// Added to every challenge node's depth-based tier.
    pub const fn tier_offset(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }

    /// Smallest node count that fills start, boss and one node per interior layer.
    pub const fn min_node_count(self) -> usize {
        self.interior_layers() + 2
    }
}

/// Everything the generator needs to build one map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationOptions {
    pub difficulty: Difficulty,
    /// Total nodes including start and boss.
    pub node_count: usize,
    /// Canvas width used for node positions.
    pub width: Option<u32>,
    /// Canvas height used for node positions.
    pub height: Option<u32>,
    /// Sampling weight per node type. `Start` and `Boss` entries are ignored.
    pub weights: BTreeMap<NodeType, u32>,
    pub seed: u64,
}

impl GenerationOptions {
    pub const DEFAULT_NODE_COUNT: usize = 15;
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;

    pub fn new(difficulty: Difficulty, node_count: usize, seed: u64) -> Self {
        Self {
            difficulty,
            node_count,
            width: None,
            height: None,
            weights: default_weights(),
            seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_weight(mut self, node_type: NodeType, weight: u32) -> Self {
        self.weights.insert(node_type, weight);
        self
    }

    pub fn with_weights(mut self, weights: BTreeMap<NodeType, u32>) -> Self {
        self.weights = weights;
        self
    }

    /// Resolved `(width, height)` of the canvas.
    pub fn canvas(&self) -> (u32, u32) {
        (
            self.width.unwrap_or(Self::DEFAULT_WIDTH),
            self.height.unwrap_or(Self::DEFAULT_HEIGHT),
        )
    }

    /// Sampleable node types paired with their weights, in a fixed order.
    pub fn sampling_table(&self) -> Vec<(NodeType, u32)> {
        NodeType::iter()
            .filter(|node_type| node_type.is_sampleable())
            .map(|node_type| {
                let weight = self.weights.get(&node_type).copied().unwrap_or(0);
                (node_type, weight)
            })
            .collect()
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(Difficulty::default(), Self::DEFAULT_NODE_COUNT, 0)
    }
}

/// Default sampling weights for interior layers.
pub fn default_weights() -> BTreeMap<NodeType, u32> {
    BTreeMap::from([
        (NodeType::Quiz, 30),
        (NodeType::Imaging, 20),
        (NodeType::Calculation, 20),
        (NodeType::Shop, 10),
        (NodeType::Rest, 10),
    ])
}
