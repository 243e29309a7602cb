//! Map generation preset loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{Difficulty, GenerationOptions, NodeType};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_name, read_file};

/// On-disk shape of `generation.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationToml {
    #[serde(default = "GenerationToml::default_difficulty")]
    pub difficulty: String,
    #[serde(default = "GenerationToml::default_node_count")]
    pub node_count: usize,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Fixed seed. Leave unset to let the runtime draw one.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Node type name to sampling weight. Replaces the default table when
    /// present.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

impl GenerationToml {
    fn default_difficulty() -> String {
        Difficulty::default().to_string()
    }

    fn default_node_count() -> usize {
        GenerationOptions::DEFAULT_NODE_COUNT
    }

    pub fn into_options(self) -> LoadResult<GenerationOptions> {
        let difficulty: Difficulty = parse_name("difficulty", &self.difficulty)?;
        let mut options =
            GenerationOptions::new(difficulty, self.node_count, self.seed.unwrap_or_default());
        options.width = self.width;
        options.height = self.height;

        if !self.weights.is_empty() {
            let mut weights = BTreeMap::new();
            for (name, weight) in self.weights {
                let node_type: NodeType = parse_name("node type", &name)?;
                if !node_type.is_sampleable() {
                    anyhow::bail!("{} nodes are placed by the generator and take no weight", name);
                }
                weights.insert(node_type, weight);
            }
            options = options.with_weights(weights);
        }

        Ok(options)
    }
}

/// Loader for map generation presets from TOML files.
pub struct GenerationLoader;

impl GenerationLoader {
    pub fn load(path: &Path) -> LoadResult<GenerationOptions> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GenerationOptions> {
        let raw: GenerationToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse generation TOML: {}", e))?;
        raw.into_options()
    }
}
