//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, GenerationOptions, Item};

use crate::bank::ScenarioBank;
use crate::loaders::{ConfigLoader, GenerationLoader, ItemLoader, LoadResult, ScenarioLoader};

/// Content factory that loads all run content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── generation.toml
/// ├── items.ron
/// └── scenarios.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the map generation preset from `generation.toml`.
    pub fn load_generation(&self) -> LoadResult<GenerationOptions> {
        GenerationLoader::load(&self.data_dir.join("generation.toml"))
    }

    /// Load the shop catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<Item>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load the scenario bank from `scenarios.ron`.
    pub fn load_scenarios(&self) -> LoadResult<ScenarioBank> {
        ScenarioLoader::load(&self.data_dir.join("scenarios.ron"))
    }
}
