//! Item catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use game_core::{Item, ItemCategory, ItemEffect, ItemId, ModifierType, TargetType};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_name, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemRon>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRon {
    pub id: u32,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub effects: Vec<EffectRon>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectRon {
    pub target: String,
    pub modifier: String,
    pub magnitude: i32,
}

impl ItemRon {
    pub fn into_item(self) -> LoadResult<Item> {
        let category: ItemCategory = parse_name("item category", &self.category)?;
        let mut item = Item::new(ItemId(self.id), self.name, category).with_price(self.price);
        for effect in self.effects {
            let target: TargetType = parse_name("effect target", &effect.target)?;
            let modifier: ModifierType = parse_name("effect modifier", &effect.modifier)?;
            item = item.with_effect(ItemEffect::new(target, modifier, effect.magnitude));
        }
        Ok(item)
    }
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing ItemCatalog
    pub fn load(path: &Path) -> LoadResult<Vec<Item>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a catalog. Item ids must be unique.
    pub fn parse(content: &str) -> LoadResult<Vec<Item>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        let mut items = Vec::with_capacity(catalog.items.len());
        for entry in catalog.items {
            if !seen.insert(entry.id) {
                anyhow::bail!("Duplicate item id {}", entry.id);
            }
            let name = entry.name.clone();
            let item = entry
                .into_item()
                .map_err(|e| anyhow::anyhow!("Invalid item '{}': {}", name, e))?;
            items.push(item);
        }

        tracing::debug!(count = items.len(), "loaded item catalog");
        Ok(items)
    }
}
