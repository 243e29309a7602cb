//! Items, inventory and effect aggregation.
//!
//! Items are owned by the [`Inventory`]. Toggling an item on adds its id to
//! the active set; only active items contribute to
//! [`resolve_effects`] queries.

mod resolver;

pub use resolver::{has_effect, resolve_effects};

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::StateConflictError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    /// Lab equipment: persistent, usually challenge-facing.
    Instrument,
    /// Reference material: persistent resource bonuses.
    Reference,
    /// Single-run boosts.
    Consumable,
    /// Rare items with several effects.
    Relic,
}

/// What an effect modifies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    Lives,
    Insight,
    ResearchPoints,
    /// Extra ticks on timed challenge stages.
    StageTime,
}

/// How an effect's magnitude is applied.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierType {
    /// Added to gains (or to the stat, for `StageTime`).
    Flat,
    /// Percentage increase of gains, e.g. 20 = +20%.
    Percent,
    /// Subtracted from losses.
    Reduction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemEffect {
    pub target: TargetType,
    pub modifier: ModifierType,
    pub magnitude: i32,
}

impl ItemEffect {
    pub const fn new(target: TargetType, modifier: ModifierType, magnitude: i32) -> Self {
        Self {
            target,
            modifier,
            magnitude,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub effects: Vec<ItemEffect>,
    /// Insight cost in shops.
    pub price: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            effects: Vec::new(),
            price: 0,
        }
    }

    pub fn with_effect(mut self, effect: ItemEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }
}

/// Owned items plus the set of active item ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: BTreeMap<ItemId, Item>,
    active: BTreeSet<ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item (inactive). Fails if the id is already owned.
    pub fn add(&mut self, item: Item) -> Result<(), StateConflictError> {
        if self.items.contains_key(&item.id) {
            return Err(StateConflictError::ItemAlreadyOwned(item.id));
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.active.remove(&id);
        self.items.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_active(&self, id: ItemId) -> bool {
        self.active.contains(&id)
    }

    /// Toggles an owned item. Returns whether the active flag changed.
    pub fn set_active(&mut self, id: ItemId, active: bool) -> Result<bool, StateConflictError> {
        if !self.items.contains_key(&id) {
            return Err(StateConflictError::UnknownItem(id));
        }
        Ok(if active {
            self.active.insert(id)
        } else {
            self.active.remove(&id)
        })
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn active_items(&self) -> impl Iterator<Item = &Item> + Clone {
        self.active.iter().filter_map(|id| self.items.get(id))
    }
}
