//! Run resources: lives, insight and research points.
//!
//! All mutation goes through [`ResourceLedger::apply_delta`] (or its
//! item-aware sibling). Lives and insight never drop below zero and lives
//! never exceed `max_lives`. Running out of lives is reported through
//! [`DeltaResult::game_over`], not as an error.

mod modifier;

pub use modifier::DeltaModifier;

use crate::config::GameConfig;
use crate::graph::StateConflictError;
use crate::items::{Item, TargetType};

#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum ResourceKind {
    Lives,
    Insight,
    ResearchPoints,
}

impl ResourceKind {
    /// Item effect target that modifies this resource.
    pub const fn target(self) -> TargetType {
        match self {
            Self::Lives => TargetType::Lives,
            Self::Insight => TargetType::Insight,
            Self::ResearchPoints => TargetType::ResearchPoints,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaResult {
    pub kind: ResourceKind,
    /// Delta after item modifiers, before clamping.
    pub requested: i64,
    /// Change that actually landed.
    pub applied: i64,
    /// Resource value afterwards.
    pub value: i64,
    pub game_over: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLedger {
    lives: u32,
    max_lives: u32,
    insight: u32,
    /// No floor.
    research_points: i64,
}

impl ResourceLedger {
    pub fn new(lives: u32, max_lives: u32, insight: u32) -> Self {
        Self {
            lives: lives.min(max_lives),
            max_lives,
            insight,
            research_points: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut ledger = Self::new(
            config.starting_lives,
            config.max_lives,
            config.starting_insight,
        );
        ledger.research_points = config.starting_research_points;
        ledger
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn insight(&self) -> u32 {
        self.insight
    }

    pub fn research_points(&self) -> i64 {
        self.research_points
    }

    pub fn value(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Lives => i64::from(self.lives),
            ResourceKind::Insight => i64::from(self.insight),
            ResourceKind::ResearchPoints => self.research_points,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Applies a raw delta with clamping.
    pub fn apply_delta(&mut self, kind: ResourceKind, amount: i64) -> DeltaResult {
        let before = self.value(kind);
        match kind {
            ResourceKind::Lives => {
                self.lives = clamp_u32(before.saturating_add(amount), self.max_lives);
            }
            ResourceKind::Insight => {
                self.insight = clamp_u32(before.saturating_add(amount), u32::MAX);
            }
            ResourceKind::ResearchPoints => {
                self.research_points = before.saturating_add(amount);
            }
        }
        let value = self.value(kind);

        DeltaResult {
            kind,
            requested: amount,
            applied: value - before,
            value,
            game_over: self.is_game_over(),
        }
    }

    /// Applies a delta after running it through the active items' modifiers
    /// for this resource.
    pub fn apply_modified_delta<'a, I>(
        &mut self,
        kind: ResourceKind,
        amount: i64,
        active_items: I,
    ) -> DeltaResult
    where
        I: IntoIterator<Item = &'a Item>,
        I::IntoIter: Clone,
    {
        let modifier = DeltaModifier::for_target(active_items, kind.target());
        self.apply_delta(kind, modifier.apply(amount))
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.insight >= cost
    }

    /// Debits insight, or fails without touching the ledger.
    pub fn spend_insight(&mut self, cost: u32) -> Result<DeltaResult, StateConflictError> {
        if !self.can_afford(cost) {
            return Err(StateConflictError::InsufficientInsight {
                cost,
                available: self.insight,
            });
        }
        Ok(self.apply_delta(ResourceKind::Insight, -i64::from(cost)))
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

fn clamp_u32(value: i64, max: u32) -> u32 {
    value.clamp(0, i64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemCategory, ItemEffect, ItemId, ModifierType};

    #[test]
    fn lives_floor_at_zero_and_end_the_run() {
        let mut ledger = ResourceLedger::new(3, 5, 0);
        let result = ledger.apply_delta(ResourceKind::Lives, -1_000_000);
        assert_eq!(ledger.lives(), 0);
        assert_eq!(result.applied, -3);
        assert!(result.game_over);
    }

    #[test]
    fn lives_are_capped() {
        let mut ledger = ResourceLedger::new(4, 5, 0);
        let result = ledger.apply_delta(ResourceKind::Lives, 3);
        assert_eq!(result.value, 5);
        assert_eq!(result.applied, 1);
        assert!(!result.game_over);
    }

    #[test]
    fn research_points_have_no_floor() {
        let mut ledger = ResourceLedger::new(3, 5, 0);
        ledger.apply_delta(ResourceKind::ResearchPoints, -40);
        assert_eq!(ledger.research_points(), -40);
        ledger.apply_delta(ResourceKind::Insight, -40);
        assert_eq!(ledger.insight(), 0);
    }

    #[test]
    fn overspending_is_rejected_atomically() {
        let mut ledger = ResourceLedger::new(3, 5, 20);
        let before = ledger.clone();
        assert!(!ledger.can_afford(21));
        assert_eq!(
            ledger.spend_insight(21),
            Err(StateConflictError::InsufficientInsight {
                cost: 21,
                available: 20
            })
        );
        assert_eq!(ledger, before);

        let result = ledger.spend_insight(20).unwrap();
        assert_eq!(result.value, 0);
    }

    #[test]
    fn item_modifiers_shape_deltas() {
        let items = vec![
            Item::new(ItemId(1), "vest", ItemCategory::Instrument).with_effect(ItemEffect::new(
                TargetType::Lives,
                ModifierType::Reduction,
                1,
            )),
            Item::new(ItemId(2), "notes", ItemCategory::Reference).with_effect(ItemEffect::new(
                TargetType::Insight,
                ModifierType::Flat,
                5,
            )),
        ];
        let mut ledger = ResourceLedger::new(3, 5, 0);

        let hit = ledger.apply_modified_delta(ResourceKind::Lives, -2, &items);
        assert_eq!(hit.value, 2);
        let gain = ledger.apply_modified_delta(ResourceKind::Insight, 10, &items);
        assert_eq!(gain.value, 15);
    }
}
