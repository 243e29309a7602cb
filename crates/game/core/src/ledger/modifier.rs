//! Item modifiers applied to ledger deltas.
//!
//! Gains and losses are modified differently:
//! - gains: `(amount + Flat) * (100 + Percent) / 100`, never below zero
//! - losses: `amount + Reduction`, never above zero
//!
//! Percent bonuses from several items are summed before multiplying.

use crate::items::{Item, ModifierType, TargetType, resolve_effects};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaModifier {
    pub flat: i32,
    pub percent: i32,
    pub reduction: i32,
}

impl DeltaModifier {
    pub const NONE: Self = Self {
        flat: 0,
        percent: 0,
        reduction: 0,
    };

    /// Collects every modifier for `target` from the active items.
    pub fn for_target<'a, I>(items: I, target: TargetType) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
        I::IntoIter: Clone,
    {
        let items = items.into_iter();
        Self {
            flat: resolve_effects(items.clone(), target, ModifierType::Flat),
            percent: resolve_effects(items.clone(), target, ModifierType::Percent),
            reduction: resolve_effects(items, target, ModifierType::Reduction),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn apply(&self, amount: i64) -> i64 {
        match amount.signum() {
            1 => {
                let boosted = amount.saturating_add(i64::from(self.flat));
                let scaled = boosted.saturating_mul(100 + i64::from(self.percent)) / 100;
                scaled.max(0)
            }
            -1 => amount.saturating_add(i64::from(self.reduction)).min(0),
            _ => 0,
        }
    }
}
