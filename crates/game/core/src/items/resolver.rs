//! Effect aggregation over active items.
//!
//! Aggregation is a plain sum, so the result does not depend on item order.
//! The sum is taken in `i64` and clamped into `i32` once at the end.

use super::{Item, ModifierType, TargetType};

/// Sums the magnitude of every effect matching both `target` and `modifier`,
/// saturating at the `i32` bounds.
pub fn resolve_effects<'a, I>(items: I, target: TargetType, modifier: ModifierType) -> i32
where
    I: IntoIterator<Item = &'a Item>,
{
    let total: i64 = items
        .into_iter()
        .flat_map(|item| item.effects.iter())
        .filter(|effect| effect.target == target && effect.modifier == modifier)
        .map(|effect| i64::from(effect.magnitude))
        .sum();
    i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
}

/// True when any effect matches both `target` and `modifier`.
pub fn has_effect<'a, I>(items: I, target: TargetType, modifier: ModifierType) -> bool
where
    I: IntoIterator<Item = &'a Item>,
{
    items
        .into_iter()
        .flat_map(|item| item.effects.iter())
        .any(|effect| effect.target == target && effect.modifier == modifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemCategory, ItemEffect, ItemId};

    fn item(id: u32, effects: &[(TargetType, ModifierType, i32)]) -> Item {
        effects.iter().fold(
            Item::new(ItemId(id), format!("item {id}"), ItemCategory::Reference),
            |item, &(target, modifier, magnitude)| {
                item.with_effect(ItemEffect::new(target, modifier, magnitude))
            },
        )
    }

    fn shelf() -> Vec<Item> {
        vec![
            item(1, &[(TargetType::Insight, ModifierType::Flat, 2)]),
            item(
                2,
                &[
                    (TargetType::Insight, ModifierType::Flat, 3),
                    (TargetType::Insight, ModifierType::Percent, 10),
                ],
            ),
            item(3, &[(TargetType::Lives, ModifierType::Reduction, 1)]),
            item(4, &[(TargetType::Insight, ModifierType::Flat, -1)]),
        ]
    }

    #[test]
    fn sums_matching_effects_additively() {
        let items = shelf();
        assert_eq!(
            resolve_effects(&items, TargetType::Insight, ModifierType::Flat),
            4
        );
        assert_eq!(
            resolve_effects(&items, TargetType::Insight, ModifierType::Percent),
            10
        );
        assert_eq!(
            resolve_effects(&items, TargetType::ResearchPoints, ModifierType::Flat),
            0
        );
    }

    #[test]
    fn two_percent_items_add_rather_than_multiply() {
        let items = vec![
            item(1, &[(TargetType::Insight, ModifierType::Percent, 50)]),
            item(2, &[(TargetType::Insight, ModifierType::Percent, 50)]),
        ];
        assert_eq!(
            resolve_effects(&items, TargetType::Insight, ModifierType::Percent),
            100
        );
    }

    #[test]
    fn order_does_not_matter() {
        let items = shelf();
        let forward = resolve_effects(&items, TargetType::Insight, ModifierType::Flat);
        let reversed = resolve_effects(items.iter().rev(), TargetType::Insight, ModifierType::Flat);
        let rotated: Vec<&Item> = items.iter().cycle().skip(2).take(items.len()).collect();
        let rotated = resolve_effects(rotated, TargetType::Insight, ModifierType::Flat);
        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn extreme_magnitudes_sum_the_same_in_any_order() {
        let max = item(1, &[(TargetType::Insight, ModifierType::Flat, i32::MAX)]);
        let one = item(2, &[(TargetType::Insight, ModifierType::Flat, 1)]);
        let minus_one = item(3, &[(TargetType::Insight, ModifierType::Flat, -1)]);

        let first = resolve_effects([&max, &one, &minus_one], TargetType::Insight, ModifierType::Flat);
        let second =
            resolve_effects([&minus_one, &max, &one], TargetType::Insight, ModifierType::Flat);
        let third = resolve_effects([&one, &minus_one, &max], TargetType::Insight, ModifierType::Flat);
        assert_eq!(first, i32::MAX);
        assert_eq!(second, i32::MAX);
        assert_eq!(third, i32::MAX);
    }

    #[test]
    fn totals_beyond_the_range_clamp() {
        let items = vec![
            item(1, &[(TargetType::Lives, ModifierType::Reduction, i32::MIN)]),
            item(2, &[(TargetType::Lives, ModifierType::Reduction, -5)]),
        ];
        assert_eq!(
            resolve_effects(&items, TargetType::Lives, ModifierType::Reduction),
            i32::MIN
        );
    }

    #[test]
    fn existence_check_matches_both_axes() {
        let items = shelf();
        assert!(has_effect(&items, TargetType::Lives, ModifierType::Reduction));
        assert!(!has_effect(&items, TargetType::Lives, ModifierType::Flat));
        assert!(!has_effect(Vec::<&Item>::new(), TargetType::Lives, ModifierType::Reduction));
    }
}
