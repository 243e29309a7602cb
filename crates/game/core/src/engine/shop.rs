//! Inventory transitions.

use crate::graph::StateConflictError;
use crate::map::NodeType;
use crate::run::RunState;

use super::errors::RunError;
use super::events::{PurchaseItem, RunOutcome, ToggleItem};
use super::transition::EventTransition;

impl EventTransition for PurchaseItem {
    fn pre_validate(&self, state: &RunState) -> Result<(), RunError> {
        let in_shop = state
            .graph
            .active_node()
            .and_then(|node| state.graph.node_type(node))
            == Some(NodeType::Shop);
        if !in_shop {
            return Err(StateConflictError::NotInShop.into());
        }
        if state.inventory.contains(self.item.id) {
            return Err(StateConflictError::ItemAlreadyOwned(self.item.id).into());
        }
        if !state.ledger.can_afford(self.item.price) {
            return Err(StateConflictError::InsufficientInsight {
                cost: self.item.price,
                available: state.ledger.insight(),
            }
            .into());
        }
        Ok(())
    }

    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        state.ledger.spend_insight(self.item.price)?;
        state.inventory.add(self.item.clone())?;
        Ok(RunOutcome::ItemPurchased {
            item: self.item.id,
            cost: self.item.price,
            insight: state.ledger.insight(),
        })
    }
}

impl EventTransition for ToggleItem {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let changed = state.inventory.set_active(self.item, self.active)?;
        Ok(RunOutcome::ItemToggled {
            item: self.item,
            active: self.active,
            changed,
        })
    }
}
