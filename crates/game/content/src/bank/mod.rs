//! Scenario bank: challenge descriptors grouped by kind.

use std::collections::BTreeMap;

use game_core::{ChallengeDescriptor, ChallengeKind, MapNode, ScenarioRef, ValidationError};

/// Validated challenge descriptors, grouped by [`ChallengeKind`].
///
/// A node's [`ScenarioRef`] picks one descriptor of the node's kind, so the
/// same map always draws the same challenges from the same bank.
#[derive(Clone, Debug, Default)]
pub struct ScenarioBank {
    by_kind: BTreeMap<ChallengeKind, Vec<ChallengeDescriptor>>,
}

impl ScenarioBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = ChallengeDescriptor>,
    {
        let mut bank = Self::new();
        for descriptor in descriptors {
            bank.insert(descriptor)?;
        }
        Ok(bank)
    }

    /// Validates and adds a descriptor.
    pub fn insert(&mut self, descriptor: ChallengeDescriptor) -> Result<(), ValidationError> {
        descriptor.validate()?;
        self.by_kind
            .entry(descriptor.kind())
            .or_default()
            .push(descriptor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(Vec::is_empty)
    }

    pub fn count(&self, kind: ChallengeKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    pub fn pick(&self, kind: ChallengeKind, scenario: ScenarioRef) -> Option<&ChallengeDescriptor> {
        let pool = self.by_kind.get(&kind)?;
        if pool.is_empty() {
            return None;
        }
        let index = (scenario.0 % pool.len() as u64) as usize;
        pool.get(index)
    }

    /// Descriptor for a challenge node, `None` for non-challenge nodes or
    /// when the bank has nothing of the node's kind.
    pub fn descriptor_for(&self, node: &MapNode) -> Option<&ChallengeDescriptor> {
        let kind = ChallengeKind::for_node(node.node_type)?;
        self.pick(kind, node.scenario.unwrap_or(ScenarioRef(0)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use game_core::{NodeId, NodeType, NumericStage, Position, SelectionStage, Stage};

    use super::*;

    fn quiz(title: &str) -> ChallengeDescriptor {
        ChallengeDescriptor::new(
            ChallengeKind::Quiz,
            title,
            vec![Stage::Selection(SelectionStage {
                prompt: "pick".into(),
                choices: vec!["yes".into(), "no".into()],
                correct: BTreeSet::from([0]),
                multi_select: false,
                time_limit: None,
            })],
        )
        .unwrap()
    }

    #[test]
    fn picks_are_stable_per_scenario_ref() {
        let bank = ScenarioBank::from_descriptors([quiz("a"), quiz("b"), quiz("c")]).unwrap();

        assert_eq!(bank.count(ChallengeKind::Quiz), 3);
        let first = bank.pick(ChallengeKind::Quiz, ScenarioRef(7)).unwrap();
        assert_eq!(first.title(), "b");
        assert_eq!(
            bank.pick(ChallengeKind::Quiz, ScenarioRef(7)).unwrap().title(),
            first.title()
        );
        assert!(bank.pick(ChallengeKind::Calculation, ScenarioRef(7)).is_none());
    }

    #[test]
    fn non_challenge_nodes_have_no_descriptor() {
        let bank = ScenarioBank::from_descriptors([quiz("a")]).unwrap();
        let rest = MapNode::new(NodeId(3), NodeType::Rest, 1, Position::ORIGIN);
        assert!(bank.descriptor_for(&rest).is_none());

        let mut node = MapNode::new(NodeId(4), NodeType::Quiz, 1, Position::ORIGIN);
        node.scenario = Some(ScenarioRef(11));
        assert_eq!(bank.descriptor_for(&node).unwrap().title(), "a");
    }

    #[test]
    fn descriptors_are_grouped_by_kind() {
        let mut bank = ScenarioBank::new();
        let calc = ChallengeDescriptor::new(
            ChallengeKind::Calculation,
            "dose",
            vec![Stage::Numeric(NumericStage {
                prompt: "mg/kg".into(),
                correct: 2.0,
                tolerance_pct: 10,
                time_limit: None,
            })],
        )
        .unwrap();
        bank.insert(calc).unwrap();
        bank.insert(quiz("a")).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.count(ChallengeKind::Calculation), 1);
        assert_eq!(bank.count(ChallengeKind::Boss), 0);
        assert!(!bank.is_empty());
    }
}
