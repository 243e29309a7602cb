//! Run events and their outcomes.

use crate::challenge::{ChallengeDescriptor, ChallengeId, ChallengeOutcome, StageAnswer};
use crate::graph::NodeCompletion;
use crate::items::{Item, ItemId};
use crate::ledger::DeltaResult;
use crate::map::{NodeId, NodeType};

/// Moves an available node to active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectNode {
    pub node: NodeId,
}

/// Starts a challenge on the active node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivateChallenge {
    pub descriptor: ChallengeDescriptor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeginChallenge;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmitAnswer {
    pub stage: usize,
    pub answer: StageAnswer,
}

/// External countdown source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    pub ticks: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeExpired;

/// Closes a finished challenge and applies its outcome to the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcknowledgeOutcome;

/// Completes the active start, rest or shop node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveEncounter;

/// Leaves the active node without completing it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cancel;

/// Buys an item from the active shop. The event carries the full item so a
/// log replays without the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PurchaseItem {
    pub item: Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToggleItem {
    pub item: ItemId,
    pub active: bool,
}

/// Every input a run accepts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunEvent {
    SelectNode(SelectNode),
    ActivateChallenge(ActivateChallenge),
    BeginChallenge(BeginChallenge),
    SubmitAnswer(SubmitAnswer),
    Tick(Tick),
    TimeExpired(TimeExpired),
    AcknowledgeOutcome(AcknowledgeOutcome),
    ResolveEncounter(ResolveEncounter),
    Cancel(Cancel),
    PurchaseItem(PurchaseItem),
    ToggleItem(ToggleItem),
}

impl RunEvent {
    pub fn select(node: NodeId) -> Self {
        Self::SelectNode(SelectNode { node })
    }

    pub fn activate(descriptor: ChallengeDescriptor) -> Self {
        Self::ActivateChallenge(ActivateChallenge { descriptor })
    }

    pub fn answer(stage: usize, answer: StageAnswer) -> Self {
        Self::SubmitAnswer(SubmitAnswer { stage, answer })
    }

    pub fn tick(ticks: u32) -> Self {
        Self::Tick(Tick { ticks })
    }

    pub fn purchase(item: Item) -> Self {
        Self::PurchaseItem(PurchaseItem { item })
    }

    pub fn toggle(item: ItemId, active: bool) -> Self {
        Self::ToggleItem(ToggleItem { item, active })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectNode(_) => "select_node",
            Self::ActivateChallenge(_) => "activate_challenge",
            Self::BeginChallenge(_) => "begin_challenge",
            Self::SubmitAnswer(_) => "submit_answer",
            Self::Tick(_) => "tick",
            Self::TimeExpired(_) => "time_expired",
            Self::AcknowledgeOutcome(_) => "acknowledge_outcome",
            Self::ResolveEncounter(_) => "resolve_encounter",
            Self::Cancel(_) => "cancel",
            Self::PurchaseItem(_) => "purchase_item",
            Self::ToggleItem(_) => "toggle_item",
        }
    }
}

/// Everything a finished node changed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeResolution {
    pub completion: NodeCompletion,
    /// Present for challenge nodes.
    pub outcome: Option<ChallengeOutcome>,
    pub deltas: Vec<DeltaResult>,
    pub game_over: bool,
    /// A failure sealed the node and the run cannot be cleared.
    pub defeated: bool,
}

/// Result of a successfully applied event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunOutcome {
    NodeSelected {
        node: NodeId,
        node_type: NodeType,
    },
    ChallengeActivated {
        node: NodeId,
        challenge: ChallengeId,
        stages: usize,
    },
    ChallengeStarted {
        challenge: ChallengeId,
    },
    /// An answer was recorded. `outcome` is set when it finished the last
    /// stage.
    AnswerRecorded {
        stage: usize,
        accepted: bool,
        outcome: Option<ChallengeOutcome>,
    },
    /// Countdown moved. `expired` is the stage that ran out of time, if any.
    Ticked {
        expired: Option<usize>,
        remaining: Option<u32>,
        outcome: Option<ChallengeOutcome>,
    },
    StageExpired {
        stage: usize,
        outcome: Option<ChallengeOutcome>,
    },
    NodeResolved(NodeResolution),
    Cancelled {
        node: NodeId,
    },
    ItemPurchased {
        item: ItemId,
        cost: u32,
        insight: u32,
    },
    ItemToggled {
        item: ItemId,
        active: bool,
        changed: bool,
    },
}
