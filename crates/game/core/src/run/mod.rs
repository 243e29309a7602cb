//! The run aggregate: everything one expedition owns.

mod replay;

pub use replay::ReplayError;

use crate::challenge::ChallengeState;
use crate::config::GameConfig;
use crate::graph::NodeGraph;
use crate::items::Inventory;
use crate::ledger::ResourceLedger;
use crate::map::{ConfigurationError, GeneratedMap, GenerationOptions, NodeStatus, generate_map};

/// Complete state of one run.
///
/// Mutated only through [`crate::engine::RunEngine`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunState {
    pub(crate) options: GenerationOptions,
    pub(crate) config: GameConfig,
    pub(crate) graph: NodeGraph,
    pub(crate) ledger: ResourceLedger,
    pub(crate) inventory: Inventory,
    pub(crate) challenge: Option<ChallengeState>,
    /// Number of events applied so far.
    pub(crate) nonce: u64,
    pub(crate) game_over: bool,
    /// A failure sealed a node, so the boss can never be completed.
    pub(crate) defeated: bool,
}

impl RunState {
    /// Generates the map for `options` and sets up starting resources.
    pub fn new(config: GameConfig, options: GenerationOptions) -> Result<Self, ConfigurationError> {
        let map = generate_map(&options)?;
        Ok(Self::from_map(config, options, map))
    }

    /// Builds a run around an already generated map.
    pub fn from_map(config: GameConfig, options: GenerationOptions, map: GeneratedMap) -> Self {
        let graph = NodeGraph::new(map, config.node_policies.clone());
        let ledger = ResourceLedger::from_config(&config);
        let game_over = ledger.is_game_over();

        Self {
            options,
            config,
            graph,
            ledger,
            inventory: Inventory::new(),
            challenge: None,
            nonce: 0,
            game_over,
            defeated: false,
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.graph.map().seed()
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn map(&self) -> &GeneratedMap {
        self.graph.map()
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn challenge(&self) -> Option<&ChallengeState> {
        self.challenge.as_ref()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// True once the boss node is completed.
    pub fn is_cleared(&self) -> bool {
        self.graph.is_cleared()
    }

    /// No further events are accepted.
    pub fn is_finished(&self) -> bool {
        self.game_over || self.defeated || self.is_cleared()
    }

    /// Cross-aggregate consistency checks run after every event.
    pub fn check_invariants(&self) -> Result<(), String> {
        let active: Vec<_> = self
            .graph
            .map()
            .nodes()
            .iter()
            .filter(|node| node.status == NodeStatus::Active)
            .map(|node| node.id)
            .collect();

        if active.len() > 1 {
            return Err(format!("{} nodes are active", active.len()));
        }
        if active.first().copied() != self.graph.active_node() {
            return Err("active node bookkeeping diverged from node status".to_string());
        }
        if let Some(challenge) = &self.challenge {
            if Some(challenge.node()) != self.graph.active_node() {
                return Err(format!("challenge on {} outlived its node", challenge.node()));
            }
        }
        if self.ledger.lives() > self.ledger.max_lives() {
            return Err("lives exceed the cap".to_string());
        }
        if self.game_over != self.ledger.is_game_over() {
            return Err("game over flag diverged from lives".to_string());
        }
        if self.defeated != self.graph.has_sealed_nodes() {
            return Err("defeat flag diverged from sealed nodes".to_string());
        }
        Ok(())
    }
}
