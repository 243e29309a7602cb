//! Deterministic rules for expedition runs.
//!
//! `game-core` defines the canonical rules (map generation, traversal,
//! challenges, items and resources) and exposes pure APIs that the runtime
//! and offline tools share. All run mutation flows through
//! [`engine::RunEngine`]; nothing in this crate blocks, spawns or logs.
//!
//! Pipeline for one node:
//!
//! 1. [`NodeGraph::select_node`] activates an available node
//! 2. [`activate_challenge`] builds the node's [`ChallengeState`]
//! 3. [`ChallengeState::submit_answer`] drives the stage machine to a
//!    [`ChallengeOutcome`]
//! 4. the engine completes the node and settles the [`ResourceLedger`],
//!    with [`resolve_effects`] shaping every delta
pub mod challenge;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod items;
pub mod ledger;
pub mod map;
pub mod rng;
pub mod run;

pub use challenge::{
    ChallengeDescriptor, ChallengeId, ChallengeKind, ChallengeOutcome, ChallengePhase,
    ChallengeState, Grade, ImagingStage, NumericStage, SelectionStage, Stage, StageAnswer,
    StageKind, StageRecord, ValidationError, activate_challenge,
};
pub use config::{GameConfig, GradeRewards, Reward};
#[cfg(feature = "serde")]
pub use engine::compute_events_root;
pub use engine::{
    EventTransition, ExecuteError, NodeResolution, RunEngine, RunError, RunEvent, RunOutcome,
    TransitionPhase,
};
pub use error::{ErrorSeverity, GameError};
pub use graph::{NodeCompletion, NodeGraph, NodePolicies, NodePolicy, StateConflictError};
pub use items::{
    Inventory, Item, ItemCategory, ItemEffect, ItemId, ModifierType, TargetType, has_effect,
    resolve_effects,
};
pub use ledger::{DeltaModifier, DeltaResult, ResourceKind, ResourceLedger};
#[cfg(feature = "serde")]
pub use map::compute_map_root;
pub use map::{
    ConfigurationError, Difficulty, Edge, GeneratedMap, GenerationOptions, MapGenerator, MapNode,
    NodeId, NodeStatus, NodeType, Position, ScenarioRef, TopologyViolation, generate_map,
};
pub use rng::{PcgRng, RngOracle, SeededStream, compute_seed};
pub use run::{ReplayError, RunState};
