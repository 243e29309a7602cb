//! Procedural level-graph generation.
//!
//! [`generate_map`] turns [`GenerationOptions`] into a [`GeneratedMap`]: a
//! layered, acyclic graph with a single start and a single boss. Topology is
//! fixed once generated; traversal status lives in
//! [`NodeGraph`](crate::graph::NodeGraph).

mod errors;
mod generator;
mod options;
mod root;
mod types;
mod validate;

pub use errors::{ConfigurationError, TopologyViolation};
pub use generator::{MapGenerator, generate_map};
pub use options::{Difficulty, GenerationOptions, default_weights};
#[cfg(feature = "serde")]
pub use root::compute_map_root;
pub use types::{
    Edge, GeneratedMap, MapNode, NodeId, NodeStatus, NodeType, Position, ScenarioRef,
};
