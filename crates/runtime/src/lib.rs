//! Runtime orchestration for expedition runs.
//!
//! This crate wires together the deterministic rules in `game-core`, the
//! scenario bank from `game-content`, save repositories and a worker task
//! into a cohesive runtime API. Consumers embed [`Runtime`] to start or
//! resume a run, drive it through [`RuntimeHandle`], and subscribe to
//! events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`repository`] persists and verifies saved runs
//! - [`seed`] decides where new maps come from
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod seed;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{ChallengeEvent, Event, EventBus, ProgressEvent, ResourceEvent, Topic};
pub use repository::{
    FileSaveRepository, InMemorySaveRepo, RepositoryError, SaveFormat, SaveGame, SaveRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use seed::{EntropySeed, FixedSeed, SeedSource};
