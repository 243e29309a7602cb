//! High-level runtime orchestrator.
//!
//! The runtime owns the run worker, wires up command/event channels, and
//! exposes a builder-based API for starting or resuming a run.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_content::ScenarioBank;
use game_core::{GameConfig, GenerationOptions, RunState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{SaveGame, SaveRepository};
use crate::seed::{EntropySeed, SeedSource};
use crate::workers::{Command, RunWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Map options for new runs. The seed is replaced by the builder's
    /// [`SeedSource`].
    pub generation: GenerationOptions,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            generation: GenerationOptions::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that drives one run.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully.
    ///
    /// The worker stops once every handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

enum Resume {
    Save(Box<SaveGame>),
    Slot(String),
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    seed_source: Box<dyn SeedSource>,
    scenarios: ScenarioBank,
    repository: Option<Arc<dyn SaveRepository>>,
    resume: Option<Resume>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            seed_source: Box::new(EntropySeed),
            scenarios: ScenarioBank::default(),
            repository: None,
            resume: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed for a new run. Defaults to [`EntropySeed`]; ignored when resuming.
    pub fn seed_source(mut self, source: impl SeedSource + 'static) -> Self {
        self.seed_source = Box::new(source);
        self
    }

    /// Scenarios drawn by [`RuntimeHandle::enter_node`].
    pub fn scenarios(mut self, scenarios: ScenarioBank) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Repository used by [`RuntimeHandle::save`] and [`Self::resume_slot`].
    pub fn repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Continue a saved run instead of generating a new one.
    pub fn resume_from(mut self, save: SaveGame) -> Self {
        self.resume = Some(Resume::Save(Box::new(save)));
        self
    }

    /// Continue the run stored under `slot` in the configured repository.
    pub fn resume_slot(mut self, slot: impl Into<String>) -> Self {
        self.resume = Some(Resume::Slot(slot.into()));
        self
    }

    fn initial_run(&self) -> Result<(RunState, Vec<game_core::RunEvent>)> {
        let save = match &self.resume {
            None => {
                let seed = self.seed_source.next_seed();
                let options = self.config.generation.clone().with_seed(seed);
                let state = RunState::new(self.config.game_config.clone(), options)?;
                return Ok((state, Vec::new()));
            }
            Some(Resume::Save(save)) => save.as_ref().clone(),
            Some(Resume::Slot(slot)) => {
                let repository = self
                    .repository
                    .as_ref()
                    .ok_or(RuntimeError::MissingRepository)?;
                repository
                    .load(slot)?
                    .ok_or_else(|| RuntimeError::SlotNotFound(slot.clone()))?
            }
        };

        let state = save.verify()?;
        tracing::info!(
            "Resuming slot '{}' at nonce {} ({} events)",
            save.slot,
            state.nonce(),
            save.events.len()
        );
        Ok((state, save.events))
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let (state, events) = self.initial_run()?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = RunWorker::new(
            state,
            events,
            self.scenarios,
            self.repository,
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
