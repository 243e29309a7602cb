//! Run worker that owns the authoritative [`RunState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes run events via
//! [`RunEngine`], keeps the applied-event log, and publishes events to the
//! [`EventBus`]. Commands are handled one at a time, so every event is
//! applied against the state left by the previous one.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use game_content::ScenarioBank;
use game_core::{ChallengeKind, NodeId, RunEngine, RunEvent, RunOutcome, RunState};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, ProgressEvent, extract_events};
use crate::repository::{SaveGame, SaveRepository};

/// Commands that can be sent to the run worker
pub enum Command {
    /// Apply one run event.
    Execute {
        event: RunEvent,
        reply: oneshot::Sender<Result<RunOutcome>>,
    },
    /// Select a node and, for challenge nodes, activate the scenario the
    /// bank assigns to it.
    EnterNode {
        node: NodeId,
        reply: oneshot::Sender<Result<Vec<RunOutcome>>>,
    },
    /// Query the current run state (read-only).
    QueryState { reply: oneshot::Sender<RunState> },
    /// Every event applied so far, in order.
    EventLog {
        reply: oneshot::Sender<Vec<RunEvent>>,
    },
    /// Capture the run and store it under `slot`.
    Save {
        slot: String,
        reply: oneshot::Sender<Result<SaveGame>>,
    },
}

/// Background task that processes run commands.
pub struct RunWorker {
    state: RunState,
    events: Vec<RunEvent>,
    bank: ScenarioBank,
    repository: Option<Arc<dyn SaveRepository>>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl RunWorker {
    /// Creates a worker resuming from `state`, which must be the result of
    /// applying `events` to a fresh run.
    pub fn new(
        state: RunState,
        events: Vec<RunEvent>,
        bank: ScenarioBank,
        repository: Option<Arc<dyn SaveRepository>>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            "RunWorker initialized: seed {}, {} nodes, nonce {}, {} scenarios",
            state.seed(),
            state.map().len(),
            state.nonce(),
            bank.len()
        );

        Self {
            state,
            events,
            bank,
            repository,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("RunWorker stopped at nonce {}", self.state.nonce());
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { event, reply } => {
                let result = self.execute(event);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::EnterNode { node, reply } => {
                let result = self.enter_node(node);
                if reply.send(result).is_err() {
                    debug!("EnterNode reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::EventLog { reply } => {
                if reply.send(self.events.clone()).is_err() {
                    debug!("EventLog reply channel closed (caller dropped)");
                }
            }
            Command::Save { slot, reply } => {
                let result = self.save(slot);
                if reply.send(result).is_err() {
                    debug!("Save reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Applies `event`, appends it to the log and publishes what changed.
    /// Rejected events leave both the state and the log untouched.
    fn execute(&mut self, event: RunEvent) -> Result<RunOutcome> {
        let nonce = self.state.nonce();

        match RunEngine::new(&mut self.state).execute(&event) {
            Ok(outcome) => {
                debug!("Applied {} at nonce {}", event.name(), nonce);
                let after = self.state.nonce();
                for published in extract_events(after, &event, &outcome) {
                    self.event_bus.publish(published);
                }
                if matches!(outcome, RunOutcome::NodeResolved(_)) && self.state.is_cleared() {
                    info!("Run cleared at nonce {}", after);
                    self.event_bus
                        .publish(Event::Progress(ProgressEvent::RunCleared { nonce: after }));
                }
                if matches!(&outcome, RunOutcome::NodeResolved(resolution) if resolution.defeated) {
                    info!("Run defeated at nonce {}", after);
                }
                self.events.push(event);
                Ok(outcome)
            }
            Err(error) => {
                warn!("Rejected {} at nonce {}: {}", event.name(), nonce, error);
                self.event_bus.publish(Event::Progress(ProgressEvent::Rejected {
                    nonce,
                    event,
                    error: error.clone(),
                }));
                Err(RuntimeError::Execute(error))
            }
        }
    }

    fn enter_node(&mut self, node: NodeId) -> Result<Vec<RunOutcome>> {
        // Unknown nodes fall through so select_node reports the conflict.
        let descriptor = match self.state.map().node(node) {
            Some(map_node) if ChallengeKind::for_node(map_node.node_type).is_some() => {
                let descriptor = self.bank.descriptor_for(map_node).cloned().ok_or(
                    RuntimeError::NoScenario {
                        node,
                        node_type: map_node.node_type,
                    },
                )?;
                Some(descriptor)
            }
            _ => None,
        };

        let mut outcomes = vec![self.execute(RunEvent::select(node))?];
        if let Some(descriptor) = descriptor {
            outcomes.push(self.execute(RunEvent::activate(descriptor))?);
        }
        Ok(outcomes)
    }

    fn save(&self, slot: String) -> Result<SaveGame> {
        let repository = self
            .repository
            .as_ref()
            .ok_or(RuntimeError::MissingRepository)?;

        let game = SaveGame::capture(slot, &self.state, &self.events)?;
        repository.save(&game)?;

        info!(
            "Saved slot '{}' at nonce {} (events root {})",
            game.slot,
            game.nonce(),
            hex::encode(game.events_root)
        );
        self.event_bus.publish(Event::Progress(ProgressEvent::Saved {
            slot: game.slot.clone(),
            nonce: game.nonce(),
        }));

        Ok(game)
    }
}
