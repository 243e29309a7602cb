//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving a run or streaming events from specific topics.
use std::collections::{BTreeSet, HashMap};

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::engine::{AcknowledgeOutcome, BeginChallenge, Cancel, ResolveEncounter, TimeExpired};
use game_core::{ChallengeDescriptor, Item, ItemId, NodeId, RunEvent, RunOutcome, RunState, StageAnswer};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::SaveGame;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Apply a run event. Events are applied in the order the worker
    /// receives them, whichever handle sent them.
    pub async fn execute(&self, event: RunEvent) -> Result<RunOutcome> {
        self.request(|reply| Command::Execute { event, reply })
            .await?
    }

    /// Select `node` and activate its scenario when it is a challenge node.
    pub async fn enter_node(&self, node: NodeId) -> Result<Vec<RunOutcome>> {
        self.request(|reply| Command::EnterNode { node, reply })
            .await?
    }

    pub async fn select_node(&self, node: NodeId) -> Result<RunOutcome> {
        self.execute(RunEvent::select(node)).await
    }

    pub async fn activate_challenge(&self, descriptor: ChallengeDescriptor) -> Result<RunOutcome> {
        self.execute(RunEvent::activate(descriptor)).await
    }

    pub async fn begin_challenge(&self) -> Result<RunOutcome> {
        self.execute(RunEvent::BeginChallenge(BeginChallenge)).await
    }

    pub async fn submit_answer(&self, stage: usize, answer: StageAnswer) -> Result<RunOutcome> {
        self.execute(RunEvent::answer(stage, answer)).await
    }

    /// Shorthand for a single-choice answer.
    pub async fn choose(&self, stage: usize, choice: u32) -> Result<RunOutcome> {
        self.submit_answer(stage, StageAnswer::Selection(BTreeSet::from([choice])))
            .await
    }

    pub async fn tick(&self, ticks: u32) -> Result<RunOutcome> {
        self.execute(RunEvent::tick(ticks)).await
    }

    pub async fn time_expired(&self) -> Result<RunOutcome> {
        self.execute(RunEvent::TimeExpired(TimeExpired)).await
    }

    pub async fn acknowledge(&self) -> Result<RunOutcome> {
        self.execute(RunEvent::AcknowledgeOutcome(AcknowledgeOutcome))
            .await
    }

    pub async fn resolve_encounter(&self) -> Result<RunOutcome> {
        self.execute(RunEvent::ResolveEncounter(ResolveEncounter))
            .await
    }

    pub async fn cancel(&self) -> Result<RunOutcome> {
        self.execute(RunEvent::Cancel(Cancel)).await
    }

    pub async fn purchase(&self, item: Item) -> Result<RunOutcome> {
        self.execute(RunEvent::purchase(item)).await
    }

    pub async fn toggle_item(&self, item: ItemId, active: bool) -> Result<RunOutcome> {
        self.execute(RunEvent::toggle(item, active)).await
    }

    /// Query the current run state (read-only snapshot)
    pub async fn query_state(&self) -> Result<RunState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Every event applied so far.
    pub async fn event_log(&self) -> Result<Vec<RunEvent>> {
        self.request(|reply| Command::EventLog { reply }).await
    }

    /// Store the run in the configured repository under `slot`.
    pub async fn save(&self, slot: impl Into<String>) -> Result<SaveGame> {
        let slot = slot.into();
        self.request(|reply| Command::Save { slot, reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Progress` - applied and rejected events, node completion,
    ///   run end, saves
    /// - `Topic::Challenge` - activation, expired stages, outcomes
    /// - `Topic::Resources` - every ledger delta
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut rx = handle.subscribe(Topic::Resources);
    /// while let Ok(event) = rx.recv().await {
    ///     // Update the HUD
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
