//! Event execution pipeline.
//!
//! [`RunEngine`] is the authoritative reducer for [`RunState`]. Every event
//! goes through the same three phases (pre_validate → apply →
//! post_validate); a failure in any phase restores the state the event
//! started from.

mod challenge;
mod errors;
mod events;
mod node;
#[cfg(feature = "serde")]
mod root;
mod shop;
mod transition;

pub use errors::{ExecuteError, RunError, TransitionPhase};
pub use events::{
    AcknowledgeOutcome, ActivateChallenge, BeginChallenge, Cancel, NodeResolution, PurchaseItem,
    ResolveEncounter, RunEvent, RunOutcome, SelectNode, SubmitAnswer, Tick, TimeExpired,
    ToggleItem,
};
#[cfg(feature = "serde")]
pub use root::compute_events_root;
pub use transition::EventTransition;

use crate::run::RunState;

pub struct RunEngine<'a> {
    state: &'a mut RunState,
}

impl<'a> RunEngine<'a> {
    pub fn new(state: &'a mut RunState) -> Self {
        Self { state }
    }

    /// Executes one event. On success the nonce advances by one.
    pub fn execute(&mut self, event: &RunEvent) -> Result<RunOutcome, ExecuteError> {
        let before = self.state.clone();

        match transition::execute_transition(event, self.state) {
            Ok(outcome) => {
                self.state.nonce += 1;
                Ok(outcome)
            }
            Err(error) => {
                *self.state = before;
                Err(error)
            }
        }
    }
}
