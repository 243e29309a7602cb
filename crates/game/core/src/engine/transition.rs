//! Event transition dispatch and execution logic.

use crate::run::RunState;

use super::errors::{ExecuteError, RunError, TransitionPhase};
use super::events::{RunEvent, RunOutcome};

/// Defines how a concrete event mutates the run.
pub trait EventTransition {
    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    /// Applies the event by mutating the run directly. Implementations may
    /// assume that `pre_validate` has already run successfully.
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &RunState) -> Result<(), RunError> {
        state.check_invariants().map_err(RunError::Invariant)
    }
}

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the run and return the outcome
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    name: &str,
    transition: &T,
    state: &mut RunState,
) -> Result<RunOutcome, ExecuteError>
where
    T: EventTransition,
{
    if state.is_finished() {
        return Err(ExecuteError::new(
            name,
            TransitionPhase::PreValidate,
            crate::graph::StateConflictError::RunOver.into(),
        ));
    }

    transition
        .pre_validate(state)
        .map_err(|error| ExecuteError::new(name, TransitionPhase::PreValidate, error))?;

    let outcome = transition
        .apply(state)
        .map_err(|error| ExecuteError::new(name, TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| ExecuteError::new(name, TransitionPhase::PostValidate, error))?;

    Ok(outcome)
}

pub(super) fn execute_transition(
    event: &RunEvent,
    state: &mut RunState,
) -> Result<RunOutcome, ExecuteError> {
    let name = event.name();
    match event {
        RunEvent::SelectNode(transition) => drive_transition(name, transition, state),
        RunEvent::ActivateChallenge(transition) => drive_transition(name, transition, state),
        RunEvent::BeginChallenge(transition) => drive_transition(name, transition, state),
        RunEvent::SubmitAnswer(transition) => drive_transition(name, transition, state),
        RunEvent::Tick(transition) => drive_transition(name, transition, state),
        RunEvent::TimeExpired(transition) => drive_transition(name, transition, state),
        RunEvent::AcknowledgeOutcome(transition) => drive_transition(name, transition, state),
        RunEvent::ResolveEncounter(transition) => drive_transition(name, transition, state),
        RunEvent::Cancel(transition) => drive_transition(name, transition, state),
        RunEvent::PurchaseItem(transition) => drive_transition(name, transition, state),
        RunEvent::ToggleItem(transition) => drive_transition(name, transition, state),
    }
}
