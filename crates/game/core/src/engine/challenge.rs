//! Challenge transitions.

use crate::challenge::{ChallengeId, ChallengeKind, ChallengeState, ValidationError, activate_challenge};
use crate::graph::StateConflictError;
use crate::items::{ModifierType, TargetType, resolve_effects};
use crate::run::RunState;

use super::errors::RunError;
use super::events::{
    AcknowledgeOutcome, ActivateChallenge, BeginChallenge, RunOutcome, SubmitAnswer, Tick,
    TimeExpired,
};
use super::node::{active_node, resolve_node};
use super::transition::EventTransition;

fn challenge_mut(state: &mut RunState) -> Result<&mut ChallengeState, RunError> {
    state
        .challenge
        .as_mut()
        .ok_or_else(|| StateConflictError::NoActiveChallenge.into())
}

impl EventTransition for ActivateChallenge {
    fn pre_validate(&self, state: &RunState) -> Result<(), RunError> {
        let (node, node_type) = active_node(state)?;
        if state.challenge.is_some() {
            return Err(StateConflictError::ChallengeAlreadyActive(node).into());
        }
        let kind = ChallengeKind::for_node(node_type)
            .ok_or(StateConflictError::NoChallengeForNode { node, node_type })?;
        if self.descriptor.kind() != kind {
            return Err(ValidationError::DescriptorMismatch {
                node_type,
                kind: self.descriptor.kind(),
            }
            .into());
        }
        self.descriptor.validate()?;
        Ok(())
    }

    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let (node, _) = active_node(state)?;
        let bonus = resolve_effects(
            state.inventory.active_items(),
            TargetType::StageTime,
            ModifierType::Flat,
        );
        let id = ChallengeId(state.nonce);
        let challenge = activate_challenge(id, node, self.descriptor.clone())?
            .with_time_bonus(u32::try_from(bonus).unwrap_or(0));

        let stages = challenge.stage_count();
        state.challenge = Some(challenge);
        Ok(RunOutcome::ChallengeActivated {
            node,
            challenge: id,
            stages,
        })
    }
}

impl EventTransition for BeginChallenge {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let challenge = challenge_mut(state)?;
        challenge.begin()?;
        Ok(RunOutcome::ChallengeStarted {
            challenge: challenge.id(),
        })
    }
}

impl EventTransition for SubmitAnswer {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let challenge = challenge_mut(state)?;
        let outcome = challenge.submit_answer(self.stage, self.answer.clone())?;
        let accepted = challenge
            .records()
            .last()
            .is_some_and(|record| record.accepted);
        Ok(RunOutcome::AnswerRecorded {
            stage: self.stage,
            accepted,
            outcome,
        })
    }
}

impl EventTransition for Tick {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let Some(challenge) = state.challenge.as_mut() else {
            return Ok(RunOutcome::Ticked {
                expired: None,
                remaining: None,
                outcome: None,
            });
        };

        let stage = challenge.current_index();
        let recorded = challenge.records().len();
        let outcome = challenge.advance(self.ticks);
        let expired = (challenge.records().len() > recorded).then_some(stage);

        Ok(RunOutcome::Ticked {
            expired,
            remaining: challenge.remaining_ticks(),
            outcome,
        })
    }
}

impl EventTransition for TimeExpired {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let challenge = challenge_mut(state)?;
        let stage = challenge.current_index();
        let outcome = challenge.time_expired()?;
        Ok(RunOutcome::StageExpired { stage, outcome })
    }
}

impl EventTransition for AcknowledgeOutcome {
    fn apply(&self, state: &mut RunState) -> Result<RunOutcome, RunError> {
        let challenge = challenge_mut(state)?;
        let outcome = challenge.acknowledge()?;
        let node = challenge.node();
        state.challenge = None;

        let resolution = resolve_node(state, node, outcome.success, Some(outcome), Vec::new())?;
        Ok(RunOutcome::NodeResolved(resolution))
    }
}
