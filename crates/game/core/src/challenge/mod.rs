//! Per-node challenge stage machine.
//!
//! ```text
//! Introduction --begin--> Challenge --last answer / timeout--> Outcome --acknowledge--> Completed | Failed
//! ```
//!
//! The machine only produces a [`ChallengeOutcome`]; the caller decides what
//! that means for the map and the ledger.

mod descriptor;
mod errors;
mod grade;
mod stage;

pub use descriptor::{ChallengeDescriptor, ChallengeKind};
pub use errors::ValidationError;
pub use grade::Grade;
pub use stage::{ImagingStage, NumericStage, SelectionStage, Stage, StageAnswer, StageKind};

use crate::map::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeId(pub u64);

impl core::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "challenge#{}", self.0)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChallengePhase {
    Introduction,
    Challenge,
    Outcome,
    Completed,
    Failed,
}

impl ChallengePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// What happened on one stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageRecord {
    /// `None` when the stage ran out of time.
    pub answer: Option<StageAnswer>,
    pub accepted: bool,
    /// Ticks spent on the stage.
    pub elapsed: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeOutcome {
    pub completed: bool,
    pub grade: Grade,
    pub success: bool,
    pub accepted: u32,
    pub total: u32,
}

/// Live challenge for the active node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeState {
    id: ChallengeId,
    node: NodeId,
    kind: ChallengeKind,
    title: String,
    stages: Vec<Stage>,
    success_threshold: Grade,
    phase: ChallengePhase,
    current: usize,
    records: Vec<StageRecord>,
    /// Ticks spent on the current stage.
    elapsed: u32,
    /// Extra ticks granted to every timed stage.
    time_bonus: u32,
    outcome: Option<ChallengeOutcome>,
}

/// Starts a challenge for `node` in the introduction phase.
pub fn activate_challenge(
    id: ChallengeId,
    node: NodeId,
    descriptor: ChallengeDescriptor,
) -> Result<ChallengeState, ValidationError> {
    descriptor.validate()?;
    let (kind, title, stages, success_threshold) = descriptor.into_parts();
    let records = Vec::with_capacity(stages.len());

    Ok(ChallengeState {
        id,
        node,
        kind,
        title,
        stages,
        success_threshold,
        phase: ChallengePhase::Introduction,
        current: 0,
        records,
        elapsed: 0,
        time_bonus: 0,
        outcome: None,
    })
}

impl ChallengeState {
    /// Grants extra ticks to every timed stage.
    pub fn with_time_bonus(mut self, ticks: u32) -> Self {
        self.time_bonus = ticks;
        self
    }

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> ChallengeKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        match self.phase {
            ChallengePhase::Challenge => self.stages.get(self.current),
            _ => None,
        }
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn outcome(&self) -> Option<ChallengeOutcome> {
        self.outcome
    }

    pub fn time_bonus(&self) -> u32 {
        self.time_bonus
    }

    /// Ticks left on the current stage, `None` when it is untimed.
    pub fn remaining_ticks(&self) -> Option<u32> {
        let limit = self.current_limit()?;
        Some(limit.saturating_sub(self.elapsed))
    }

    /// Introduction → Challenge.
    pub fn begin(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(ChallengePhase::Introduction)?;
        self.phase = ChallengePhase::Challenge;
        self.elapsed = 0;
        Ok(())
    }

    /// Records an answer for `stage`, which must be the current stage.
    ///
    /// Returns the outcome when the answer finished the last stage. Errors
    /// leave the state untouched.
    pub fn submit_answer(
        &mut self,
        stage: usize,
        answer: StageAnswer,
    ) -> Result<Option<ChallengeOutcome>, ValidationError> {
        if self.phase != ChallengePhase::Challenge {
            return Err(ValidationError::NotAcceptingAnswers(self.phase));
        }
        if stage != self.current {
            return Err(ValidationError::StageMismatch {
                expected: self.current,
                found: stage,
            });
        }

        let accepted = self.stages[self.current].evaluate(&answer)?;
        Ok(self.record(Some(answer), accepted))
    }

    /// Feeds elapsed ticks to the current stage's countdown.
    ///
    /// Ticks outside the challenge phase, or on untimed stages, are ignored.
    /// When the budget runs out the stage is recorded as not accepted;
    /// surplus ticks do not carry into the next stage.
    pub fn advance(&mut self, elapsed_ticks: u32) -> Option<ChallengeOutcome> {
        if self.phase != ChallengePhase::Challenge {
            return None;
        }
        let limit = self.current_limit()?;
        self.elapsed = self.elapsed.saturating_add(elapsed_ticks);
        if self.elapsed < limit {
            return None;
        }
        self.elapsed = limit;
        self.record(None, false)
    }

    /// Expires the current stage immediately, timed or not.
    pub fn time_expired(&mut self) -> Result<Option<ChallengeOutcome>, ValidationError> {
        if self.phase != ChallengePhase::Challenge {
            return Err(ValidationError::NotAcceptingAnswers(self.phase));
        }
        Ok(self.record(None, false))
    }

    /// Outcome → Completed or Failed.
    pub fn acknowledge(&mut self) -> Result<ChallengeOutcome, ValidationError> {
        self.expect_phase(ChallengePhase::Outcome)?;
        let outcome = self.finalize();
        self.phase = if outcome.success {
            ChallengePhase::Completed
        } else {
            ChallengePhase::Failed
        };
        Ok(outcome)
    }

    fn expect_phase(&self, expected: ChallengePhase) -> Result<(), ValidationError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ValidationError::WrongPhase {
                expected,
                found: self.phase,
            })
        }
    }

    fn current_limit(&self) -> Option<u32> {
        self.current_stage()?
            .time_limit()
            .map(|limit| limit.saturating_add(self.time_bonus))
    }

    fn record(&mut self, answer: Option<StageAnswer>, accepted: bool) -> Option<ChallengeOutcome> {
        self.records.push(StageRecord {
            answer,
            accepted,
            elapsed: self.elapsed,
        });
        self.elapsed = 0;

        if self.current + 1 < self.stages.len() {
            self.current += 1;
            return None;
        }

        self.phase = ChallengePhase::Outcome;
        Some(self.finalize())
    }

    fn finalize(&mut self) -> ChallengeOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let total = u32::try_from(self.stages.len()).unwrap_or(u32::MAX);
        let accepted = self.records.iter().filter(|record| record.accepted).count();
        let accepted = u32::try_from(accepted).unwrap_or(u32::MAX);
        let grade = Grade::from_counts(accepted, total);

        let outcome = ChallengeOutcome {
            completed: true,
            grade,
            success: grade >= self.success_threshold,
            accepted,
            total,
        };
        self.outcome = Some(outcome);
        outcome
    }
}
