//! Challenge validation errors.

use crate::error::{ErrorSeverity, GameError};
use crate::map::NodeType;

use super::ChallengePhase;
use super::descriptor::ChallengeKind;
use super::stage::StageKind;

/// A malformed descriptor, a malformed answer, or an answer submitted at the
/// wrong moment. The challenge state is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    #[error("challenge has no stages")]
    EmptyStages,

    #[error("{kind} challenge cannot contain a {found} stage (stage {stage})")]
    StageKindNotAllowed {
        kind: ChallengeKind,
        stage: usize,
        found: StageKind,
    },

    #[error("stage {stage} offers no choices")]
    NoChoices { stage: usize },

    #[error("stage {stage} has no correct answer")]
    EmptyAnswerKey { stage: usize },

    #[error("tolerance of {tolerance_pct}% exceeds 100%")]
    InvalidTolerance { tolerance_pct: u32 },

    #[error("choice {choice} is out of range for {count} choices")]
    ChoiceOutOfRange { choice: u32, count: u32 },

    #[error("single-select stage expects exactly one choice, got {given}")]
    SingleSelectArity { given: usize },

    #[error("numeric answers must be finite")]
    NonFiniteNumber,

    #[error("expected a {expected} answer, got {found}")]
    AnswerShape { expected: StageKind, found: StageKind },

    #[error("answer targets stage {found} but stage {expected} is current")]
    StageMismatch { expected: usize, found: usize },

    #[error("challenge is not accepting answers during {0}")]
    NotAcceptingAnswers(ChallengePhase),

    #[error("challenge is in {found}, expected {expected}")]
    WrongPhase {
        expected: ChallengePhase,
        found: ChallengePhase,
    },

    #[error("{kind} challenge cannot run on a {node_type} node")]
    DescriptorMismatch {
        node_type: NodeType,
        kind: ChallengeKind,
    },
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyStages => "VALIDATION_EMPTY_STAGES",
            Self::StageKindNotAllowed { .. } => "VALIDATION_STAGE_KIND",
            Self::NoChoices { .. } => "VALIDATION_NO_CHOICES",
            Self::EmptyAnswerKey { .. } => "VALIDATION_EMPTY_ANSWER_KEY",
            Self::InvalidTolerance { .. } => "VALIDATION_INVALID_TOLERANCE",
            Self::ChoiceOutOfRange { .. } => "VALIDATION_CHOICE_OUT_OF_RANGE",
            Self::SingleSelectArity { .. } => "VALIDATION_SINGLE_SELECT_ARITY",
            Self::NonFiniteNumber => "VALIDATION_NON_FINITE_NUMBER",
            Self::AnswerShape { .. } => "VALIDATION_ANSWER_SHAPE",
            Self::StageMismatch { .. } => "VALIDATION_STAGE_MISMATCH",
            Self::NotAcceptingAnswers(_) => "VALIDATION_NOT_ACCEPTING_ANSWERS",
            Self::WrongPhase { .. } => "VALIDATION_WRONG_PHASE",
            Self::DescriptorMismatch { .. } => "VALIDATION_DESCRIPTOR_MISMATCH",
        }
    }
}
