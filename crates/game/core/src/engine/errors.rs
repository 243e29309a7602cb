//! Error types for the event pipeline.

use crate::challenge::ValidationError;
use crate::error::{ErrorSeverity, GameError};
use crate::graph::StateConflictError;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Failure inside a single transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunError {
    #[error(transparent)]
    Conflict(#[from] StateConflictError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl GameError for RunError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Conflict(error) => error.severity(),
            Self::Validation(error) => error.severity(),
            Self::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(error) => error.error_code(),
            Self::Validation(error) => error.error_code(),
            Self::Invariant(_) => "RUN_INVARIANT",
        }
    }
}

/// Errors surfaced while executing an event through the run engine.
///
/// The run state is restored to its pre-event value before this is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{event} failed during {phase}: {error}")]
pub struct ExecuteError {
    pub event: String,
    pub phase: TransitionPhase,
    pub error: RunError,
}

impl ExecuteError {
    pub fn new(event: &str, phase: TransitionPhase, error: RunError) -> Self {
        Self {
            event: event.to_string(),
            phase,
            error,
        }
    }

    pub fn conflict(&self) -> Option<&StateConflictError> {
        match &self.error {
            RunError::Conflict(error) => Some(error),
            _ => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match &self.error {
            RunError::Validation(error) => Some(error),
            _ => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
