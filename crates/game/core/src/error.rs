//! Common error infrastructure for game-core.
//!
//! This module provides shared types and traits used across all error types in game-core.
//! Domain-specific errors are defined next to the rules they guard:
//! [`ConfigurationError`](crate::map::ConfigurationError) for map generation,
//! [`StateConflictError`](crate::graph::StateConflictError) for illegal transitions and
//! [`ValidationError`](crate::challenge::ValidationError) for malformed answers or
//! challenge descriptors.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each rule family has its own error type with specific variants
//! - **Local Recovery**: Every error leaves the prior state untouched
//! - **Severity Classification**: Errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The request conflicts with the current state; a different request may succeed
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry with an alternative request.
    ///
    /// Examples: node locked, another node already active
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: numeric answer for a selection stage, zero node weights
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: more than one active node after a transition
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization in logs and for asserting in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
