//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every variant is raised synchronously at the point of violation. Domain
/// methods only ever return new snapshots, so a failure never leaves a
/// partially mutated aggregate behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: Uuid,
    },

    /// Malformed value-object input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Illegal lifecycle status change.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the entity is currently in.
        from: String,
        /// Requested target status (`none` when absent).
        to: String,
    },

    /// A child belongs to a different parent than the one claimed.
    #[error("{child_id} does not belong to {parent_id}")]
    OwnershipMismatch {
        /// The child entity.
        child_id: Uuid,
        /// The parent the caller claimed.
        parent_id: Uuid,
    },

    /// A matching answer key failed the totality or membership checks.
    #[error("invalid matching key: {0}")]
    InvalidMatchingKey(String),

    /// An operation was applied to the wrong question kind.
    #[error("operation requires a {expected} question, found {actual}")]
    WrongVariant {
        /// The kind(s) the operation applies to.
        expected: &'static str,
        /// The kind of the question it was applied to.
        actual: &'static str,
    },

    /// A form cannot be published while it has no questions.
    #[error("form {0} cannot be published without questions")]
    PublishWithoutQuestions(Uuid),

    /// A form's response rules refuse the request (closed window,
    /// anonymous respondent, limit reached).
    #[error("response policy violation: {0}")]
    PolicyViolation(String),

    /// A submission failed answer validation. Each entry reads
    /// `"<question_id>: <code>: <message>"`.
    #[error("submission {submission_id} has {count} invalid answer(s)", count = .violations.len())]
    InvalidSubmission {
        /// The rejected submission.
        submission_id: Uuid,
        /// One line per violation.
        violations: Vec<String>,
    },

    /// A submitted submission can no longer change.
    #[error("submission {0} was already submitted")]
    SubmissionLocked(Uuid),

    /// A uniqueness rule was violated.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Optimistic concurrency conflict reported by a save port.
    #[error("concurrency conflict on aggregate {aggregate_id}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}
