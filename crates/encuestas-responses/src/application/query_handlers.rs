//! Query handlers for the Response Collection context.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use encuestas_core::error::DomainError;
use encuestas_core::repository::{AggregateRepository, load_required};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Submission;
use crate::domain::answers::Answer;
use crate::domain::ports::{QuestionCatalog, SubmissionIndex};
use crate::domain::validation::{AnswerViolation, validate_submission};
use crate::domain::value_objects::{Respondent, SubmissionStatus};

/// Read-only view of a submission.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The form answered.
    pub form_id: Uuid,
    /// Who answers.
    pub respondent: Respondent,
    /// Draft or submitted.
    pub status: SubmissionStatus,
    /// Answers by question.
    pub answers: BTreeMap<Uuid, Answer>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Hand-in time, once submitted.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<&Submission> for SubmissionView {
    fn from(submission: &Submission) -> Self {
        Self {
            submission_id: submission.id(),
            form_id: submission.form_id(),
            respondent: submission.respondent().clone(),
            status: submission.status(),
            answers: submission.answers().clone(),
            created_at: submission.created_at(),
            updated_at: submission.updated_at(),
            submitted_at: submission.submitted_at(),
        }
    }
}

/// Retrieves a submission by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no submission exists for the ID, or a
/// repository error.
pub async fn get_submission(
    submission_id: Uuid,
    repo: &dyn AggregateRepository<Submission>,
) -> Result<SubmissionView, DomainError> {
    let submission: Submission = load_required(repo, submission_id).await?;
    Ok(SubmissionView::from(&submission))
}

/// Lists a form's submissions, oldest first, optionally only those in
/// `status`.
///
/// # Errors
///
/// Returns an index error.
pub async fn list_submissions(
    form_id: Uuid,
    status: Option<SubmissionStatus>,
    index: &dyn SubmissionIndex,
) -> Result<Vec<SubmissionView>, DomainError> {
    let mut found = index.list_by_form(form_id).await?;
    found.retain(|s| status.is_none_or(|wanted| s.status() == wanted));
    found.sort_by_key(|s| (s.created_at(), s.id()));
    Ok(found.iter().map(SubmissionView::from).collect())
}

/// Runs the hand-in validation without handing in, so a respondent can see
/// every problem with a draft. An empty list means the answers would pass.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown submission, or a port
/// error.
pub async fn check_submission(
    submission_id: Uuid,
    repo: &dyn AggregateRepository<Submission>,
    questions: &dyn QuestionCatalog,
) -> Result<Vec<AnswerViolation>, DomainError> {
    let submission: Submission = load_required(repo, submission_id).await?;
    let questions = questions.questions_of_form(submission.form_id()).await?;
    Ok(validate_submission(&submission, &questions))
}
