//! Outbound ports the Response Collection handlers depend on, beyond the
//! snapshot repositories.

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use encuestas_questions::domain::aggregates::Question;
use uuid::Uuid;

use super::aggregates::Submission;

/// Reads the questions a submission is checked against.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// Every question of `form_id`, across all of its sections.
    async fn questions_of_form(&self, form_id: Uuid) -> Result<Vec<Question>, DomainError>;
}

/// Finds the submissions of a form.
#[async_trait]
pub trait SubmissionIndex: Send + Sync {
    /// Every submission of `form_id`, drafts included, in any order.
    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Submission>, DomainError>;
}
