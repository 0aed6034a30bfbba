//! Port doubles shared by this crate's handler tests.

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use encuestas_questions::domain::aggregates::Question;
use encuestas_test_support::InMemoryRepository;
use uuid::Uuid;

use crate::domain::aggregates::Submission;
use crate::domain::ports::{QuestionCatalog, SubmissionIndex};

#[async_trait]
impl QuestionCatalog for InMemoryRepository<Question> {
    async fn questions_of_form(&self, form_id: Uuid) -> Result<Vec<Question>, DomainError> {
        Ok(self
            .all()
            .into_iter()
            .filter(|q| q.form_id() == form_id)
            .collect())
    }
}

#[async_trait]
impl SubmissionIndex for InMemoryRepository<Submission> {
    async fn list_by_form(&self, form_id: Uuid) -> Result<Vec<Submission>, DomainError> {
        Ok(self
            .all()
            .into_iter()
            .filter(|s| s.form_id() == form_id)
            .collect())
    }
}
