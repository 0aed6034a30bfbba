//! Outbound ports the Question Authoring handlers depend on.

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use uuid::Uuid;

/// Answers whether a form exists.
#[async_trait]
pub trait FormDirectory: Send + Sync {
    /// Returns `true` if `form_id` names an existing form.
    async fn form_exists(&self, form_id: Uuid) -> Result<bool, DomainError>;
}

/// Answers section ownership questions.
#[async_trait]
pub trait SectionDirectory: Send + Sync {
    /// Returns `true` if `section_id` exists and belongs to `form_id`.
    async fn section_belongs_to_form(
        &self,
        form_id: Uuid,
        section_id: Uuid,
    ) -> Result<bool, DomainError>;
}
