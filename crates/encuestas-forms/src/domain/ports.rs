//! Outbound ports the Form Authoring handlers depend on, beyond the
//! snapshot repositories.

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use uuid::Uuid;

use super::aggregates::Form;
use super::value_objects::{FormTitle, PublicCode};

/// Answers whether a campaign exists.
#[async_trait]
pub trait CampaignDirectory: Send + Sync {
    /// Returns `true` if `campaign_id` names an existing campaign.
    async fn campaign_exists(&self, campaign_id: Uuid) -> Result<bool, DomainError>;
}

/// Title uniqueness within a campaign.
#[async_trait]
pub trait FormTitleIndex: Send + Sync {
    /// Returns `true` if another form in `campaign_id` already uses `title`.
    /// `excluding` names a form to ignore, so a form does not clash with
    /// itself on rename.
    async fn title_taken(
        &self,
        campaign_id: Uuid,
        title: &FormTitle,
        excluding: Option<Uuid>,
    ) -> Result<bool, DomainError>;
}

/// Counts the questions attached to a form.
#[async_trait]
pub trait QuestionCounter: Send + Sync {
    /// Number of questions across every section of `form_id`.
    async fn count_by_form(&self, form_id: Uuid) -> Result<u64, DomainError>;
}

/// Finds forms by their public link code.
#[async_trait]
pub trait PublicCodeLookup: Send + Sync {
    /// The form carrying `code`, if any.
    async fn find_by_public_code(&self, code: &PublicCode) -> Result<Option<Form>, DomainError>;
}
