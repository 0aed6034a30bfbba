//! Port doubles shared by this crate's handler tests.

use std::collections::HashSet;

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use encuestas_test_support::InMemoryRepository;
use uuid::Uuid;

use crate::domain::aggregates::Form;
use crate::domain::ports::{CampaignDirectory, FormTitleIndex, PublicCodeLookup, QuestionCounter};
use crate::domain::value_objects::{FormTitle, PublicCode};

/// Campaign directory over a fixed set of ids.
pub(crate) struct KnownCampaigns(pub HashSet<Uuid>);

impl KnownCampaigns {
    pub(crate) fn of(ids: &[Uuid]) -> Self {
        Self(ids.iter().copied().collect())
    }
}

#[async_trait]
impl CampaignDirectory for KnownCampaigns {
    async fn campaign_exists(&self, campaign_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.0.contains(&campaign_id))
    }
}

/// Question counter that reports the same count for every form.
pub(crate) struct FixedQuestionCount(pub u64);

#[async_trait]
impl QuestionCounter for FixedQuestionCount {
    async fn count_by_form(&self, _form_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.0)
    }
}

#[async_trait]
impl FormTitleIndex for InMemoryRepository<Form> {
    async fn title_taken(
        &self,
        campaign_id: Uuid,
        title: &FormTitle,
        excluding: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        Ok(self.all().iter().any(|f| {
            f.campaign_id() == campaign_id && f.title() == title && Some(f.id()) != excluding
        }))
    }
}

#[async_trait]
impl PublicCodeLookup for InMemoryRepository<Form> {
    async fn find_by_public_code(&self, code: &PublicCode) -> Result<Option<Form>, DomainError> {
        Ok(self
            .all()
            .into_iter()
            .find(|f| f.public_code() == Some(code)))
    }
}
