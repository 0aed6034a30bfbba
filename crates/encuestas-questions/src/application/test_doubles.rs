//! Port doubles shared by this crate's handler tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use encuestas_core::error::DomainError;
use uuid::Uuid;

use crate::domain::ports::{FormDirectory, SectionDirectory};

/// Form directory over a fixed set of ids.
pub(crate) struct KnownForms(pub HashSet<Uuid>);

impl KnownForms {
    pub(crate) fn of(ids: &[Uuid]) -> Self {
        Self(ids.iter().copied().collect())
    }
}

#[async_trait]
impl FormDirectory for KnownForms {
    async fn form_exists(&self, form_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.0.contains(&form_id))
    }
}

/// Section directory over `(section_id, form_id)` pairs.
pub(crate) struct SectionOwners(pub HashMap<Uuid, Uuid>);

impl SectionOwners {
    pub(crate) fn of(pairs: &[(Uuid, Uuid)]) -> Self {
        Self(pairs.iter().copied().collect())
    }
}

#[async_trait]
impl SectionDirectory for SectionOwners {
    async fn section_belongs_to_form(
        &self,
        form_id: Uuid,
        section_id: Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self.0.get(&section_id) == Some(&form_id))
    }
}
