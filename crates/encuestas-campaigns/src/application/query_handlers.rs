//! Query handlers for the Campaign Lifecycle context.

use chrono::{DateTime, NaiveDate, Utc};
use encuestas_core::error::DomainError;
use encuestas_core::repository::{AggregateRepository, load_required};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Campaign, CampaignStatus};

/// Read-only view of a campaign.
#[derive(Debug, Serialize)]
pub struct CampaignView {
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// The campaign name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional first day.
    pub start_date: Option<NaiveDate>,
    /// Optional last day.
    pub end_date: Option<NaiveDate>,
    /// Current lifecycle status.
    pub status: CampaignStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&Campaign> for CampaignView {
    fn from(campaign: &Campaign) -> Self {
        Self {
            campaign_id: campaign.id(),
            name: campaign.name().to_string(),
            description: campaign.description().map(str::to_owned),
            start_date: campaign.schedule().start_date(),
            end_date: campaign.schedule().end_date(),
            status: campaign.status(),
            created_at: campaign.created_at(),
            updated_at: campaign.updated_at(),
        }
    }
}

/// Retrieves a campaign by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no campaign exists for the ID, or a
/// repository error.
pub async fn get_campaign_by_id(
    campaign_id: Uuid,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignView, DomainError> {
    let campaign: Campaign = load_required(repo, campaign_id).await?;
    Ok(CampaignView::from(&campaign))
}
