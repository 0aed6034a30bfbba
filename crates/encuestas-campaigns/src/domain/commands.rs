//! Commands for the Campaign Lifecycle context.

use chrono::NaiveDate;
use encuestas_core::impl_command;
use uuid::Uuid;

use super::aggregates::CampaignStatus;

/// Command to create a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new campaign.
    pub campaign_id: Uuid,
    /// The campaign name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional first day.
    pub start_date: Option<NaiveDate>,
    /// Optional last day.
    pub end_date: Option<NaiveDate>,
}

/// Command to rename a campaign.
#[derive(Debug, Clone)]
pub struct RenameCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// The new name.
    pub name: String,
}

/// Command to replace a campaign's description.
#[derive(Debug, Clone)]
pub struct ChangeCampaignDescription {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// The new description; `None` or blank clears it.
    pub description: Option<String>,
}

/// Command to change a campaign's dates.
#[derive(Debug, Clone)]
pub struct RescheduleCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    pub end_date: Option<NaiveDate>,
}

/// Command to move a campaign through its lifecycle.
#[derive(Debug, Clone)]
pub struct ChangeCampaignStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// Requested status. `None` is rejected as an invalid transition.
    pub target: Option<CampaignStatus>,
}

/// Command to delete a campaign.
#[derive(Debug, Clone)]
pub struct DeleteCampaign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The campaign identifier.
    pub campaign_id: Uuid,
}

impl_command!(CreateCampaign, "campaigns.create_campaign");
impl_command!(RenameCampaign, "campaigns.rename_campaign");
impl_command!(ChangeCampaignDescription, "campaigns.change_description");
impl_command!(RescheduleCampaign, "campaigns.reschedule_campaign");
impl_command!(ChangeCampaignStatus, "campaigns.change_status");
impl_command!(DeleteCampaign, "campaigns.delete_campaign");
