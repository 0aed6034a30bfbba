//! Command handlers for the Campaign Lifecycle context.
//!
//! Each handler loads the current snapshot through the repository port,
//! applies one domain method, and saves the resulting snapshot.

use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::repository::{AggregateRepository, load_required};
use encuestas_core::status::Transition;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Campaign;
use crate::domain::commands::{
    ChangeCampaignDescription, ChangeCampaignStatus, CreateCampaign, DeleteCampaign,
    RenameCampaign, RescheduleCampaign,
};
use crate::domain::events::{CampaignEvent, CampaignStatusChanged};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct CampaignCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The snapshot after the command.
    pub campaign: Campaign,
    /// Events produced by the command. Empty unless the status changed.
    pub events: Vec<CampaignEvent>,
}

impl CampaignCommandResult {
    fn saved(campaign: Campaign) -> Self {
        Self {
            aggregate_id: campaign.id(),
            campaign,
            events: Vec::new(),
        }
    }
}

/// Handles the `CreateCampaign` command: builds a draft campaign and saves
/// it.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for an invalid name or schedule,
/// or whatever the repository reports on save.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_create_campaign(
    command: &CreateCampaign,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_campaign command");
    let campaign = Campaign::create(
        command.campaign_id,
        &command.name,
        command.description.clone(),
        command.start_date,
        command.end_date,
        clock,
    )?;
    repo.save(&campaign).await?;
    Ok(CampaignCommandResult::saved(campaign))
}

/// Handles the `RenameCampaign` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist,
/// `DomainError::InvalidArgument` for an invalid name, or a repository
/// error.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_rename_campaign(
    command: &RenameCampaign,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling rename_campaign command");
    let campaign: Campaign = load_required(repo, command.campaign_id).await?;
    let renamed = campaign.rename(&command.name, clock)?;
    repo.save(&renamed).await?;
    Ok(CampaignCommandResult::saved(renamed))
}

/// Handles the `ChangeCampaignDescription` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist, or a
/// repository error.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_change_campaign_description(
    command: &ChangeCampaignDescription,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_description command");
    let campaign: Campaign = load_required(repo, command.campaign_id).await?;
    let changed = campaign.change_description(command.description.clone(), clock);
    repo.save(&changed).await?;
    Ok(CampaignCommandResult::saved(changed))
}

/// Handles the `RescheduleCampaign` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist,
/// `DomainError::InvalidArgument` if the end date precedes the start date,
/// or a repository error.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_reschedule_campaign(
    command: &RescheduleCampaign,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling reschedule_campaign command");
    let campaign: Campaign = load_required(repo, command.campaign_id).await?;
    let rescheduled = campaign.reschedule(command.start_date, command.end_date, clock)?;
    repo.save(&rescheduled).await?;
    Ok(CampaignCommandResult::saved(rescheduled))
}

/// Handles the `ChangeCampaignStatus` command.
///
/// A self-transition saves nothing and emits no event.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist,
/// `DomainError::InvalidTransition` for an illegal or absent target, or a
/// repository error.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_change_campaign_status(
    command: &ChangeCampaignStatus,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<CampaignCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_status command");
    let campaign: Campaign = load_required(repo, command.campaign_id).await?;
    let (next, outcome) = campaign.change_status(command.target, clock)?;

    let Transition::Changed { from, to } = outcome else {
        debug!(status = %next.status(), "status unchanged");
        return Ok(CampaignCommandResult::saved(next));
    };

    repo.save(&next).await?;
    let event = CampaignEvent::status_changed(
        CampaignStatusChanged {
            campaign_id: next.id(),
            from,
            to,
            occurred_at: next.updated_at(),
        },
        command.correlation_id,
    );
    Ok(CampaignCommandResult {
        aggregate_id: next.id(),
        campaign: next,
        events: vec![event],
    })
}

/// Handles the `DeleteCampaign` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the campaign does not exist, or a
/// repository error.
#[instrument(skip_all, fields(campaign_id = %command.campaign_id))]
pub async fn handle_delete_campaign(
    command: &DeleteCampaign,
    repo: &dyn AggregateRepository<Campaign>,
) -> Result<(), DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete_campaign command");
    let campaign: Campaign = load_required(repo, command.campaign_id).await?;
    repo.delete(campaign.id()).await
}
