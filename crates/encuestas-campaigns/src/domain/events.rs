//! Domain events for the Campaign Lifecycle context.

use chrono::{DateTime, Utc};
use encuestas_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregates::CampaignStatus;

/// Event type for [`CampaignStatusChanged`].
pub const CAMPAIGN_STATUS_CHANGED_EVENT_TYPE: &str = "campaigns.status_changed";

/// Emitted when a campaign moves to a different lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStatusChanged {
    /// The campaign identifier.
    pub campaign_id: Uuid,
    /// Status before the change.
    pub from: CampaignStatus,
    /// Status after the change.
    pub to: CampaignStatus,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}

/// Event payload variants for the Campaign Lifecycle context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignEventKind {
    /// A campaign changed status.
    CampaignStatusChanged(CampaignStatusChanged),
}

/// Domain event envelope for the Campaign Lifecycle context.
#[derive(Debug, Clone)]
pub struct CampaignEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CampaignEventKind,
}

impl CampaignEvent {
    /// Wraps a status change in an envelope.
    #[must_use]
    pub fn status_changed(change: CampaignStatusChanged, correlation_id: Uuid) -> Self {
        Self {
            metadata: EventMetadata::new(
                CAMPAIGN_STATUS_CHANGED_EVENT_TYPE,
                change.campaign_id,
                correlation_id,
                change.occurred_at,
            ),
            kind: CampaignEventKind::CampaignStatusChanged(change),
        }
    }
}

impl DomainEvent for CampaignEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            CampaignEventKind::CampaignStatusChanged(_) => CAMPAIGN_STATUS_CHANGED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
