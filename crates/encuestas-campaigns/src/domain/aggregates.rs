//! Aggregate roots for the Campaign Lifecycle context.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use encuestas_core::aggregate::Aggregate;
use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::status::{self, Lifecycle, Transition};
use encuestas_core::text::normalize_optional;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{CampaignName, CampaignSchedule};

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Being prepared; not yet running.
    Draft,
    /// Running.
    Active,
    /// Finished; no longer running.
    Closed,
    /// Retired. Terminal.
    Archived,
}

impl Lifecycle for CampaignStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Active, Self::Archived],
            Self::Active => &[Self::Closed, Self::Archived],
            Self::Closed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "archived" => Ok(Self::Archived),
            other => Err(DomainError::invalid(format!(
                "unknown campaign status: {other}"
            ))),
        }
    }
}

/// A survey campaign grouping one or more forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    id: Uuid,
    name: CampaignName,
    description: Option<String>,
    schedule: CampaignSchedule,
    status: CampaignStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Campaign {
    const KIND: &'static str = "campaign";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Campaign {
    /// Creates a new campaign in `draft`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the name or schedule is
    /// invalid.
    pub fn create(
        id: Uuid,
        name: &str,
        description: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let now = clock.now();
        Ok(Self {
            id,
            name: CampaignName::of(name)?,
            description: normalize_optional(description),
            schedule: CampaignSchedule::of(start_date, end_date)?,
            status: CampaignStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// The campaign identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The campaign name.
    #[must_use]
    pub fn name(&self) -> &CampaignName {
        &self.name
    }

    /// The optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Start and end dates.
    #[must_use]
    pub fn schedule(&self) -> CampaignSchedule {
        self.schedule
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    /// When the campaign was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the campaign last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a renamed snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the name is blank or too
    /// long.
    pub fn rename(&self, name: &str, clock: &dyn Clock) -> Result<Self, DomainError> {
        Ok(Self {
            name: CampaignName::of(name)?,
            updated_at: clock.now(),
            ..self.clone()
        })
    }

    /// Returns a snapshot with the description replaced. Blank clears it.
    #[must_use]
    pub fn change_description(&self, description: Option<String>, clock: &dyn Clock) -> Self {
        Self {
            description: normalize_optional(description),
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    /// Returns a snapshot with new start and end dates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the end precedes the start.
    pub fn reschedule(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            schedule: CampaignSchedule::of(start_date, end_date)?,
            updated_at: clock.now(),
            ..self.clone()
        })
    }

    /// Moves the campaign to `target`.
    ///
    /// A self-transition returns an identical snapshot, `updated_at`
    /// included.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the target is absent or
    /// not reachable from the current status.
    pub fn change_status(
        &self,
        target: Option<CampaignStatus>,
        clock: &dyn Clock,
    ) -> Result<(Self, Transition<CampaignStatus>), DomainError> {
        let outcome = status::transition_to(self.status, target)?;
        let next = match outcome {
            Transition::Unchanged(_) => self.clone(),
            Transition::Changed { to, .. } => Self {
                status: to,
                updated_at: clock.now(),
                ..self.clone()
            },
        };
        Ok((next, outcome))
    }
}
