//! Value objects for the Campaign Lifecycle context.

use chrono::NaiveDate;
use encuestas_core::error::DomainError;
use encuestas_core::text::required_text;
use serde::{Deserialize, Serialize};

/// Maximum campaign name length, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// A trimmed, non-blank campaign name of at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CampaignName(String);

impl CampaignName {
    /// Validates and normalises a campaign name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the name is blank or too
    /// long.
    pub fn of(value: &str) -> Result<Self, DomainError> {
        required_text("campaign name", value, MAX_NAME_CHARS).map(Self)
    }

    /// The normalised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CampaignName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<CampaignName> for String {
    fn from(name: CampaignName) -> Self {
        name.0
    }
}

impl std::fmt::Display for CampaignName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct RawSchedule {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Optional start and end dates, with `end_date >= start_date` when both
/// are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct CampaignSchedule {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl CampaignSchedule {
    /// Validates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `end_date` precedes
    /// `start_date`.
    pub fn of(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(DomainError::invalid(format!(
                    "end date {end} is before start date {start}"
                )));
            }
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// First day of the campaign, if scheduled.
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Last day of the campaign, if scheduled.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl TryFrom<RawSchedule> for CampaignSchedule {
    type Error = DomainError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Self::of(raw.start_date, raw.end_date)
    }
}
