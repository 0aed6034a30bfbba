//! Domain events for the Response Collection context.

use chrono::{DateTime, Utc};
use encuestas_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Respondent;

/// Event type for [`SubmissionSubmitted`].
pub const SUBMISSION_SUBMITTED_EVENT_TYPE: &str = "responses.submission_submitted";

/// Event type for [`ResponseLimitReached`].
pub const RESPONSE_LIMIT_REACHED_EVENT_TYPE: &str = "responses.limit_reached";

/// Emitted when a submission is handed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSubmitted {
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The form answered.
    pub form_id: Uuid,
    /// Who answered.
    pub respondent: Respondent,
    /// Number of answered questions.
    pub answer_count: usize,
    /// When the submission was handed in.
    pub occurred_at: DateTime<Utc>,
}

/// Emitted when a submission uses up the respondent's last allowed
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLimitReached {
    /// The form answered.
    pub form_id: Uuid,
    /// The respondent who reached the limit.
    pub respondent: Respondent,
    /// The per-respondent maximum.
    pub limit: u32,
    /// When the limit was reached.
    pub occurred_at: DateTime<Utc>,
}

/// Event payload variants for the Response Collection context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseEventKind {
    /// A submission was handed in.
    SubmissionSubmitted(SubmissionSubmitted),
    /// A respondent used up their responses.
    ResponseLimitReached(ResponseLimitReached),
}

/// Domain event envelope for the Response Collection context.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ResponseEventKind,
}

impl ResponseEvent {
    /// Wraps a hand-in in an envelope.
    #[must_use]
    pub fn submitted(event: SubmissionSubmitted, correlation_id: Uuid) -> Self {
        Self {
            metadata: EventMetadata::new(
                SUBMISSION_SUBMITTED_EVENT_TYPE,
                event.submission_id,
                correlation_id,
                event.occurred_at,
            ),
            kind: ResponseEventKind::SubmissionSubmitted(event),
        }
    }

    /// Wraps a reached limit in an envelope. The form is the aggregate.
    #[must_use]
    pub fn limit_reached(event: ResponseLimitReached, correlation_id: Uuid) -> Self {
        Self {
            metadata: EventMetadata::new(
                RESPONSE_LIMIT_REACHED_EVENT_TYPE,
                event.form_id,
                correlation_id,
                event.occurred_at,
            ),
            kind: ResponseEventKind::ResponseLimitReached(event),
        }
    }
}

impl DomainEvent for ResponseEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ResponseEventKind::SubmissionSubmitted(_) => SUBMISSION_SUBMITTED_EVENT_TYPE,
            ResponseEventKind::ResponseLimitReached(_) => RESPONSE_LIMIT_REACHED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
