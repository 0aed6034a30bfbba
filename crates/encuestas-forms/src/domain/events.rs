//! Domain events for the Form Authoring context.

use chrono::{DateTime, Utc};
use encuestas_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregates::FormStatus;

/// Event type for [`FormStatusChanged`].
pub const FORM_STATUS_CHANGED_EVENT_TYPE: &str = "forms.status_changed";

/// Emitted when a form moves to a different lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatusChanged {
    /// The form identifier.
    pub form_id: Uuid,
    /// Status before the change.
    pub from: FormStatus,
    /// Status after the change.
    pub to: FormStatus,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}

/// Event payload variants for the Form Authoring context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormEventKind {
    /// A form changed status.
    FormStatusChanged(FormStatusChanged),
}

/// Domain event envelope for the Form Authoring context.
#[derive(Debug, Clone)]
pub struct FormEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: FormEventKind,
}

impl FormEvent {
    /// Wraps a status change in an envelope.
    #[must_use]
    pub fn status_changed(change: FormStatusChanged, correlation_id: Uuid) -> Self {
        Self {
            metadata: EventMetadata::new(
                FORM_STATUS_CHANGED_EVENT_TYPE,
                change.form_id,
                correlation_id,
                change.occurred_at,
            ),
            kind: FormEventKind::FormStatusChanged(change),
        }
    }
}

impl DomainEvent for FormEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            FormEventKind::FormStatusChanged(_) => FORM_STATUS_CHANGED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
