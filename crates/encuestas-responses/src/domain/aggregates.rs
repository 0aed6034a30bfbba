//! The Submission aggregate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use encuestas_core::aggregate::Aggregate;
use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::status;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::Answer;
use super::value_objects::{Respondent, SubmissionStatus};

/// One respondent's pass through a form.
///
/// Answers are keyed by question id, so saving an answer for a question
/// replaces the previous one. Once submitted, nothing changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    id: Uuid,
    form_id: Uuid,
    respondent: Respondent,
    status: SubmissionStatus,
    answers: BTreeMap<Uuid, Answer>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Aggregate for Submission {
    const KIND: &'static str = "submission";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Submission {
    /// Opens a draft submission with no answers.
    #[must_use]
    pub fn start(id: Uuid, form_id: Uuid, respondent: Respondent, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            form_id,
            respondent,
            status: SubmissionStatus::Draft,
            answers: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
        }
    }

    /// The submission identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The form being answered.
    #[must_use]
    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    /// Who is answering.
    #[must_use]
    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Every saved answer, keyed by question id.
    #[must_use]
    pub fn answers(&self) -> &BTreeMap<Uuid, Answer> {
        &self.answers
    }

    /// The saved answer for `question_id`, if any.
    #[must_use]
    pub fn answer(&self, question_id: Uuid) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    /// When the submission was started.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When an answer last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// When the submission was handed in.
    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status == SubmissionStatus::Submitted {
            return Err(DomainError::SubmissionLocked(self.id));
        }
        Ok(())
    }

    /// Saves `answer` for `question_id`, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionLocked` once submitted.
    pub fn save_answer(
        &self,
        question_id: Uuid,
        answer: Answer,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        self.ensure_editable()?;
        let mut answers = self.answers.clone();
        answers.insert(question_id, answer);
        Ok(Self {
            answers,
            updated_at: clock.now(),
            ..self.clone()
        })
    }

    /// Drops the answer for `question_id`. Dropping a missing answer is a
    /// no-op and keeps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionLocked` once submitted.
    pub fn remove_answer(&self, question_id: Uuid, clock: &dyn Clock) -> Result<Self, DomainError> {
        self.ensure_editable()?;
        if !self.answers.contains_key(&question_id) {
            return Ok(self.clone());
        }
        let mut answers = self.answers.clone();
        answers.remove(&question_id);
        Ok(Self {
            answers,
            updated_at: clock.now(),
            ..self.clone()
        })
    }

    /// Marks the submission as handed in. Callers validate answers and
    /// response rules first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionLocked` if it was already submitted.
    pub fn submit(&self, clock: &dyn Clock) -> Result<Self, DomainError> {
        self.ensure_editable()?;
        let outcome = status::transition(self.status, SubmissionStatus::Submitted)?;
        let now = clock.now();
        Ok(Self {
            status: outcome.target(),
            submitted_at: Some(now),
            updated_at: now,
            ..self.clone()
        })
    }
}
