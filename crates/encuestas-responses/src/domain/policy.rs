//! Response rules a form imposes on its submissions.

use chrono::{DateTime, Utc};
use encuestas_core::error::DomainError;
use encuestas_forms::domain::aggregates::{Form, FormStatus};
use encuestas_forms::domain::value_objects::{AvailabilityWindow, ResponseLimitPolicy};
use uuid::Uuid;

use super::aggregates::Submission;
use super::value_objects::{Respondent, SubmissionStatus};

/// The response settings of one form, taken from a form snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    form_id: Uuid,
    status: FormStatus,
    window: AvailabilityWindow,
    limit: ResponseLimitPolicy,
    anonymous_mode: bool,
    allow_edit_before_submit: bool,
}

impl ResponsePolicy {
    /// Reads the response settings of `form`.
    #[must_use]
    pub fn of(form: &Form) -> Self {
        Self {
            form_id: form.id(),
            status: form.status(),
            window: form.window(),
            limit: form.limit_policy(),
            anonymous_mode: form.anonymous_mode(),
            allow_edit_before_submit: form.allow_edit_before_submit(),
        }
    }

    /// The form the rules belong to.
    #[must_use]
    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    /// Checks the form is published and `now` lies inside its window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PolicyViolation` otherwise.
    pub fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != FormStatus::Published {
            return Err(DomainError::PolicyViolation(format!(
                "form {} is {}, not published",
                self.form_id, self.status
            )));
        }
        if let Some(open_at) = self.window.open_at().filter(|open| now < *open) {
            return Err(DomainError::PolicyViolation(format!(
                "form {} opens at {open_at}",
                self.form_id
            )));
        }
        if let Some(close_at) = self.window.close_at().filter(|close| now > *close) {
            return Err(DomainError::PolicyViolation(format!(
                "form {} closed at {close_at}",
                self.form_id
            )));
        }
        Ok(())
    }

    /// Anonymous respondents need a form in anonymous mode. Identified
    /// respondents are always accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PolicyViolation` for an anonymous respondent on
    /// a form outside anonymous mode.
    pub fn ensure_respondent_allowed(&self, respondent: &Respondent) -> Result<(), DomainError> {
        if respondent.is_anonymous() && !self.anonymous_mode {
            return Err(DomainError::PolicyViolation(format!(
                "form {} does not accept anonymous responses",
                self.form_id
            )));
        }
        Ok(())
    }

    /// Checks `respondent` may hand in one more submission, given the
    /// submissions of this form stored so far.
    ///
    /// Anonymous respondents cannot be told apart, so limits do not apply
    /// to them.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PolicyViolation` once the respondent has
    /// reached the per-respondent maximum.
    pub fn ensure_below_limit(
        &self,
        respondent: &Respondent,
        existing: &[Submission],
    ) -> Result<(), DomainError> {
        let Some(max) = self.limit.max_responses_per_user() else {
            return Ok(());
        };
        if respondent.is_anonymous() {
            return Ok(());
        }
        let submitted = count_submitted_by(self.form_id, respondent, existing);
        if submitted >= max {
            return Err(DomainError::PolicyViolation(format!(
                "{} response limit reached: {submitted} of {max}",
                self.limit.mode()
            )));
        }
        Ok(())
    }

    /// Without `allow_edit_before_submit`, a saved answer is final even
    /// before the submission is handed in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PolicyViolation` when the form forbids editing
    /// and `question_id` already has an answer.
    pub fn ensure_answer_editable(
        &self,
        submission: &Submission,
        question_id: Uuid,
    ) -> Result<(), DomainError> {
        if !self.allow_edit_before_submit && submission.answer(question_id).is_some() {
            return Err(DomainError::PolicyViolation(format!(
                "form {} does not allow changing an answer before submitting",
                self.form_id
            )));
        }
        Ok(())
    }
}

/// Submitted submissions of `form_id` by `respondent`.
#[must_use]
pub fn count_submitted_by(
    form_id: Uuid,
    respondent: &Respondent,
    submissions: &[Submission],
) -> u32 {
    let count = submissions
        .iter()
        .filter(|s| {
            s.form_id() == form_id
                && s.status() == SubmissionStatus::Submitted
                && s.respondent() == respondent
        })
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
