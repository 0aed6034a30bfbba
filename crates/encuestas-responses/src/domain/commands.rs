//! Commands for the Response Collection context.

use encuestas_core::impl_command;
use uuid::Uuid;

use super::value_objects::Respondent;

/// Command to open a submission on a published form.
#[derive(Debug, Clone)]
pub struct StartSubmission {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new submission.
    pub submission_id: Uuid,
    /// The form being answered.
    pub form_id: Uuid,
    /// Who is answering.
    pub respondent: Respondent,
}

/// Command to save the selected options of a choice question.
#[derive(Debug, Clone)]
pub struct SaveChoiceAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The question being answered.
    pub question_id: Uuid,
    /// Zero-based indexes of the selected options.
    pub selected: Vec<u32>,
}

/// Command to save the answer to a true/false question.
#[derive(Debug, Clone)]
pub struct SaveTrueFalseAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The question being answered.
    pub question_id: Uuid,
    /// The chosen value.
    pub value: bool,
}

/// Command to save the answer to a text question.
#[derive(Debug, Clone)]
pub struct SaveTextAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The question being answered.
    pub question_id: Uuid,
    /// The text, as typed.
    pub text: String,
}

/// Command to save the pairs of a matching question.
#[derive(Debug, Clone)]
pub struct SaveMatchingAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The question being answered.
    pub question_id: Uuid,
    /// `(left item id, right item id)` pairs.
    pub pairs: Vec<(Uuid, Uuid)>,
}

/// Command to drop the answer to one question.
#[derive(Debug, Clone)]
pub struct RemoveAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
    /// The question whose answer is dropped.
    pub question_id: Uuid,
}

/// Command to validate and hand in a submission.
#[derive(Debug, Clone)]
pub struct SubmitSubmission {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
}

/// Command to delete a submission.
#[derive(Debug, Clone)]
pub struct DeleteSubmission {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submission identifier.
    pub submission_id: Uuid,
}

impl_command!(StartSubmission, "responses.start_submission");
impl_command!(SaveChoiceAnswer, "responses.save_choice_answer");
impl_command!(SaveTrueFalseAnswer, "responses.save_true_false_answer");
impl_command!(SaveTextAnswer, "responses.save_text_answer");
impl_command!(SaveMatchingAnswer, "responses.save_matching_answer");
impl_command!(RemoveAnswer, "responses.remove_answer");
impl_command!(SubmitSubmission, "responses.submit_submission");
impl_command!(DeleteSubmission, "responses.delete_submission");
