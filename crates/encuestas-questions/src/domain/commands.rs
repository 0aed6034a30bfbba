//! Commands for the Question Authoring context.

use std::collections::BTreeMap;

use encuestas_core::impl_command;
use uuid::Uuid;

use super::value_objects::{SelectionMode, TextMode};

/// Fields shared by every question-creating command.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    /// Identifier for the new question.
    pub question_id: Uuid,
    /// The owning form.
    pub form_id: Uuid,
    /// The section the question is appended to.
    pub section_id: Uuid,
    /// The question text.
    pub prompt: String,
    /// Optional help text.
    pub help_text: Option<String>,
    /// Whether an answer is mandatory.
    pub required: bool,
}

/// An unvalidated choice option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInput {
    /// The label shown to respondents.
    pub label: String,
    /// Whether the option is correct.
    pub is_correct: bool,
}

/// Command to append a choice question to a section.
#[derive(Debug, Clone)]
pub struct CreateChoiceQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Shared question fields.
    pub question: NewQuestion,
    /// Single or multi selection.
    pub mode: SelectionMode,
    /// Options in display order.
    pub options: Vec<OptionInput>,
    /// Lower selection bound (MULTI only).
    pub min_selections: Option<u32>,
    /// Upper selection bound (MULTI only).
    pub max_selections: Option<u32>,
    /// Whether options are shuffled.
    pub shuffle_options: bool,
}

/// Command to append a true/false question to a section.
#[derive(Debug, Clone)]
pub struct CreateTrueFalseQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Shared question fields.
    pub question: NewQuestion,
    /// Whether "true" is the correct answer.
    pub true_is_correct: bool,
    /// Label of the "true" option; blank uses the default.
    pub true_label: Option<String>,
    /// Label of the "false" option; blank uses the default.
    pub false_label: Option<String>,
    /// Whether options are shuffled.
    pub shuffle_options: bool,
}

/// Command to append a free-text question to a section.
#[derive(Debug, Clone)]
pub struct CreateTextQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Shared question fields.
    pub question: NewQuestion,
    /// Expected answer shape.
    pub mode: TextMode,
    /// Input placeholder.
    pub placeholder: Option<String>,
    /// Minimum answer length.
    pub min_length: Option<u32>,
    /// Maximum answer length.
    pub max_length: Option<u32>,
}

/// Command to append a matching question to a section.
///
/// Item ids are assigned by the handler; the answer key is given as
/// `(left_index, right_index)` pairs.
#[derive(Debug, Clone)]
pub struct CreateMatchingQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Shared question fields.
    pub question: NewQuestion,
    /// Left column texts.
    pub left: Vec<String>,
    /// Right column texts.
    pub right: Vec<String>,
    /// Answer key as column indices.
    pub pairs: Vec<(usize, usize)>,
    /// Whether the right column is shuffled.
    pub shuffle_right_column: bool,
}

/// Command to change a question's prompt.
#[derive(Debug, Clone)]
pub struct RenameQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// The new prompt.
    pub prompt: String,
}

/// Command to replace a question's help text.
#[derive(Debug, Clone)]
pub struct ChangeQuestionHelp {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// The new help text; blank clears it.
    pub help_text: Option<String>,
}

/// Command to mark a question required or optional.
#[derive(Debug, Clone)]
pub struct SetQuestionRequired {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Whether an answer is mandatory.
    pub required: bool,
}

/// Command to toggle option (or right-column) shuffling.
#[derive(Debug, Clone)]
pub struct SetQuestionShuffle {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Whether to shuffle.
    pub shuffle: bool,
}

/// Command to replace the options of a choice or true/false question.
#[derive(Debug, Clone)]
pub struct ReplaceChoiceOptions {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// The new options in display order.
    pub options: Vec<OptionInput>,
}

/// Command to set the selection bounds of a MULTI choice question.
#[derive(Debug, Clone)]
pub struct SetMultiBounds {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Lower bound; absent means 0.
    pub min_selections: Option<u32>,
    /// Upper bound; absent means the option count.
    pub max_selections: Option<u32>,
}

/// Command to replace the settings of a text question.
#[derive(Debug, Clone)]
pub struct SetTextSettings {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Expected answer shape.
    pub mode: TextMode,
    /// Input placeholder.
    pub placeholder: Option<String>,
    /// Minimum answer length.
    pub min_length: Option<u32>,
    /// Maximum answer length.
    pub max_length: Option<u32>,
}

/// Command to replace the answer key of a matching question.
#[derive(Debug, Clone)]
pub struct SetMatchingKey {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Left item id to right item id.
    pub answer_key: BTreeMap<Uuid, Uuid>,
}

/// Command to move a question within its section or to another section of
/// the same form.
#[derive(Debug, Clone)]
pub struct MoveQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
    /// Destination section; `None` keeps the current one.
    pub target_section_id: Option<Uuid>,
    /// Requested zero-based position; clamped to the end.
    pub new_position: i64,
}

/// Command to delete a question.
#[derive(Debug, Clone)]
pub struct DeleteQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The question identifier.
    pub question_id: Uuid,
}

impl_command!(CreateChoiceQuestion, "questions.create_choice");
impl_command!(CreateTrueFalseQuestion, "questions.create_true_false");
impl_command!(CreateTextQuestion, "questions.create_text");
impl_command!(CreateMatchingQuestion, "questions.create_matching");
impl_command!(RenameQuestion, "questions.rename");
impl_command!(ChangeQuestionHelp, "questions.change_help");
impl_command!(SetQuestionRequired, "questions.set_required");
impl_command!(SetQuestionShuffle, "questions.set_shuffle");
impl_command!(ReplaceChoiceOptions, "questions.replace_options");
impl_command!(SetMultiBounds, "questions.set_multi_bounds");
impl_command!(SetTextSettings, "questions.set_text_settings");
impl_command!(SetMatchingKey, "questions.set_matching");
impl_command!(MoveQuestion, "questions.move");
impl_command!(DeleteQuestion, "questions.delete");
