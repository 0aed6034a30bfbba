//! Command handlers for questions.
//!
//! Each handler loads the current snapshot through the repository port,
//! applies one domain method, and saves the result. Creates, moves and
//! deletes also renumber the affected sections; only questions whose
//! position changed are written back.

use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::position::{
    Positioned, changed_positions, insert_at, move_to, next_position, remove, requested_position,
};
use encuestas_core::repository::{ChildRepository, load_required};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::{Question, QuestionDraft};
use crate::domain::commands::{
    ChangeQuestionHelp, CreateChoiceQuestion, CreateMatchingQuestion, CreateTextQuestion,
    CreateTrueFalseQuestion, DeleteQuestion, MoveQuestion, NewQuestion, OptionInput,
    RenameQuestion, ReplaceChoiceOptions, SetMatchingKey, SetMultiBounds, SetQuestionRequired,
    SetQuestionShuffle, SetTextSettings,
};
use crate::domain::ports::{FormDirectory, SectionDirectory};
use crate::domain::value_objects::{ChoiceOption, MatchingItem, Prompt};
use crate::domain::variants::{
    ChoiceSettings, MatchingSettings, QuestionVariant, TextSettings, TrueFalseSettings,
};

/// Result of a successfully handled question command.
#[derive(Debug)]
pub struct QuestionCommandResult {
    /// The question affected by the command.
    pub aggregate_id: Uuid,
    /// The question after the command (the removed snapshot for deletes).
    pub question: Question,
    /// Other questions whose position changed and were saved.
    pub repositioned: Vec<Question>,
}

impl QuestionCommandResult {
    fn saved(question: Question) -> Self {
        Self {
            aggregate_id: question.id(),
            question,
            repositioned: Vec::new(),
        }
    }
}

/// Ports a question-creating handler needs.
pub struct CreatePorts<'a> {
    /// Form existence.
    pub forms: &'a dyn FormDirectory,
    /// Section ownership.
    pub sections: &'a dyn SectionDirectory,
    /// Question storage.
    pub questions: &'a dyn ChildRepository<Question>,
}

fn choice_options(inputs: &[OptionInput]) -> Result<Vec<ChoiceOption>, DomainError> {
    inputs
        .iter()
        .map(|o| ChoiceOption::new(&o.label, o.is_correct))
        .collect()
}

async fn ensure_section_in_form(
    sections: &dyn SectionDirectory,
    form_id: Uuid,
    section_id: Uuid,
) -> Result<(), DomainError> {
    if sections.section_belongs_to_form(form_id, section_id).await? {
        Ok(())
    } else {
        Err(DomainError::OwnershipMismatch {
            child_id: section_id,
            parent_id: form_id,
        })
    }
}

/// Checks the form and section, validates the shared fields, and builds the
/// variant at the end of the section.
async fn append_question<F>(
    new: &NewQuestion,
    clock: &dyn Clock,
    ports: &CreatePorts<'_>,
    build_variant: F,
) -> Result<QuestionCommandResult, DomainError>
where
    F: FnOnce() -> Result<QuestionVariant, DomainError>,
{
    if !ports.forms.form_exists(new.form_id).await? {
        return Err(DomainError::not_found("form", new.form_id));
    }
    ensure_section_in_form(ports.sections, new.form_id, new.section_id).await?;
    let siblings = ports.questions.list_by_parent(new.section_id).await?;

    let draft = QuestionDraft {
        id: new.question_id,
        form_id: new.form_id,
        section_id: new.section_id,
        prompt: Prompt::of(&new.prompt)?,
        help_text: new.help_text.clone(),
        required: new.required,
    };
    let question = Question::create(draft, next_position(&siblings), build_variant()?, clock);
    ports.questions.save(&question).await?;
    Ok(QuestionCommandResult::saved(question))
}

async fn update_question<F>(
    question_id: Uuid,
    repo: &dyn ChildRepository<Question>,
    apply: F,
) -> Result<QuestionCommandResult, DomainError>
where
    F: FnOnce(&Question) -> Result<Question, DomainError>,
{
    let question: Question = load_required(repo, question_id).await?;
    let next = apply(&question)?;
    repo.save(&next).await?;
    Ok(QuestionCommandResult::saved(next))
}

/// Handles the `CreateChoiceQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::OwnershipMismatch` if the section is not in the form,
/// `DomainError::InvalidArgument` for rejected settings, or a port error.
#[instrument(
    skip_all,
    fields(question_id = %command.question.question_id, section_id = %command.question.section_id)
)]
pub async fn handle_create_choice_question(
    command: &CreateChoiceQuestion,
    clock: &dyn Clock,
    ports: &CreatePorts<'_>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_choice command");
    append_question(&command.question, clock, ports, || {
        let settings = ChoiceSettings::new(
            command.mode,
            choice_options(&command.options)?,
            command.min_selections,
            command.max_selections,
            command.shuffle_options,
        )?;
        Ok(QuestionVariant::Choice(settings))
    })
    .await
}

/// Handles the `CreateTrueFalseQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::OwnershipMismatch` if the section is not in the form,
/// `DomainError::InvalidArgument` for rejected labels, or a port error.
#[instrument(
    skip_all,
    fields(question_id = %command.question.question_id, section_id = %command.question.section_id)
)]
pub async fn handle_create_true_false_question(
    command: &CreateTrueFalseQuestion,
    clock: &dyn Clock,
    ports: &CreatePorts<'_>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_true_false command");
    append_question(&command.question, clock, ports, || {
        let settings = TrueFalseSettings::new(
            command.true_is_correct,
            command.true_label.clone(),
            command.false_label.clone(),
            command.shuffle_options,
        )?;
        Ok(QuestionVariant::TrueFalse(settings))
    })
    .await
}

/// Handles the `CreateTextQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::OwnershipMismatch` if the section is not in the form,
/// `DomainError::InvalidArgument` for rejected length bounds, or a port
/// error.
#[instrument(
    skip_all,
    fields(question_id = %command.question.question_id, section_id = %command.question.section_id)
)]
pub async fn handle_create_text_question(
    command: &CreateTextQuestion,
    clock: &dyn Clock,
    ports: &CreatePorts<'_>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_text command");
    append_question(&command.question, clock, ports, || {
        let settings = TextSettings::new(
            command.mode,
            command.placeholder.clone(),
            command.min_length,
            command.max_length,
        )?;
        Ok(QuestionVariant::Text(settings))
    })
    .await
}

/// Handles the `CreateMatchingQuestion` command. Each column item gets a
/// fresh id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::OwnershipMismatch` if the section is not in the form,
/// `DomainError::InvalidArgument` for rejected items,
/// `DomainError::InvalidMatchingKey` for a bad key, or a port error.
#[instrument(
    skip_all,
    fields(question_id = %command.question.question_id, section_id = %command.question.section_id)
)]
pub async fn handle_create_matching_question(
    command: &CreateMatchingQuestion,
    clock: &dyn Clock,
    ports: &CreatePorts<'_>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_matching command");
    append_question(&command.question, clock, ports, || {
        let column = |texts: &[String]| -> Result<Vec<MatchingItem>, DomainError> {
            texts
                .iter()
                .map(|t| MatchingItem::new(Uuid::new_v4(), t))
                .collect()
        };
        let settings = MatchingSettings::from_index_pairs(
            column(&command.left)?,
            column(&command.right)?,
            &command.pairs,
            command.shuffle_right_column,
        )?;
        Ok(QuestionVariant::Matching(settings))
    })
    .await
}

/// Handles the `RenameQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::InvalidArgument` for a rejected prompt, or a port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_rename_question(
    command: &RenameQuestion,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling rename command");
    let prompt = Prompt::of(&command.prompt)?;
    update_question(command.question_id, repo, |q| Ok(q.rename(prompt, clock))).await
}

/// Handles the `ChangeQuestionHelp` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist, or a
/// port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_change_question_help(
    command: &ChangeQuestionHelp,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_help command");
    update_question(command.question_id, repo, |q| {
        Ok(q.change_help(command.help_text.clone(), clock))
    })
    .await
}

/// Handles the `SetQuestionRequired` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist, or a
/// port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_set_question_required(
    command: &SetQuestionRequired,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_required command");
    update_question(command.question_id, repo, |q| {
        Ok(q.set_required(command.required, clock))
    })
    .await
}

/// Handles the `SetQuestionShuffle` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` for a text question, or a port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_set_question_shuffle(
    command: &SetQuestionShuffle,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_shuffle command");
    update_question(command.question_id, repo, |q| q.set_shuffle(command.shuffle, clock)).await
}

/// Handles the `ReplaceChoiceOptions` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` unless it is a choice or true/false
/// question, `DomainError::InvalidArgument` for rejected options, or a port
/// error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_replace_choice_options(
    command: &ReplaceChoiceOptions,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling replace_options command");
    let options = choice_options(&command.options)?;
    update_question(command.question_id, repo, |q| {
        q.replace_choice_options(options, clock)
    })
    .await
}

/// Handles the `SetMultiBounds` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` unless it is a choice question,
/// `DomainError::InvalidArgument` for SINGLE questions or bad bounds, or a
/// port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_set_multi_bounds(
    command: &SetMultiBounds,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_multi_bounds command");
    update_question(command.question_id, repo, |q| {
        q.set_multi_bounds(command.min_selections, command.max_selections, clock)
    })
    .await
}

/// Handles the `SetTextSettings` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` unless it is a text question,
/// `DomainError::InvalidArgument` for rejected bounds, or a port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_set_text_settings(
    command: &SetTextSettings,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_text_settings command");
    let settings = TextSettings::new(
        command.mode,
        command.placeholder.clone(),
        command.min_length,
        command.max_length,
    )?;
    update_question(command.question_id, repo, |q| q.set_text_settings(settings, clock)).await
}

/// Handles the `SetMatchingKey` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` unless it is a matching question,
/// `DomainError::InvalidMatchingKey` for a bad key, or a port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_set_matching_key(
    command: &SetMatchingKey,
    clock: &dyn Clock,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_matching command");
    update_question(command.question_id, repo, |q| {
        q.set_matching(command.answer_key.clone(), clock)
    })
    .await
}

/// Handles the `MoveQuestion` command.
///
/// Within a section the question is moved to the requested slot. Across
/// sections it is removed from the source (closing the gap) and inserted in
/// the target. Positions past the end clamp to the last slot.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a negative position,
/// `DomainError::NotFound` if the question does not exist,
/// `DomainError::OwnershipMismatch` if the target section is not in the
/// question's form, or a port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_move_question(
    command: &MoveQuestion,
    clock: &dyn Clock,
    sections: &dyn SectionDirectory,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling move command");
    let position = requested_position(command.new_position)?;
    let question: Question = load_required(repo, command.question_id).await?;
    let source_id = question.section_id();
    let target_id = command.target_section_id.unwrap_or(source_id);
    let source = repo.list_by_parent(source_id).await?;

    let repositioned = if target_id == source_id {
        let reordered: Vec<Question> = move_to(source_id, &source, question.id(), position)?
            .into_iter()
            .map(|q| {
                if q.id() == question.id() {
                    q.move_to(source_id, q.position(), clock)
                } else {
                    q
                }
            })
            .collect();
        changed_positions(&source, &reordered)
    } else {
        ensure_section_in_form(sections, question.form_id(), target_id).await?;
        let target = repo.list_by_parent(target_id).await?;
        let (removed, rest) = remove(&source, question.id())?;
        let relocated = removed.move_to(target_id, position, clock);
        let inserted = insert_at(target_id, &target, relocated, position)?;

        let mut changed = changed_positions(&target, &inserted);
        changed.extend(changed_positions(&source, &rest));
        changed
    };

    if repositioned.is_empty() {
        debug!("question already in place");
        return Ok(QuestionCommandResult::saved(question));
    }
    repo.save_all(&repositioned).await?;

    let (moved, others): (Vec<Question>, Vec<Question>) = repositioned
        .into_iter()
        .partition(|q| q.id() == question.id());
    let moved = moved.into_iter().next().unwrap_or(question);
    Ok(QuestionCommandResult {
        aggregate_id: moved.id(),
        question: moved,
        repositioned: others,
    })
}

/// Handles the `DeleteQuestion` command: removes the question and closes
/// the gap in its section.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist, or a
/// port error.
#[instrument(skip_all, fields(question_id = %command.question_id))]
pub async fn handle_delete_question(
    command: &DeleteQuestion,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete command");
    let question: Question = load_required(repo, command.question_id).await?;
    let siblings = repo.list_by_parent(question.section_id()).await?;

    let (removed, rest) = remove(&siblings, question.id())?;
    repo.delete(removed.id()).await?;
    let repositioned = changed_positions(&siblings, &rest);
    if !repositioned.is_empty() {
        repo.save_all(&repositioned).await?;
    }
    Ok(QuestionCommandResult {
        aggregate_id: removed.id(),
        question: removed,
        repositioned,
    })
}
