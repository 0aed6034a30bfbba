//! Command handlers for submissions.
//!
//! Starting and submitting consult the form's response rules; saving an
//! answer only checks the answer targets a question of the right kind on
//! the same form. Full answer validation runs on submit.

use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::repository::{AggregateRepository, load_required};
use encuestas_forms::domain::aggregates::Form;
use encuestas_questions::domain::aggregates::Question;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::Submission;
use crate::domain::answers::Answer;
use crate::domain::commands::{
    DeleteSubmission, RemoveAnswer, SaveChoiceAnswer, SaveMatchingAnswer, SaveTextAnswer,
    SaveTrueFalseAnswer, StartSubmission, SubmitSubmission,
};
use crate::domain::events::{ResponseEvent, ResponseLimitReached, SubmissionSubmitted};
use crate::domain::policy::{ResponsePolicy, count_submitted_by};
use crate::domain::ports::{QuestionCatalog, SubmissionIndex};
use crate::domain::validation::validate_submission;
use crate::domain::value_objects::SubmissionStatus;

/// Result of a successfully handled submission command.
#[derive(Debug)]
pub struct SubmissionCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The snapshot after the command.
    pub submission: Submission,
    /// Events produced by the command. Empty unless it was submitted.
    pub events: Vec<ResponseEvent>,
}

impl SubmissionCommandResult {
    fn saved(submission: Submission) -> Self {
        Self {
            aggregate_id: submission.id(),
            submission,
            events: Vec::new(),
        }
    }
}

/// The ports the submission handlers read from and write to.
#[derive(Clone, Copy)]
pub struct ResponsePorts<'a> {
    /// Forms, for their response rules.
    pub forms: &'a dyn AggregateRepository<Form>,
    /// Questions of each form.
    pub questions: &'a dyn QuestionCatalog,
    /// Submissions by form, for response limits.
    pub index: &'a dyn SubmissionIndex,
    /// Submission snapshots.
    pub submissions: &'a dyn AggregateRepository<Submission>,
}

fn unknown_question(question_id: Uuid) -> DomainError {
    DomainError::not_found("question", question_id)
}

/// Handles the `StartSubmission` command: the form must be published and
/// open, accept the respondent, and leave them a response to give.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown form,
/// `DomainError::PolicyViolation` if the form's rules refuse the
/// respondent, or a port error.
#[instrument(skip_all, fields(submission_id = %command.submission_id, form_id = %command.form_id))]
pub async fn handle_start_submission(
    command: &StartSubmission,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling start_submission command");
    let form: Form = load_required(ports.forms, command.form_id).await?;
    let policy = ResponsePolicy::of(&form);
    policy.ensure_open(clock.now())?;
    policy.ensure_respondent_allowed(&command.respondent)?;
    let existing = ports.index.list_by_form(form.id()).await?;
    policy.ensure_below_limit(&command.respondent, &existing)?;

    let submission = Submission::start(
        command.submission_id,
        form.id(),
        command.respondent.clone(),
        clock,
    );
    ports.submissions.save(&submission).await?;
    Ok(SubmissionCommandResult::saved(submission))
}

async fn save_answer(
    submission_id: Uuid,
    question_id: Uuid,
    answer: Answer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    let submission: Submission = load_required(ports.submissions, submission_id).await?;
    let form: Form = load_required(ports.forms, submission.form_id()).await?;
    let questions = ports.questions.questions_of_form(form.id()).await?;
    let question = questions
        .iter()
        .find(|q| q.id() == question_id)
        .ok_or_else(|| unknown_question(question_id))?;
    if question.variant().kind() != answer.kind() {
        return Err(DomainError::WrongVariant {
            expected: answer.kind(),
            actual: question.variant().kind(),
        });
    }

    let next = submission.save_answer(question_id, answer, clock)?;
    ResponsePolicy::of(&form).ensure_answer_editable(&submission, question_id)?;
    ports.submissions.save(&next).await?;
    Ok(SubmissionCommandResult::saved(next))
}

/// Handles the `SaveChoiceAnswer` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown submission or a question
/// outside its form, `DomainError::WrongVariant` unless the question is a
/// choice question, `DomainError::SubmissionLocked` after submit,
/// `DomainError::PolicyViolation` when the form forbids changing an
/// answer, or a port error.
#[instrument(
    skip_all,
    fields(submission_id = %command.submission_id, question_id = %command.question_id)
)]
pub async fn handle_save_choice_answer(
    command: &SaveChoiceAnswer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling save_choice_answer command");
    let answer = Answer::choice(command.selected.iter().copied());
    save_answer(command.submission_id, command.question_id, answer, clock, ports).await
}

/// Handles the `SaveTrueFalseAnswer` command.
///
/// # Errors
///
/// As [`handle_save_choice_answer`], for true/false questions.
#[instrument(
    skip_all,
    fields(submission_id = %command.submission_id, question_id = %command.question_id)
)]
pub async fn handle_save_true_false_answer(
    command: &SaveTrueFalseAnswer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling save_true_false_answer command");
    let answer = Answer::TrueFalse {
        value: command.value,
    };
    save_answer(command.submission_id, command.question_id, answer, clock, ports).await
}

/// Handles the `SaveTextAnswer` command. The text is stored as typed.
///
/// # Errors
///
/// As [`handle_save_choice_answer`], for text questions.
#[instrument(
    skip_all,
    fields(submission_id = %command.submission_id, question_id = %command.question_id)
)]
pub async fn handle_save_text_answer(
    command: &SaveTextAnswer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling save_text_answer command");
    let answer = Answer::Text {
        text: command.text.clone(),
    };
    save_answer(command.submission_id, command.question_id, answer, clock, ports).await
}

/// Handles the `SaveMatchingAnswer` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` if a left item is paired twice,
/// and otherwise fails as [`handle_save_choice_answer`] does, for matching
/// questions.
#[instrument(
    skip_all,
    fields(submission_id = %command.submission_id, question_id = %command.question_id)
)]
pub async fn handle_save_matching_answer(
    command: &SaveMatchingAnswer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling save_matching_answer command");
    let answer = Answer::matching(&command.pairs)?;
    save_answer(command.submission_id, command.question_id, answer, clock, ports).await
}

/// Handles the `RemoveAnswer` command. Removing an answer that was never
/// given saves nothing.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown submission,
/// `DomainError::SubmissionLocked` after submit,
/// `DomainError::PolicyViolation` when the form forbids changing an
/// answer, or a port error.
#[instrument(
    skip_all,
    fields(submission_id = %command.submission_id, question_id = %command.question_id)
)]
pub async fn handle_remove_answer(
    command: &RemoveAnswer,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling remove_answer command");
    let submission: Submission = load_required(ports.submissions, command.submission_id).await?;
    let next = submission.remove_answer(command.question_id, clock)?;
    if next == submission {
        debug!("no answer to remove");
        return Ok(SubmissionCommandResult::saved(next));
    }

    let form: Form = load_required(ports.forms, submission.form_id()).await?;
    ResponsePolicy::of(&form).ensure_answer_editable(&submission, command.question_id)?;
    ports.submissions.save(&next).await?;
    Ok(SubmissionCommandResult::saved(next))
}

/// Handles the `SubmitSubmission` command: re-checks the form's rules at
/// the moment of hand-in, validates every answer, then locks the
/// submission.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown submission or form,
/// `DomainError::SubmissionLocked` if it was already submitted,
/// `DomainError::PolicyViolation` if the form no longer accepts it,
/// `DomainError::InvalidSubmission` listing every invalid answer, or a
/// port error.
#[instrument(skip_all, fields(submission_id = %command.submission_id))]
pub async fn handle_submit_submission(
    command: &SubmitSubmission,
    clock: &dyn Clock,
    ports: &ResponsePorts<'_>,
) -> Result<SubmissionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling submit_submission command");
    let submission: Submission = load_required(ports.submissions, command.submission_id).await?;
    if submission.status() == SubmissionStatus::Submitted {
        return Err(DomainError::SubmissionLocked(submission.id()));
    }
    let form: Form = load_required(ports.forms, submission.form_id()).await?;
    let policy = ResponsePolicy::of(&form);
    policy.ensure_open(clock.now())?;
    policy.ensure_respondent_allowed(submission.respondent())?;

    let questions: Vec<Question> = ports.questions.questions_of_form(form.id()).await?;
    let violations = validate_submission(&submission, &questions);
    if !violations.is_empty() {
        warn!(violations = violations.len(), "rejecting submission with invalid answers");
        return Err(DomainError::InvalidSubmission {
            submission_id: submission.id(),
            violations: violations.iter().map(ToString::to_string).collect(),
        });
    }

    let existing = ports.index.list_by_form(form.id()).await?;
    policy.ensure_below_limit(submission.respondent(), &existing)?;

    let next = submission.submit(clock)?;
    ports.submissions.save(&next).await?;

    let occurred_at = next.submitted_at().unwrap_or_else(|| next.updated_at());
    let mut events = vec![ResponseEvent::submitted(
        SubmissionSubmitted {
            submission_id: next.id(),
            form_id: next.form_id(),
            respondent: next.respondent().clone(),
            answer_count: next.answers().len(),
            occurred_at,
        },
        command.correlation_id,
    )];
    if let Some(limit) = form.limit_policy().max_responses_per_user() {
        let used = count_submitted_by(form.id(), next.respondent(), &existing).saturating_add(1);
        if !next.respondent().is_anonymous() && used == limit {
            info!(limit, "respondent reached the response limit");
            events.push(ResponseEvent::limit_reached(
                ResponseLimitReached {
                    form_id: form.id(),
                    respondent: next.respondent().clone(),
                    limit,
                    occurred_at,
                },
                command.correlation_id,
            ));
        }
    }

    Ok(SubmissionCommandResult {
        aggregate_id: next.id(),
        submission: next,
        events,
    })
}

/// Handles the `DeleteSubmission` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the submission does not exist, or a
/// port error.
#[instrument(skip_all, fields(submission_id = %command.submission_id))]
pub async fn handle_delete_submission(
    command: &DeleteSubmission,
    repo: &dyn AggregateRepository<Submission>,
) -> Result<(), DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete_submission command");
    let submission: Submission = load_required(repo, command.submission_id).await?;
    repo.delete(submission.id()).await
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use encuestas_core::event::DomainEvent;
    use encuestas_forms::domain::aggregates::{FormOptions, FormStatus};
    use encuestas_forms::domain::value_objects::{
        AvailabilityWindow, FormTitle, ResponseLimitPolicy,
    };
    use encuestas_questions::domain::aggregates::QuestionDraft;
    use encuestas_questions::domain::value_objects::{
        ChoiceOption, MatchingItem, Prompt, SelectionMode, TextMode,
    };
    use encuestas_questions::domain::variants::{
        ChoiceSettings, MatchingSettings, QuestionVariant, TextSettings, TrueFalseSettings,
    };
    use encuestas_test_support::{
        FailingRepository, FixedClock, InMemoryRepository, fixed_now, init_tracing,
    };

    use super::*;
    use crate::domain::events::{
        RESPONSE_LIMIT_REACHED_EVENT_TYPE, SUBMISSION_SUBMITTED_EVENT_TYPE,
    };
    use crate::domain::value_objects::Respondent;

    struct Fixture {
        form_id: Uuid,
        choice_id: Uuid,
        true_false_id: Uuid,
        email_id: Uuid,
        matching: (Uuid, [Uuid; 2], [Uuid; 2]),
        forms: InMemoryRepository<Form>,
        questions: InMemoryRepository<Question>,
        submissions: InMemoryRepository<Submission>,
    }

    fn question(form_id: Uuid, required: bool, variant: QuestionVariant) -> Question {
        let draft = QuestionDraft {
            id: Uuid::new_v4(),
            form_id,
            section_id: Uuid::new_v4(),
            prompt: Prompt::of("Question").unwrap(),
            help_text: None,
            required,
        };
        Question::create(draft, 0, variant, &FixedClock(fixed_now()))
    }

    impl Fixture {
        fn with_options(status: FormStatus, options: FormOptions) -> Self {
            let clock = FixedClock(fixed_now());
            let draft = Form::create(
                Uuid::new_v4(),
                Uuid::new_v4(),
                FormTitle::of("Customer survey").unwrap(),
                options,
                &clock,
            );
            let form = match status {
                FormStatus::Draft => draft,
                other => draft.change_status(Some(other), 4, &clock).unwrap().0,
            };
            let form_id = form.id();

            let options = ["Red", "Green", "Blue"]
                .iter()
                .map(|label| ChoiceOption::new(label, false).unwrap())
                .collect();
            let choice = question(
                form_id,
                true,
                QuestionVariant::Choice(
                    ChoiceSettings::new(SelectionMode::Single, options, None, None, false).unwrap(),
                ),
            );
            let true_false = question(
                form_id,
                false,
                QuestionVariant::TrueFalse(
                    TrueFalseSettings::new(true, None, None, false).unwrap(),
                ),
            );
            let email = question(
                form_id,
                false,
                QuestionVariant::Text(
                    TextSettings::new(TextMode::Email, None, None, Some(40)).unwrap(),
                ),
            );
            let left = [Uuid::new_v4(), Uuid::new_v4()];
            let right = [Uuid::new_v4(), Uuid::new_v4()];
            let items = |ids: &[Uuid; 2], texts: [&str; 2]| -> Vec<MatchingItem> {
                ids.iter()
                    .zip(texts)
                    .map(|(id, text)| MatchingItem::new(*id, text).unwrap())
                    .collect()
            };
            let matching = question(
                form_id,
                false,
                QuestionVariant::Matching(
                    MatchingSettings::from_index_pairs(
                        items(&left, ["Spain", "Italy"]),
                        items(&right, ["Madrid", "Rome"]),
                        &[(0, 0), (1, 1)],
                        false,
                    )
                    .unwrap(),
                ),
            );

            Self {
                form_id,
                choice_id: choice.id(),
                true_false_id: true_false.id(),
                email_id: email.id(),
                matching: (matching.id(), left, right),
                forms: InMemoryRepository::with([form]),
                questions: InMemoryRepository::with([choice, true_false, email, matching]),
                submissions: InMemoryRepository::new(),
            }
        }

        fn new() -> Self {
            Self::with_options(
                FormStatus::Published,
                FormOptions {
                    anonymous_mode: true,
                    allow_edit_before_submit: true,
                    ..FormOptions::default()
                },
            )
        }

        fn ports(&self) -> ResponsePorts<'_> {
            ResponsePorts {
                forms: &self.forms,
                questions: &self.questions,
                index: &self.submissions,
                submissions: &self.submissions,
            }
        }

        fn start_command(&self, respondent: Respondent) -> StartSubmission {
            StartSubmission {
                correlation_id: Uuid::new_v4(),
                submission_id: Uuid::new_v4(),
                form_id: self.form_id,
                respondent,
            }
        }

        async fn start(&self, respondent: Respondent) -> Uuid {
            handle_start_submission(
                &self.start_command(respondent),
                &FixedClock(fixed_now()),
                &self.ports(),
            )
            .await
            .unwrap()
            .aggregate_id
        }

        async fn choose(&self, submission_id: Uuid, selected: Vec<u32>) {
            let command = SaveChoiceAnswer {
                correlation_id: Uuid::new_v4(),
                submission_id,
                question_id: self.choice_id,
                selected,
            };
            handle_save_choice_answer(&command, &FixedClock(fixed_now()), &self.ports())
                .await
                .unwrap();
        }

        async fn submit(
            &self,
            submission_id: Uuid,
        ) -> Result<SubmissionCommandResult, DomainError> {
            let command = SubmitSubmission {
                correlation_id: Uuid::new_v4(),
                submission_id,
            };
            handle_submit_submission(&command, &FixedClock(fixed_now()), &self.ports()).await
        }
    }

    fn text_command(submission_id: Uuid, question_id: Uuid, text: &str) -> SaveTextAnswer {
        SaveTextAnswer {
            correlation_id: Uuid::new_v4(),
            submission_id,
            question_id,
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_handle_start_submission_opens_draft() {
        // Arrange
        init_tracing();
        let fixture = Fixture::new();
        let command = fixture.start_command(Respondent::Anonymous);

        // Act
        let result = handle_start_submission(&command, &FixedClock(fixed_now()), &fixture.ports())
            .await
            .unwrap();

        // Assert
        assert_eq!(result.aggregate_id, command.submission_id);
        assert_eq!(result.submission.form_id(), fixture.form_id);
        assert_eq!(result.submission.status(), SubmissionStatus::Draft);
        assert!(result.events.is_empty());
        assert_eq!(fixture.submissions.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_start_submission_rejects_unpublished_form() {
        let fixture = Fixture::with_options(FormStatus::Draft, FormOptions::default());
        let command = fixture.start_command(Respondent::User(Uuid::new_v4()));

        let result =
            handle_start_submission(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
        assert!(fixture.submissions.saved().is_empty());
    }

    #[tokio::test]
    async fn test_handle_start_submission_rejects_closed_window() {
        let fixture = Fixture::with_options(
            FormStatus::Published,
            FormOptions {
                window: AvailabilityWindow::of(None, Some(fixed_now() - Duration::hours(1)))
                    .unwrap(),
                ..FormOptions::default()
            },
        );
        let command = fixture.start_command(Respondent::User(Uuid::new_v4()));

        let result =
            handle_start_submission(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert!(matches!(result, Err(DomainError::PolicyViolation(m)) if m.contains("closed at")));
    }

    #[tokio::test]
    async fn test_handle_start_submission_rejects_anonymous_outside_anonymous_mode() {
        let fixture = Fixture::with_options(FormStatus::Published, FormOptions::default());
        let command = fixture.start_command(Respondent::Anonymous);

        let result =
            handle_start_submission(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    }

    #[tokio::test]
    async fn test_handle_start_submission_unknown_form_is_not_found() {
        let fixture = Fixture::new();
        let mut command = fixture.start_command(Respondent::Anonymous);
        command.form_id = Uuid::new_v4();

        let result =
            handle_start_submission(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert_eq!(result.unwrap_err(), DomainError::not_found("form", command.form_id));
    }

    #[tokio::test]
    async fn test_one_per_user_blocks_a_second_start_after_submit() {
        // Arrange
        let fixture = Fixture::with_options(
            FormStatus::Published,
            FormOptions {
                limit_policy: ResponseLimitPolicy::OnePerUser,
                ..FormOptions::default()
            },
        );
        let user = Respondent::User(Uuid::new_v4());
        let first = fixture.start(user.clone()).await;
        fixture.choose(first, vec![0]).await;
        fixture.submit(first).await.unwrap();

        // Act
        let again = handle_start_submission(
            &fixture.start_command(user),
            &FixedClock(fixed_now()),
            &fixture.ports(),
        )
        .await;
        let someone_else = handle_start_submission(
            &fixture.start_command(Respondent::User(Uuid::new_v4())),
            &FixedClock(fixed_now()),
            &fixture.ports(),
        )
        .await;

        // Assert
        assert!(matches!(again, Err(DomainError::PolicyViolation(_))));
        assert!(someone_else.is_ok());
    }

    #[tokio::test]
    async fn test_handle_save_choice_answer_stores_selection() {
        // Arrange
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        let command = SaveChoiceAnswer {
            correlation_id: Uuid::new_v4(),
            submission_id,
            question_id: fixture.choice_id,
            selected: vec![2, 2],
        };
        let later = FixedClock(fixed_now() + Duration::minutes(3));

        // Act
        let result = handle_save_choice_answer(&command, &later, &fixture.ports())
            .await
            .unwrap();

        // Assert
        assert_eq!(
            result.submission.answer(fixture.choice_id),
            Some(&Answer::choice([2]))
        );
        let stored = fixture.submissions.get(submission_id).unwrap();
        assert_eq!(stored.updated_at(), later.0);
    }

    #[tokio::test]
    async fn test_handle_save_answer_rejects_wrong_kind() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        let command = text_command(submission_id, fixture.choice_id, "Red");

        let result =
            handle_save_text_answer(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::WrongVariant {
                expected: "TEXT",
                actual: "CHOICE"
            }
        );
    }

    #[tokio::test]
    async fn test_handle_save_answer_rejects_question_of_other_form() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        let stranger = question(
            Uuid::new_v4(),
            false,
            QuestionVariant::Text(TextSettings::default()),
        );
        fixture.questions.save(&stranger).await.unwrap();
        let command = text_command(submission_id, stranger.id(), "hello");

        let result =
            handle_save_text_answer(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert_eq!(result.unwrap_err(), DomainError::not_found("question", stranger.id()));
    }

    #[tokio::test]
    async fn test_saved_answer_is_final_without_edit_before_submit() {
        // Arrange
        let fixture = Fixture::with_options(
            FormStatus::Published,
            FormOptions {
                anonymous_mode: true,
                ..FormOptions::default()
            },
        );
        let submission_id = fixture.start(Respondent::Anonymous).await;
        let answer = |value| SaveTrueFalseAnswer {
            correlation_id: Uuid::new_v4(),
            submission_id,
            question_id: fixture.true_false_id,
            value,
        };
        let clock = FixedClock(fixed_now());
        handle_save_true_false_answer(&answer(true), &clock, &fixture.ports())
            .await
            .unwrap();

        // Act
        let change = handle_save_true_false_answer(&answer(false), &clock, &fixture.ports()).await;
        let removal = handle_remove_answer(
            &RemoveAnswer {
                correlation_id: Uuid::new_v4(),
                submission_id,
                question_id: fixture.true_false_id,
            },
            &clock,
            &fixture.ports(),
        )
        .await;

        // Assert
        assert!(matches!(change, Err(DomainError::PolicyViolation(_))));
        assert!(matches!(removal, Err(DomainError::PolicyViolation(_))));
        let stored = fixture.submissions.get(submission_id).unwrap();
        assert_eq!(
            stored.answer(fixture.true_false_id),
            Some(&Answer::TrueFalse { value: true })
        );
    }

    #[tokio::test]
    async fn test_handle_save_matching_answer_rejects_left_item_paired_twice() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        let (question_id, left, right) = fixture.matching;
        let command = SaveMatchingAnswer {
            correlation_id: Uuid::new_v4(),
            submission_id,
            question_id,
            pairs: vec![(left[0], right[0]), (left[0], right[1])],
        };

        let result =
            handle_save_matching_answer(&command, &FixedClock(fixed_now()), &fixture.ports()).await;

        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_handle_remove_answer_drops_it() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        fixture.choose(submission_id, vec![1]).await;
        let command = RemoveAnswer {
            correlation_id: Uuid::new_v4(),
            submission_id,
            question_id: fixture.choice_id,
        };

        let result = handle_remove_answer(&command, &FixedClock(fixed_now()), &fixture.ports())
            .await
            .unwrap();

        assert!(result.submission.answers().is_empty());
        assert!(fixture.submissions.get(submission_id).unwrap().answers().is_empty());
    }

    #[tokio::test]
    async fn test_handle_submit_submission_hands_in_valid_answers() {
        // Arrange
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        fixture.choose(submission_id, vec![1]).await;
        let (question_id, left, right) = fixture.matching;
        handle_save_matching_answer(
            &SaveMatchingAnswer {
                correlation_id: Uuid::new_v4(),
                submission_id,
                question_id,
                pairs: vec![(left[0], right[1]), (left[1], right[0])],
            },
            &FixedClock(fixed_now()),
            &fixture.ports(),
        )
        .await
        .unwrap();

        // Act
        let result = fixture.submit(submission_id).await.unwrap();

        // Assert
        assert_eq!(result.submission.status(), SubmissionStatus::Submitted);
        assert_eq!(result.submission.submitted_at(), Some(fixed_now()));
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].event_type(), SUBMISSION_SUBMITTED_EVENT_TYPE);
        assert_eq!(result.events[0].metadata().aggregate_id, submission_id);
        let payload = result.events[0].to_payload();
        assert_eq!(payload["SubmissionSubmitted"]["answer_count"], 2);
        let stored = fixture.submissions.get(submission_id).unwrap();
        assert_eq!(stored.status(), SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_handle_submit_submission_reports_every_invalid_answer() {
        // Arrange
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        handle_save_text_answer(
            &text_command(submission_id, fixture.email_id, "not-an-email"),
            &FixedClock(fixed_now()),
            &fixture.ports(),
        )
        .await
        .unwrap();

        // Act
        let result = fixture.submit(submission_id).await;

        // Assert
        let Err(DomainError::InvalidSubmission {
            submission_id: rejected,
            violations,
        }) = result
        else {
            panic!("expected InvalidSubmission, got {result:?}");
        };
        assert_eq!(rejected, submission_id);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].starts_with(&format!("{}: required", fixture.choice_id)));
        assert!(violations[1].starts_with(&format!("{}: invalid_format", fixture.email_id)));
        let stored = fixture.submissions.get(submission_id).unwrap();
        assert_eq!(stored.status(), SubmissionStatus::Draft);
    }

    #[tokio::test]
    async fn test_handle_submit_submission_twice_is_locked() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;
        fixture.choose(submission_id, vec![0]).await;
        fixture.submit(submission_id).await.unwrap();

        let again = fixture.submit(submission_id).await;

        assert_eq!(again.unwrap_err(), DomainError::SubmissionLocked(submission_id));
    }

    #[tokio::test]
    async fn test_handle_submit_submission_rechecks_window() {
        // Arrange
        let fixture = Fixture::with_options(
            FormStatus::Published,
            FormOptions {
                window: AvailabilityWindow::of(None, Some(fixed_now() + Duration::minutes(30)))
                    .unwrap(),
                ..FormOptions::default()
            },
        );
        let submission_id = fixture.start(Respondent::User(Uuid::new_v4())).await;
        fixture.choose(submission_id, vec![0]).await;
        let command = SubmitSubmission {
            correlation_id: Uuid::new_v4(),
            submission_id,
        };

        // Act
        let result = handle_submit_submission(
            &command,
            &FixedClock(fixed_now() + Duration::hours(1)),
            &fixture.ports(),
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    }

    #[tokio::test]
    async fn test_handle_submit_submission_enforces_limit_across_parallel_drafts() {
        // Arrange
        let fixture = Fixture::with_options(
            FormStatus::Published,
            FormOptions {
                limit_policy: ResponseLimitPolicy::OnePerUser,
                ..FormOptions::default()
            },
        );
        let user = Respondent::email("ana@example.com").unwrap();
        let first = fixture.start(user.clone()).await;
        let second = fixture.start(user).await;
        fixture.choose(first, vec![0]).await;
        fixture.choose(second, vec![1]).await;

        // Act
        let accepted = fixture.submit(first).await.unwrap();
        let refused = fixture.submit(second).await;

        // Assert
        let types: Vec<&str> = accepted.events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(
            types,
            vec![SUBMISSION_SUBMITTED_EVENT_TYPE, RESPONSE_LIMIT_REACHED_EVENT_TYPE]
        );
        assert_eq!(accepted.events[1].metadata().aggregate_id, fixture.form_id);
        assert!(matches!(refused, Err(DomainError::PolicyViolation(_))));
    }

    #[tokio::test]
    async fn test_handle_delete_submission() {
        let fixture = Fixture::new();
        let submission_id = fixture.start(Respondent::Anonymous).await;

        handle_delete_submission(
            &DeleteSubmission {
                correlation_id: Uuid::new_v4(),
                submission_id,
            },
            &fixture.submissions,
        )
        .await
        .unwrap();

        assert!(fixture.submissions.get(submission_id).is_none());
    }

    #[tokio::test]
    async fn test_handlers_propagate_infrastructure_errors() {
        let fixture = Fixture::new();
        let ports = ResponsePorts {
            submissions: &FailingRepository,
            ..fixture.ports()
        };
        let command = fixture.start_command(Respondent::Anonymous);

        let result = handle_start_submission(&command, &FixedClock(fixed_now()), &ports).await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::Infrastructure("connection refused".into())
        );
    }
}
