//! Answer validation against the questions of a form.
//!
//! Every check reports instead of failing fast, so a respondent sees all
//! problems with a submission at once. Nothing here performs I/O.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use encuestas_questions::domain::aggregates::Question;
use encuestas_questions::domain::value_objects::{MatchingItem, SelectionMode, TextMode};
use encuestas_questions::domain::variants::{
    ChoiceSettings, MatchingSettings, QuestionVariant, TextSettings,
};
use serde::Serialize;
use uuid::Uuid;

use super::aggregates::Submission;
use super::answers::Answer;
use super::value_objects::looks_like_email;

/// Why an answer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required question has no usable answer.
    Required,
    /// The answer names a question outside the form.
    Unknown,
    /// The answer's kind differs from the question's.
    TypeMismatch,
    /// A selected option index does not exist.
    InvalidOption,
    /// A SINGLE question got the wrong number of selections.
    OutOfRange,
    /// Fewer selections than the declared minimum.
    MinViolation,
    /// More selections than the declared maximum.
    MaxViolation,
    /// Text shorter than the declared minimum.
    MinLength,
    /// Text longer than the declared maximum.
    MaxLength,
    /// Text that does not fit the EMAIL or NUMBER mode.
    InvalidFormat,
    /// A matching pair names an unknown left item.
    InvalidLeft,
    /// A matching pair names an unknown right item.
    InvalidRight,
    /// Two left items were paired with the same right item.
    DuplicateRight,
}

impl ViolationCode {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Unknown => "unknown",
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidOption => "invalid_option",
            Self::OutOfRange => "out_of_range",
            Self::MinViolation => "min_violation",
            Self::MaxViolation => "max_violation",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidLeft => "invalid_left",
            Self::InvalidRight => "invalid_right",
            Self::DuplicateRight => "duplicate_right",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerViolation {
    /// The question the answer belongs to.
    pub question_id: Uuid,
    /// Machine-readable reason.
    pub code: ViolationCode,
    /// Human-readable detail.
    pub message: String,
}

impl AnswerViolation {
    fn new(question_id: Uuid, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            question_id,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnswerViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.question_id, self.code, self.message)
    }
}

/// Checks one answer against its question.
#[must_use]
pub fn validate_answer(question: &Question, answer: &Answer) -> Vec<AnswerViolation> {
    let id = question.id();
    let required = question.required();
    match (question.variant(), answer) {
        (QuestionVariant::Choice(settings), Answer::Choice { selected }) => {
            check_choice(id, required, settings, selected)
        }
        (QuestionVariant::TrueFalse(_), Answer::TrueFalse { .. }) => Vec::new(),
        (QuestionVariant::Text(settings), Answer::Text { text }) => {
            check_text(id, required, settings, text)
        }
        (QuestionVariant::Matching(settings), Answer::Matching { pairs }) => {
            check_matching(id, required, settings, pairs)
        }
        (variant, answer) => vec![AnswerViolation::new(
            id,
            ViolationCode::TypeMismatch,
            format!("a {} answer cannot answer a {} question", answer.kind(), variant.kind()),
        )],
    }
}

/// Checks a whole submission: every required question answered, every
/// answer aimed at one of `questions`, and every answer valid for its
/// question.
///
/// Missing required answers are reported first, in the order of
/// `questions`; answer problems follow in question-id order.
#[must_use]
pub fn validate_submission(
    submission: &Submission,
    questions: &[Question],
) -> Vec<AnswerViolation> {
    let mut violations: Vec<AnswerViolation> = questions
        .iter()
        .filter(|q| q.required() && submission.answer(q.id()).is_none())
        .map(|q| {
            AnswerViolation::new(q.id(), ViolationCode::Required, "required question not answered")
        })
        .collect();

    for (question_id, answer) in submission.answers() {
        match questions.iter().find(|q| q.id() == *question_id) {
            Some(question) => violations.extend(validate_answer(question, answer)),
            None => violations.push(AnswerViolation::new(
                *question_id,
                ViolationCode::Unknown,
                "question is not part of this form",
            )),
        }
    }
    violations
}

fn check_choice(
    id: Uuid,
    required: bool,
    settings: &ChoiceSettings,
    selected: &BTreeSet<u32>,
) -> Vec<AnswerViolation> {
    let option_count = settings.options().len();
    if let Some(bad) = selected
        .iter()
        .find(|&&index| usize::try_from(index).unwrap_or(usize::MAX) >= option_count)
    {
        return vec![AnswerViolation::new(
            id,
            ViolationCode::InvalidOption,
            format!("no option at index {bad}"),
        )];
    }

    let count = u32::try_from(selected.len()).unwrap_or(u32::MAX);
    let mut violations = Vec::new();
    match settings.mode() {
        SelectionMode::Single => {
            if required && count != 1 {
                violations.push(AnswerViolation::new(
                    id,
                    ViolationCode::OutOfRange,
                    "select exactly one option",
                ));
            } else if count > 1 {
                violations.push(AnswerViolation::new(
                    id,
                    ViolationCode::OutOfRange,
                    "select at most one option",
                ));
            }
        }
        SelectionMode::Multi => {
            if let Some(min) = settings.min_selections().filter(|&min| count < min) {
                violations.push(AnswerViolation::new(
                    id,
                    ViolationCode::MinViolation,
                    format!("select at least {min} options"),
                ));
            }
            if let Some(max) = settings.max_selections().filter(|&max| count > max) {
                violations.push(AnswerViolation::new(
                    id,
                    ViolationCode::MaxViolation,
                    format!("select at most {max} options"),
                ));
            }
            if required && count == 0 {
                violations.push(AnswerViolation::new(
                    id,
                    ViolationCode::Required,
                    "select at least one option",
                ));
            }
        }
    }
    violations
}

fn check_text(
    id: Uuid,
    required: bool,
    settings: &TextSettings,
    text: &str,
) -> Vec<AnswerViolation> {
    let mut violations = Vec::new();
    let length = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if let Some(min) = settings.min_length().filter(|&min| length < min) {
        violations.push(AnswerViolation::new(
            id,
            ViolationCode::MinLength,
            format!("text must have at least {min} characters"),
        ));
    }
    if let Some(max) = settings.max_length().filter(|&max| length > max) {
        violations.push(AnswerViolation::new(
            id,
            ViolationCode::MaxLength,
            format!("text must have at most {max} characters"),
        ));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        if required {
            violations.push(AnswerViolation::new(id, ViolationCode::Required, "text is required"));
        }
        return violations;
    }
    let malformed = match settings.mode() {
        TextMode::Short | TextMode::Long => None,
        TextMode::Email => (!looks_like_email(trimmed)).then_some("an email address"),
        TextMode::Number => {
            (!trimmed.parse::<f64>().is_ok_and(f64::is_finite)).then_some("a number")
        }
    };
    if let Some(expected) = malformed {
        violations.push(AnswerViolation::new(
            id,
            ViolationCode::InvalidFormat,
            format!("text must be {expected}"),
        ));
    }
    violations
}

fn check_matching(
    id: Uuid,
    required: bool,
    settings: &MatchingSettings,
    pairs: &BTreeMap<Uuid, Uuid>,
) -> Vec<AnswerViolation> {
    let knows =
        |items: &[MatchingItem], wanted: Uuid| items.iter().any(|item| item.id() == wanted);
    for (&left, &right) in pairs {
        if !knows(settings.left(), left) {
            return vec![AnswerViolation::new(
                id,
                ViolationCode::InvalidLeft,
                format!("unknown left item {left}"),
            )];
        }
        if !knows(settings.right(), right) {
            return vec![AnswerViolation::new(
                id,
                ViolationCode::InvalidRight,
                format!("unknown right item {right}"),
            )];
        }
    }

    let mut violations = Vec::new();
    let mut used = HashSet::with_capacity(pairs.len());
    if !pairs.values().all(|right| used.insert(*right)) {
        violations.push(AnswerViolation::new(
            id,
            ViolationCode::DuplicateRight,
            "each right item may be used only once",
        ));
    }
    if required && pairs.is_empty() {
        violations.push(AnswerViolation::new(
            id,
            ViolationCode::Required,
            "pair at least one item",
        ));
    }
    violations
}

#[cfg(test)]
mod tests {
    use encuestas_questions::domain::aggregates::QuestionDraft;
    use encuestas_questions::domain::value_objects::{ChoiceOption, Prompt};
    use encuestas_questions::domain::variants::TrueFalseSettings;
    use encuestas_test_support::{FixedClock, fixed_now};
    use proptest::prelude::*;

    use super::*;
    use crate::domain::value_objects::Respondent;

    fn question(required: bool, variant: QuestionVariant) -> Question {
        let draft = QuestionDraft {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            section_id: Uuid::new_v4(),
            prompt: Prompt::of("Question").unwrap(),
            help_text: None,
            required,
        };
        Question::create(draft, 0, variant, &FixedClock(fixed_now()))
    }

    fn choice(required: bool, mode: SelectionMode, min: Option<u32>, max: Option<u32>) -> Question {
        let options = ["Red", "Green", "Blue", "Black"]
            .iter()
            .map(|label| ChoiceOption::new(label, false).unwrap())
            .collect();
        let settings = ChoiceSettings::new(mode, options, min, max, false).unwrap();
        question(required, QuestionVariant::Choice(settings))
    }

    fn text(required: bool, mode: TextMode, min: Option<u32>, max: Option<u32>) -> Question {
        let settings = TextSettings::new(mode, None, min, max).unwrap();
        question(required, QuestionVariant::Text(settings))
    }

    fn matching(required: bool) -> Question {
        let column = |texts: &[&str]| -> Vec<MatchingItem> {
            texts
                .iter()
                .map(|t| MatchingItem::new(Uuid::new_v4(), t).unwrap())
                .collect()
        };
        let settings = MatchingSettings::from_index_pairs(
            column(&["Spain", "Italy"]),
            column(&["Madrid", "Rome"]),
            &[(0, 0), (1, 1)],
            false,
        )
        .unwrap();
        question(required, QuestionVariant::Matching(settings))
    }

    fn codes(violations: &[AnswerViolation]) -> Vec<ViolationCode> {
        violations.iter().map(|v| v.code).collect()
    }

    fn text_answer(value: &str) -> Answer {
        Answer::Text {
            text: value.to_owned(),
        }
    }

    #[test]
    fn test_required_single_choice_needs_exactly_one_selection() {
        let q = choice(true, SelectionMode::Single, None, None);

        assert!(validate_answer(&q, &Answer::choice([1])).is_empty());
        assert_eq!(
            codes(&validate_answer(&q, &Answer::choice([]))),
            vec![ViolationCode::OutOfRange]
        );
        assert_eq!(
            codes(&validate_answer(&q, &Answer::choice([0, 1]))),
            vec![ViolationCode::OutOfRange]
        );
    }

    #[test]
    fn test_optional_single_choice_allows_no_selection() {
        let q = choice(false, SelectionMode::Single, None, None);

        assert!(validate_answer(&q, &Answer::choice([])).is_empty());
        assert_eq!(
            codes(&validate_answer(&q, &Answer::choice([0, 2]))),
            vec![ViolationCode::OutOfRange]
        );
    }

    #[test]
    fn test_multi_choice_reports_declared_bounds() {
        // Arrange
        let q = choice(true, SelectionMode::Multi, Some(2), Some(3));

        // Act
        let too_few = validate_answer(&q, &Answer::choice([0]));
        let too_many = validate_answer(&q, &Answer::choice([0, 1, 2, 3]));
        let none = validate_answer(&q, &Answer::choice([]));

        // Assert
        assert_eq!(codes(&too_few), vec![ViolationCode::MinViolation]);
        assert_eq!(codes(&too_many), vec![ViolationCode::MaxViolation]);
        assert_eq!(
            codes(&none),
            vec![ViolationCode::MinViolation, ViolationCode::Required]
        );
        assert!(validate_answer(&q, &Answer::choice([1, 3])).is_empty());
    }

    #[test]
    fn test_choice_rejects_unknown_option_index() {
        let q = choice(false, SelectionMode::Multi, None, None);
        let violations = validate_answer(&q, &Answer::choice([0, 4]));
        assert_eq!(codes(&violations), vec![ViolationCode::InvalidOption]);
        assert!(violations[0].message.contains('4'));
    }

    #[test]
    fn test_text_length_counts_characters() {
        let q = text(false, TextMode::Short, Some(3), Some(5));

        assert!(validate_answer(&q, &text_answer("ñandú")).is_empty());
        assert_eq!(
            codes(&validate_answer(&q, &text_answer("ñu"))),
            vec![ViolationCode::MinLength]
        );
        assert_eq!(
            codes(&validate_answer(&q, &text_answer("ñandús"))),
            vec![ViolationCode::MaxLength]
        );
    }

    #[test]
    fn test_required_text_rejects_blank() {
        let q = text(true, TextMode::Long, None, None);
        assert_eq!(
            codes(&validate_answer(&q, &text_answer("   "))),
            vec![ViolationCode::Required]
        );
        let optional = text(false, TextMode::Email, None, None);
        assert!(validate_answer(&optional, &text_answer("")).is_empty());
    }

    #[test]
    fn test_text_modes_check_format() {
        let email = text(false, TextMode::Email, None, None);
        let number = text(false, TextMode::Number, None, None);

        assert!(validate_answer(&email, &text_answer(" ana@example.com ")).is_empty());
        assert_eq!(
            codes(&validate_answer(&email, &text_answer("ana at example"))),
            vec![ViolationCode::InvalidFormat]
        );
        assert!(validate_answer(&number, &text_answer("-12.5")).is_empty());
        assert_eq!(
            codes(&validate_answer(&number, &text_answer("twelve"))),
            vec![ViolationCode::InvalidFormat]
        );
        assert_eq!(
            codes(&validate_answer(&number, &text_answer("NaN"))),
            vec![ViolationCode::InvalidFormat]
        );
    }

    #[test]
    fn test_matching_checks_item_membership() {
        // Arrange
        let q = matching(false);
        let QuestionVariant::Matching(settings) = q.variant() else {
            panic!("expected a matching question");
        };
        let (spain, italy) = (settings.left()[0].id(), settings.left()[1].id());
        let (madrid, rome) = (settings.right()[0].id(), settings.right()[1].id());
        let stranger = Uuid::new_v4();

        // Act
        let crossed = Answer::matching(&[(spain, rome), (italy, madrid)]).unwrap();
        let bad_left = Answer::matching(&[(stranger, madrid)]).unwrap();
        let bad_right = Answer::matching(&[(spain, stranger)]).unwrap();
        let shared = Answer::matching(&[(spain, madrid), (italy, madrid)]).unwrap();

        // Assert
        assert!(validate_answer(&q, &crossed).is_empty());
        assert_eq!(codes(&validate_answer(&q, &bad_left)), vec![ViolationCode::InvalidLeft]);
        assert_eq!(codes(&validate_answer(&q, &bad_right)), vec![ViolationCode::InvalidRight]);
        assert_eq!(codes(&validate_answer(&q, &shared)), vec![ViolationCode::DuplicateRight]);
    }

    #[test]
    fn test_required_matching_needs_a_pair() {
        let q = matching(true);
        let empty = Answer::matching(&[]).unwrap();
        assert_eq!(codes(&validate_answer(&q, &empty)), vec![ViolationCode::Required]);
    }

    #[test]
    fn test_answer_of_wrong_kind_is_type_mismatch() {
        let settings = TrueFalseSettings::new(true, None, None, false).unwrap();
        let q = question(false, QuestionVariant::TrueFalse(settings));

        let violations = validate_answer(&q, &text_answer("yes"));

        assert_eq!(codes(&violations), vec![ViolationCode::TypeMismatch]);
        assert_eq!(
            violations[0].message,
            "a TEXT answer cannot answer a TRUE_FALSE question"
        );
        assert!(validate_answer(&q, &Answer::TrueFalse { value: false }).is_empty());
    }

    #[test]
    fn test_validate_submission_reports_missing_and_unknown_questions() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let required = text(true, TextMode::Short, None, None);
        let optional = choice(false, SelectionMode::Single, None, None);
        let stranger = Uuid::new_v4();
        let submission =
            Submission::start(Uuid::new_v4(), Uuid::new_v4(), Respondent::Anonymous, &clock);
        let submission = submission
            .save_answer(optional.id(), Answer::choice([0]), &clock)
            .unwrap()
            .save_answer(stranger, Answer::TrueFalse { value: true }, &clock)
            .unwrap();

        // Act
        let violations = validate_submission(&submission, &[required.clone(), optional]);

        // Assert
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].question_id, required.id());
        assert_eq!(violations[0].code, ViolationCode::Required);
        assert_eq!(violations[1].question_id, stranger);
        assert_eq!(violations[1].code, ViolationCode::Unknown);
    }

    #[test]
    fn test_violation_display_reads_id_code_message() {
        let id = Uuid::nil();
        let violation = AnswerViolation::new(id, ViolationCode::MaxLength, "too long");
        assert_eq!(violation.to_string(), format!("{id}: max_length: too long"));
    }

    proptest! {
        #[test]
        fn prop_multi_selection_accepted_iff_within_bounds(
            min in 0u32..4,
            span in 0u32..4,
            selected in proptest::collection::btree_set(0u32..4, 0..=4),
        ) {
            let max = (min + span).clamp(1, 4);
            let min = min.min(max);
            let q = choice(false, SelectionMode::Multi, Some(min), Some(max));
            let count = u32::try_from(selected.len()).unwrap();

            let violations = validate_answer(&q, &Answer::Choice { selected });

            prop_assert_eq!(violations.is_empty(), (min..=max).contains(&count));
        }
    }
}
