//! The Question aggregate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use encuestas_core::aggregate::Aggregate;
use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::position::Positioned;
use encuestas_core::text::normalize_optional;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ChoiceOption, Prompt};
use super::variants::{QuestionVariant, TextSettings, TrueFalseSettings};

/// A question inside a section. Positions are dense and unique per section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: Uuid,
    form_id: Uuid,
    section_id: Uuid,
    position: u32,
    prompt: Prompt,
    help_text: Option<String>,
    required: bool,
    variant: QuestionVariant,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Question {
    const KIND: &'static str = "question";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Positioned for Question {
    fn parent_id(&self) -> Uuid {
        self.section_id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn with_position(&self, position: u32) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

/// The fields shared by every question kind, as supplied on creation.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    /// Identifier for the new question.
    pub id: Uuid,
    /// The owning form.
    pub form_id: Uuid,
    /// The owning section.
    pub section_id: Uuid,
    /// Validated prompt.
    pub prompt: Prompt,
    /// Optional help text; blank becomes absent.
    pub help_text: Option<String>,
    /// Whether an answer is mandatory.
    pub required: bool,
}

impl Question {
    /// Creates a question at `position`.
    #[must_use]
    pub fn create(
        draft: QuestionDraft,
        position: u32,
        variant: QuestionVariant,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: draft.id,
            form_id: draft.form_id,
            section_id: draft.section_id,
            position,
            prompt: draft.prompt,
            help_text: normalize_optional(draft.help_text),
            required: draft.required,
            variant,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    #[must_use]
    pub fn section_id(&self) -> Uuid {
        self.section_id
    }

    #[must_use]
    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    #[must_use]
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// The kind and its settings.
    #[must_use]
    pub fn variant(&self) -> &QuestionVariant {
        &self.variant
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn with_variant(&self, variant: QuestionVariant, clock: &dyn Clock) -> Self {
        Self {
            variant,
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    /// Returns a snapshot with a new prompt.
    #[must_use]
    pub fn rename(&self, prompt: Prompt, clock: &dyn Clock) -> Self {
        Self {
            prompt,
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    /// Returns a snapshot with new help text; blank clears it.
    #[must_use]
    pub fn change_help(&self, help_text: Option<String>, clock: &dyn Clock) -> Self {
        Self {
            help_text: normalize_optional(help_text),
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_required(&self, required: bool, clock: &dyn Clock) -> Self {
        Self {
            required,
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    /// Toggles option shuffling, or right-column shuffling for matching.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WrongVariant` for a text question.
    pub fn set_shuffle(&self, shuffle: bool, clock: &dyn Clock) -> Result<Self, DomainError> {
        let variant = match &self.variant {
            QuestionVariant::Choice(s) => QuestionVariant::Choice(s.clone().with_shuffle(shuffle)),
            QuestionVariant::TrueFalse(s) => {
                QuestionVariant::TrueFalse(s.clone().with_shuffle(shuffle))
            }
            QuestionVariant::Matching(s) => {
                QuestionVariant::Matching(s.clone().with_shuffle(shuffle))
            }
            QuestionVariant::Text(_) => {
                return Err(self.variant.wrong("CHOICE, TRUE_FALSE or MATCHING"));
            }
        };
        Ok(self.with_variant(variant, clock))
    }

    /// Replaces the options of a choice or true/false question.
    ///
    /// A choice question keeps its mode and bounds, which must still fit the
    /// new option count. A true/false question needs exactly two options with
    /// exactly one correct.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WrongVariant` for other kinds and
    /// `DomainError::InvalidArgument` if the options are rejected.
    pub fn replace_choice_options(
        &self,
        options: Vec<ChoiceOption>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let variant = match &self.variant {
            QuestionVariant::Choice(s) => QuestionVariant::Choice(s.replace_options(options)?),
            QuestionVariant::TrueFalse(s) => QuestionVariant::TrueFalse(
                TrueFalseSettings::from_options(options, s.shuffle_options())?,
            ),
            other => return Err(other.wrong("CHOICE or TRUE_FALSE")),
        };
        Ok(self.with_variant(variant, clock))
    }

    /// Sets the selection bounds of a MULTI choice question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WrongVariant` for non-choice questions and
    /// `DomainError::InvalidArgument` for SINGLE questions or bad bounds.
    pub fn set_multi_bounds(
        &self,
        min_selections: Option<u32>,
        max_selections: Option<u32>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        match &self.variant {
            QuestionVariant::Choice(s) => {
                let settings = s.with_bounds(min_selections, max_selections)?;
                Ok(self.with_variant(QuestionVariant::Choice(settings), clock))
            }
            other => Err(other.wrong("CHOICE")),
        }
    }

    /// Replaces the settings of a text question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WrongVariant` for other kinds.
    pub fn set_text_settings(
        &self,
        settings: TextSettings,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        match &self.variant {
            QuestionVariant::Text(_) => {
                Ok(self.with_variant(QuestionVariant::Text(settings), clock))
            }
            other => Err(other.wrong("TEXT")),
        }
    }

    /// Replaces the answer key of a matching question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WrongVariant` for other kinds and
    /// `DomainError::InvalidMatchingKey` if the key does not map every
    /// current left item onto a current right item.
    pub fn set_matching(
        &self,
        answer_key: BTreeMap<Uuid, Uuid>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        match &self.variant {
            QuestionVariant::Matching(s) => {
                let settings = s.with_key(answer_key)?;
                Ok(self.with_variant(QuestionVariant::Matching(settings), clock))
            }
            other => Err(other.wrong("MATCHING")),
        }
    }

    /// Returns a snapshot placed in `section_id` at `position`.
    ///
    /// Sibling renumbering is left to the sequencer.
    #[must_use]
    pub fn move_to(&self, section_id: Uuid, position: u32, clock: &dyn Clock) -> Self {
        Self {
            section_id,
            position,
            updated_at: clock.now(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{SelectionMode, TextMode};
    use crate::domain::variants::{ChoiceSettings, MatchingSettings};
    use chrono::Duration;
    use encuestas_test_support::{FixedClock, fixed_now};

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            section_id: Uuid::new_v4(),
            prompt: Prompt::of("Pick one").unwrap(),
            help_text: Some("  ".to_owned()),
            required: true,
        }
    }

    fn choice(mode: SelectionMode, labels: &[&str], max: Option<u32>) -> QuestionVariant {
        let options = labels
            .iter()
            .map(|l| ChoiceOption::new(l, false).unwrap())
            .collect();
        QuestionVariant::Choice(ChoiceSettings::new(mode, options, None, max, false).unwrap())
    }

    fn text_question() -> Question {
        Question::create(
            draft(),
            0,
            QuestionVariant::Text(TextSettings::default()),
            &FixedClock(fixed_now()),
        )
    }

    #[test]
    fn test_create_drops_blank_help_text() {
        let question = text_question();
        assert_eq!(question.help_text(), None);
        assert_eq!(question.created_at(), question.updated_at());
    }

    #[test]
    fn test_variant_mutation_keeps_common_fields() {
        // Arrange
        let question = Question::create(
            draft(),
            3,
            choice(SelectionMode::Multi, &["A", "B", "C"], None),
            &FixedClock(fixed_now()),
        );
        let later = FixedClock(fixed_now() + Duration::minutes(5));

        // Act
        let updated = question.set_multi_bounds(Some(1), Some(2), &later).unwrap();

        // Assert
        assert_eq!(updated.id(), question.id());
        assert_eq!(updated.position(), 3);
        assert_eq!(updated.prompt(), question.prompt());
        assert!(updated.required());
        assert_eq!(updated.updated_at(), later.0);
    }

    #[test]
    fn test_set_multi_bounds_on_single_is_invalid_argument() {
        let question = Question::create(
            draft(),
            0,
            choice(SelectionMode::Single, &["A", "B"], None),
            &FixedClock(fixed_now()),
        );
        let result = question.set_multi_bounds(Some(1), None, &FixedClock(fixed_now()));
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn test_set_multi_bounds_on_text_is_wrong_variant() {
        let result = text_question().set_multi_bounds(None, Some(1), &FixedClock(fixed_now()));
        assert_eq!(
            result.unwrap_err(),
            DomainError::WrongVariant {
                expected: "CHOICE",
                actual: "TEXT"
            }
        );
    }

    #[test]
    fn test_set_shuffle_on_text_is_wrong_variant() {
        let result = text_question().set_shuffle(true, &FixedClock(fixed_now()));
        assert!(matches!(result, Err(DomainError::WrongVariant { .. })));
    }

    #[test]
    fn test_replace_options_on_true_false_requires_one_correct() {
        // Arrange
        let question = Question::create(
            draft(),
            0,
            QuestionVariant::TrueFalse(TrueFalseSettings::new(true, None, None, false).unwrap()),
            &FixedClock(fixed_now()),
        );
        let clock = FixedClock(fixed_now());

        // Act
        let none_correct = question.replace_choice_options(
            vec![
                ChoiceOption::new("Yes", false).unwrap(),
                ChoiceOption::new("No", false).unwrap(),
            ],
            &clock,
        );
        let flipped = question
            .replace_choice_options(
                vec![
                    ChoiceOption::new("Yes", false).unwrap(),
                    ChoiceOption::new("No", true).unwrap(),
                ],
                &clock,
            )
            .unwrap();

        // Assert
        assert!(none_correct.is_err());
        let QuestionVariant::TrueFalse(settings) = flipped.variant() else {
            panic!("expected a true/false question");
        };
        assert!(!settings.true_is_correct());
    }

    #[test]
    fn test_set_text_settings_replaces_settings() {
        let settings = TextSettings::new(TextMode::Email, None, None, Some(120)).unwrap();
        let updated = text_question()
            .set_text_settings(settings.clone(), &FixedClock(fixed_now()))
            .unwrap();
        assert_eq!(updated.variant(), &QuestionVariant::Text(settings));
    }

    #[test]
    fn test_set_matching_on_choice_is_wrong_variant() {
        let question = Question::create(
            draft(),
            0,
            choice(SelectionMode::Single, &["A", "B"], None),
            &FixedClock(fixed_now()),
        );
        let result = question.set_matching(BTreeMap::new(), &FixedClock(fixed_now()));
        assert!(matches!(
            result,
            Err(DomainError::WrongVariant {
                expected: "MATCHING",
                actual: "CHOICE"
            })
        ));
    }

    #[test]
    fn test_set_matching_validates_against_current_items() {
        // Arrange
        let item = |text: &str| {
            crate::domain::value_objects::MatchingItem::new(Uuid::new_v4(), text).unwrap()
        };
        let left = vec![item("Spain"), item("Portugal")];
        let right = vec![item("Madrid"), item("Lisbon")];
        let (spain, portugal) = (left[0].id(), left[1].id());
        let (madrid, lisbon) = (right[0].id(), right[1].id());
        let settings =
            MatchingSettings::from_index_pairs(left, right, &[(0, 0), (1, 1)], false).unwrap();
        let question = Question::create(
            draft(),
            0,
            QuestionVariant::Matching(settings),
            &FixedClock(fixed_now()),
        );

        // Act
        let updated = question
            .set_matching(
                BTreeMap::from([(spain, lisbon), (portugal, madrid)]),
                &FixedClock(fixed_now()),
            )
            .unwrap();

        // Assert
        let QuestionVariant::Matching(settings) = updated.variant() else {
            panic!("expected a matching question");
        };
        assert_eq!(
            settings.export_key_as_pairs(),
            vec!["Spain -> Lisbon".to_owned(), "Portugal -> Madrid".to_owned()]
        );
        let partial =
            question.set_matching(BTreeMap::from([(spain, lisbon)]), &FixedClock(fixed_now()));
        assert!(matches!(partial, Err(DomainError::InvalidMatchingKey(_))));
    }

    #[test]
    fn test_move_to_changes_section_and_position() {
        let question = text_question();
        let target = Uuid::new_v4();
        let moved = question.move_to(target, 2, &FixedClock(fixed_now()));
        assert_eq!(moved.section_id(), target);
        assert_eq!(moved.parent_id(), target);
        assert_eq!(moved.position(), 2);
        assert_eq!(moved.form_id(), question.form_id());
    }

    #[test]
    fn test_question_serde_round_trip() {
        let question = Question::create(
            draft(),
            1,
            choice(SelectionMode::Multi, &["A", "B"], Some(2)),
            &FixedClock(fixed_now()),
        );
        let json = serde_json::to_string(&question).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, question);
    }
}
