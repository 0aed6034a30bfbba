//! Query handlers for the Question Authoring context.

use chrono::{DateTime, Utc};
use encuestas_core::error::DomainError;
use encuestas_core::position::{Positioned, ordered};
use encuestas_core::repository::{ChildRepository, load_required};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Question;
use crate::domain::variants::QuestionVariant;

/// Read-only view of a question.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    /// The question identifier.
    pub question_id: Uuid,
    /// The owning form.
    pub form_id: Uuid,
    /// The owning section.
    pub section_id: Uuid,
    /// Zero-based position in the section.
    pub position: u32,
    /// The question text.
    pub prompt: String,
    /// Optional help text.
    pub help_text: Option<String>,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Kind and kind-specific settings, tagged by `type`.
    #[serde(flatten)]
    pub variant: QuestionVariant,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.id(),
            form_id: question.form_id(),
            section_id: question.section_id(),
            position: question.position(),
            prompt: question.prompt().to_string(),
            help_text: question.help_text().map(str::to_owned),
            required: question.required(),
            variant: question.variant().clone(),
            created_at: question.created_at(),
            updated_at: question.updated_at(),
        }
    }
}

/// Retrieves a question by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no question exists for the ID, or a
/// repository error.
pub async fn get_question_by_id(
    question_id: Uuid,
    repo: &dyn ChildRepository<Question>,
) -> Result<QuestionView, DomainError> {
    let question: Question = load_required(repo, question_id).await?;
    Ok(QuestionView::from(&question))
}

/// Lists the questions of a section in position order.
///
/// # Errors
///
/// Returns a repository error.
pub async fn list_questions(
    section_id: Uuid,
    repo: &dyn ChildRepository<Question>,
) -> Result<Vec<QuestionView>, DomainError> {
    let questions = repo.list_by_parent(section_id).await?;
    Ok(ordered(&questions).iter().map(QuestionView::from).collect())
}

/// Renders the answer key of a matching question as `"left -> right"`
/// lines.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the question does not exist,
/// `DomainError::WrongVariant` unless it is a matching question, or a
/// repository error.
pub async fn export_matching_key(
    question_id: Uuid,
    repo: &dyn ChildRepository<Question>,
) -> Result<Vec<String>, DomainError> {
    let question: Question = load_required(repo, question_id).await?;
    match question.variant() {
        QuestionVariant::Matching(settings) => Ok(settings.export_key_as_pairs()),
        other => Err(DomainError::WrongVariant {
            expected: "MATCHING",
            actual: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use encuestas_test_support::{FixedClock, InMemoryRepository, fixed_now};

    use super::*;
    use crate::domain::aggregates::QuestionDraft;
    use crate::domain::value_objects::{MatchingItem, Prompt};
    use crate::domain::variants::{MatchingSettings, TextSettings};

    fn question(
        section_id: Uuid,
        prompt: &str,
        position: u32,
        variant: QuestionVariant,
    ) -> Question {
        let draft = QuestionDraft {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            section_id,
            prompt: Prompt::of(prompt).unwrap(),
            help_text: None,
            required: false,
        };
        Question::create(draft, position, variant, &FixedClock(fixed_now()))
    }

    fn text() -> QuestionVariant {
        QuestionVariant::Text(TextSettings::default())
    }

    #[tokio::test]
    async fn test_get_question_by_id_missing_is_not_found() {
        let repo = InMemoryRepository::<Question>::new();
        let id = Uuid::new_v4();

        let result = get_question_by_id(id, &repo).await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::NotFound {
                entity: "question",
                id,
            }
        );
    }

    #[tokio::test]
    async fn test_list_questions_orders_by_position() {
        // Arrange
        let section_id = Uuid::new_v4();
        let repo = InMemoryRepository::with([
            question(section_id, "Second", 1, text()),
            question(section_id, "First", 0, text()),
            question(Uuid::new_v4(), "Elsewhere", 0, text()),
        ]);

        // Act
        let views = list_questions(section_id, &repo).await.unwrap();

        // Assert
        let prompts: Vec<&str> = views.iter().map(|v| v.prompt.as_str()).collect();
        assert_eq!(prompts, ["First", "Second"]);
    }

    #[tokio::test]
    async fn test_question_view_serializes_variant_type() {
        let section_id = Uuid::new_v4();
        let q = question(section_id, "Comments", 0, text());
        let repo = InMemoryRepository::with([q.clone()]);

        let view = get_question_by_id(q.id(), &repo).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["type"], "TEXT");
        assert_eq!(json["mode"], "SHORT");
        assert_eq!(json["prompt"], "Comments");
    }

    #[tokio::test]
    async fn test_export_matching_key() {
        // Arrange
        let settings = MatchingSettings::from_index_pairs(
            vec![MatchingItem::new(Uuid::new_v4(), "H2O").unwrap()],
            vec![MatchingItem::new(Uuid::new_v4(), "Water").unwrap()],
            &[(0, 0)],
            false,
        )
        .unwrap();
        let q = question(Uuid::new_v4(), "Match", 0, QuestionVariant::Matching(settings));
        let repo = InMemoryRepository::with([q.clone()]);

        // Act
        let lines = export_matching_key(q.id(), &repo).await.unwrap();

        // Assert
        assert_eq!(lines, ["H2O -> Water"]);
    }

    #[tokio::test]
    async fn test_export_matching_key_on_text_is_wrong_variant() {
        let q = question(Uuid::new_v4(), "Comments", 0, text());
        let repo = InMemoryRepository::with([q.clone()]);

        let result = export_matching_key(q.id(), &repo).await;

        assert!(matches!(result, Err(DomainError::WrongVariant { .. })));
    }
}
