//! Answers, one shape per question kind.

use std::collections::{BTreeMap, BTreeSet};

use encuestas_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A respondent's answer to a single question.
///
/// Shapes are only checked against the question when the submission is
/// handed in; saving accepts any well-formed answer of the right kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Answer {
    /// Zero-based indexes of the selected options.
    Choice {
        /// Selected option indexes.
        selected: BTreeSet<u32>,
    },
    /// The chosen truth value.
    TrueFalse {
        /// `true` for the "true" option.
        value: bool,
    },
    /// Free text, stored as typed.
    Text {
        /// The text.
        text: String,
    },
    /// Left item id to the right item id the respondent paired it with.
    Matching {
        /// The pairs, keyed by left item.
        pairs: BTreeMap<Uuid, Uuid>,
    },
}

impl Answer {
    /// A choice answer. Repeated indexes collapse.
    #[must_use]
    pub fn choice(selected: impl IntoIterator<Item = u32>) -> Self {
        Self::Choice {
            selected: selected.into_iter().collect(),
        }
    }

    /// A matching answer from `(left, right)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if a left item is paired
    /// twice.
    pub fn matching(pairs: &[(Uuid, Uuid)]) -> Result<Self, DomainError> {
        let mut by_left = BTreeMap::new();
        for &(left, right) in pairs {
            if by_left.insert(left, right).is_some() {
                return Err(DomainError::invalid(format!(
                    "left item {left} is paired more than once"
                )));
            }
        }
        Ok(Self::Matching { pairs: by_left })
    }

    /// The question kind this answer belongs to, spelled as
    /// `QuestionVariant::kind` spells it.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "CHOICE",
            Self::TrueFalse { .. } => "TRUE_FALSE",
            Self::Text { .. } => "TEXT",
            Self::Matching { .. } => "MATCHING",
        }
    }
}
