//! Value objects for the Question Authoring context.

use std::fmt;
use std::str::FromStr;

use encuestas_core::error::DomainError;
use encuestas_core::text::required_text;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum prompt length, in characters.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Maximum option label and matching item text length, in characters.
pub const MAX_ITEM_CHARS: usize = 300;

/// The question text shown to respondents: trimmed, 1–500 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(String);

impl Prompt {
    /// Validates and normalises a prompt.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the prompt is blank or
    /// too long.
    pub fn of(value: &str) -> Result<Self, DomainError> {
        required_text("prompt", value, MAX_PROMPT_CHARS).map(Self)
    }

    /// The normalised prompt.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct RawChoiceOption {
    label: String,
    is_correct: bool,
}

/// One selectable answer of a choice or true/false question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChoiceOption")]
pub struct ChoiceOption {
    label: String,
    is_correct: bool,
}

impl ChoiceOption {
    /// Validates an option label (trimmed, 1–300 characters).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the label is blank or too
    /// long.
    pub fn new(label: &str, is_correct: bool) -> Result<Self, DomainError> {
        Ok(Self {
            label: required_text("option label", label, MAX_ITEM_CHARS)?,
            is_correct,
        })
    }

    /// The option label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this option is marked correct.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

impl TryFrom<RawChoiceOption> for ChoiceOption {
    type Error = DomainError;

    fn try_from(raw: RawChoiceOption) -> Result<Self, Self::Error> {
        Self::new(&raw.label, raw.is_correct)
    }
}

#[derive(Deserialize)]
struct RawMatchingItem {
    id: Uuid,
    text: String,
}

/// An entry in one column of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatchingItem")]
pub struct MatchingItem {
    id: Uuid,
    text: String,
}

impl MatchingItem {
    /// Validates an item text (trimmed, 1–300 characters).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the text is blank or too
    /// long.
    pub fn new(id: Uuid, text: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            text: required_text("matching item", text, MAX_ITEM_CHARS)?,
        })
    }

    /// The item identifier, referenced by the answer key.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The item text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TryFrom<RawMatchingItem> for MatchingItem {
    type Error = DomainError;

    fn try_from(raw: RawMatchingItem) -> Result<Self, Self::Error> {
        Self::new(raw.id, &raw.text)
    }
}

/// Whether a choice question accepts one or several answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    /// Exactly one option.
    #[default]
    Single,
    /// Any number of options, optionally bounded.
    Multi,
}

impl FromStr for SelectionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SINGLE" => Ok(Self::Single),
            "MULTI" => Ok(Self::Multi),
            other => Err(DomainError::invalid(format!("unknown selection mode: {other}"))),
        }
    }
}

/// Expected shape of a free-text answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextMode {
    /// Single line.
    #[default]
    Short,
    /// Multi-line.
    Long,
    /// An email address.
    Email,
    /// A number.
    Number,
}

impl FromStr for TextMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHORT" => Ok(Self::Short),
            "LONG" => Ok(Self::Long),
            "EMAIL" => Ok(Self::Email),
            "NUMBER" => Ok(Self::Number),
            other => Err(DomainError::invalid(format!("unknown text mode: {other}"))),
        }
    }
}
