//! Value objects for the Response Collection context.

use std::fmt;

use encuestas_core::error::DomainError;
use encuestas_core::status::Lifecycle;
use encuestas_core::text::required_text;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_EMAIL_CHARS: usize = 254;
const MAX_ACCESS_CODE_CHARS: usize = 64;

/// Who is answering a form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Respondent {
    /// Nobody in particular. Only accepted by forms in anonymous mode.
    Anonymous,
    /// A signed-in user.
    User(Uuid),
    /// Someone identified by email address.
    Email(String),
    /// Someone holding an access code.
    Code(String),
}

impl Respondent {
    /// A respondent identified by email. The address is trimmed and
    /// lowercased so the same person is recognised across submissions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a blank or over-long
    /// address, or one without an `@`.
    pub fn email(value: &str) -> Result<Self, DomainError> {
        let email = required_text("email", value, MAX_EMAIL_CHARS)?.to_lowercase();
        if !looks_like_email(&email) {
            return Err(DomainError::invalid(format!("not an email address: {email}")));
        }
        Ok(Self::Email(email))
    }

    /// A respondent identified by an access code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a blank or over-long code.
    pub fn code(value: &str) -> Result<Self, DomainError> {
        required_text("access code", value, MAX_ACCESS_CODE_CHARS).map(Self::Code)
    }

    /// Whether the respondent carries no identity.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Stable kind name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Anonymous => "ANONYMOUS",
            Self::User(_) => "USER",
            Self::Email(_) => "EMAIL",
            Self::Code(_) => "CODE",
        }
    }
}

/// `local@domain` with both parts non-empty and no whitespace.
pub(crate) fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Answers may still change.
    Draft,
    /// Handed in. Terminal.
    Submitted,
}

impl Lifecycle for SubmissionStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
