//! Sections: ordered groups of questions inside a form.

use encuestas_core::aggregate::Aggregate;
use encuestas_core::error::DomainError;
use encuestas_core::position::Positioned;
use encuestas_core::text::normalize_optional;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum section title length, in characters.
pub const MAX_SECTION_TITLE_CHARS: usize = 200;

fn section_title(title: Option<String>) -> Result<Option<String>, DomainError> {
    let title = normalize_optional(title);
    if let Some(t) = &title {
        if t.chars().count() > MAX_SECTION_TITLE_CHARS {
            return Err(DomainError::invalid(format!(
                "section title exceeds {MAX_SECTION_TITLE_CHARS} characters"
            )));
        }
    }
    Ok(title)
}

/// A section of a form. Positions are dense and unique per form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: Uuid,
    form_id: Uuid,
    title: Option<String>,
    position: u32,
}

impl Aggregate for Section {
    const KIND: &'static str = "section";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Positioned for Section {
    fn parent_id(&self) -> Uuid {
        self.form_id
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

impl Section {
    /// Creates a section at `position`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the title is too long.
    pub fn new(
        id: Uuid,
        form_id: Uuid,
        title: Option<String>,
        position: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            form_id,
            title: section_title(title)?,
            position,
        })
    }

    /// The section identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The owning form.
    #[must_use]
    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    /// The optional title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns a snapshot with a new title. Blank clears it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the title is too long.
    pub fn rename(&self, title: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            title: section_title(title)?,
            ..self.clone()
        })
    }
}
