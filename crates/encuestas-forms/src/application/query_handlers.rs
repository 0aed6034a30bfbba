//! Query handlers for the Form Authoring context.

use chrono::{DateTime, Utc};
use encuestas_core::error::DomainError;
use encuestas_core::position::{Positioned, ordered};
use encuestas_core::repository::{AggregateRepository, ChildRepository, load_required};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Form, FormStatus};
use crate::domain::ports::PublicCodeLookup;
use crate::domain::sections::Section;
use crate::domain::value_objects::{
    AccessMode, AvailabilityWindow, PresentationOptions, PublicCode, ResponseLimitPolicy, Theme,
};

/// Read-only view of a form.
#[derive(Debug, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormView {
    /// The form identifier.
    pub form_id: Uuid,
    /// The owning campaign.
    pub campaign_id: Uuid,
    /// The title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional cover image URL.
    pub cover_url: Option<String>,
    /// Visual theme.
    pub theme: Theme,
    /// Who may open the form.
    pub access_mode: AccessMode,
    /// When the form accepts responses.
    pub window: AvailabilityWindow,
    /// Responses allowed per respondent.
    pub limit_policy: ResponseLimitPolicy,
    /// Whether respondent identity is hidden.
    pub anonymous_mode: bool,
    /// Whether respondents may edit before submitting.
    pub allow_edit_before_submit: bool,
    /// Whether answers are saved as the respondent types.
    pub auto_save: bool,
    /// Layout options.
    pub presentation: PresentationOptions,
    /// Current lifecycle status.
    pub status: FormStatus,
    /// Public link code, once generated.
    pub public_code: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&Form> for FormView {
    fn from(form: &Form) -> Self {
        Self {
            form_id: form.id(),
            campaign_id: form.campaign_id(),
            title: form.title().to_string(),
            description: form.description().map(str::to_owned),
            cover_url: form.cover_url().map(str::to_owned),
            theme: form.theme().clone(),
            access_mode: form.access_mode(),
            window: form.window(),
            limit_policy: form.limit_policy(),
            anonymous_mode: form.anonymous_mode(),
            allow_edit_before_submit: form.allow_edit_before_submit(),
            auto_save: form.auto_save(),
            presentation: form.presentation(),
            status: form.status(),
            public_code: form.public_code().map(ToString::to_string),
            created_at: form.created_at(),
            updated_at: form.updated_at(),
        }
    }
}

/// The subset of a form shown behind its public link.
#[derive(Debug, Serialize)]
pub struct PublicFormView {
    /// The form identifier.
    pub form_id: Uuid,
    /// The title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Opening instant, if bounded.
    pub open_at: Option<DateTime<Utc>>,
    /// Closing instant, if bounded.
    pub close_at: Option<DateTime<Utc>>,
    /// Who may open the form.
    pub access_mode: AccessMode,
    /// Current lifecycle status.
    pub status: FormStatus,
}

/// Read-only view of a section.
#[derive(Debug, Serialize)]
pub struct SectionView {
    /// The section identifier.
    pub section_id: Uuid,
    /// The owning form.
    pub form_id: Uuid,
    /// Optional title.
    pub title: Option<String>,
    /// Zero-based position in the form.
    pub position: u32,
}

/// Retrieves a form by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no form exists for the ID, or a
/// repository error.
pub async fn get_form_by_id(
    form_id: Uuid,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormView, DomainError> {
    let form: Form = load_required(repo, form_id).await?;
    Ok(FormView::from(&form))
}

/// Lists a form's sections in position order.
///
/// # Errors
///
/// Returns a repository error.
pub async fn list_sections(
    form_id: Uuid,
    sections: &dyn ChildRepository<Section>,
) -> Result<Vec<SectionView>, DomainError> {
    let found = sections.list_by_parent(form_id).await?;
    Ok(ordered(&found)
        .iter()
        .map(|s| SectionView {
            section_id: s.id(),
            form_id: s.form_id(),
            title: s.title().map(str::to_owned),
            position: s.position(),
        })
        .collect())
}

/// Resolves a public link code to the form's public view.
///
/// Returns `Ok(None)` when no form carries the code.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a malformed code, or a lookup
/// error.
pub async fn get_form_by_public_code(
    code: &str,
    lookup: &dyn PublicCodeLookup,
) -> Result<Option<PublicFormView>, DomainError> {
    let code = PublicCode::of(code.trim())?;
    let form = lookup.find_by_public_code(&code).await?;
    Ok(form.map(|f| PublicFormView {
        form_id: f.id(),
        title: f.title().to_string(),
        description: f.description().map(str::to_owned),
        open_at: f.window().open_at(),
        close_at: f.window().close_at(),
        access_mode: f.access_mode(),
        status: f.status(),
    }))
}
