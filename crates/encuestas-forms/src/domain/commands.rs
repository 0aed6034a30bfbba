//! Commands for the Form Authoring context.

use chrono::{DateTime, Utc};
use encuestas_core::impl_command;
use uuid::Uuid;

use super::aggregates::{FormOptions, FormStatus};
use super::value_objects::{AccessMode, PresentationOptions, ResponseLimitPolicy, Theme};

/// Command to create a form inside a campaign.
#[derive(Debug, Clone)]
pub struct CreateForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new form.
    pub form_id: Uuid,
    /// The owning campaign.
    pub campaign_id: Uuid,
    /// The form title.
    pub title: String,
    /// Everything else; defaults apply where not given.
    pub options: FormOptions,
}

/// Command to rename a form.
#[derive(Debug, Clone)]
pub struct RenameForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The new title.
    pub title: String,
}

/// Command to replace a form's description.
#[derive(Debug, Clone)]
pub struct ChangeFormDescription {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// New description; `None` or blank clears it.
    pub description: Option<String>,
}

/// Command to change a form's theme.
#[derive(Debug, Clone)]
pub struct ChangeTheme {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The new theme.
    pub theme: Theme,
}

/// Command to change who may open a form.
#[derive(Debug, Clone)]
pub struct SetAccessMode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The new access mode.
    pub access_mode: AccessMode,
}

/// Command to change a form's availability window.
#[derive(Debug, Clone)]
pub struct RescheduleForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// New opening instant.
    pub open_at: Option<DateTime<Utc>>,
    /// New closing instant.
    pub close_at: Option<DateTime<Utc>>,
}

/// Command to change a form's response limit.
#[derive(Debug, Clone)]
pub struct SetResponseLimitPolicy {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The new policy.
    pub policy: ResponseLimitPolicy,
}

/// Command to change a form's layout options.
#[derive(Debug, Clone)]
pub struct SetPresentationOptions {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The new options.
    pub presentation: PresentationOptions,
}

/// Command to switch anonymous mode.
#[derive(Debug, Clone)]
pub struct SetAnonymousMode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Whether responses are anonymous.
    pub enabled: bool,
}

/// Command to switch edit-before-submit.
#[derive(Debug, Clone)]
pub struct SetAllowEditBeforeSubmit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Whether respondents may edit before submitting.
    pub enabled: bool,
}

/// Command to switch auto-save.
#[derive(Debug, Clone)]
pub struct SetAutoSave {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Whether answers are saved as the respondent types.
    pub enabled: bool,
}

/// Command to move a form through its lifecycle.
#[derive(Debug, Clone)]
pub struct ChangeFormStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Requested status. `None` is rejected as an invalid transition.
    pub target: Option<FormStatus>,
}

/// Command to generate (or regenerate) a form's public link code.
#[derive(Debug, Clone)]
pub struct GeneratePublicLink {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Replace an existing code.
    pub force: bool,
}

/// Command to delete a form.
#[derive(Debug, Clone)]
pub struct DeleteForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
}

/// Command to append a section to a form.
#[derive(Debug, Clone)]
pub struct AddSection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Identifier for the new section.
    pub section_id: Uuid,
    /// Optional title.
    pub title: Option<String>,
}

/// Command to retitle a section.
#[derive(Debug, Clone)]
pub struct RenameSection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form the section belongs to.
    pub form_id: Uuid,
    /// The section identifier.
    pub section_id: Uuid,
    /// New title; `None` or blank clears it.
    pub title: Option<String>,
}

/// Command to move a section within its form.
#[derive(Debug, Clone)]
pub struct MoveSection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form the section belongs to.
    pub form_id: Uuid,
    /// The section identifier.
    pub section_id: Uuid,
    /// Requested zero-based position. Negative values are rejected; values
    /// past the end clamp to the last slot.
    pub new_position: i64,
}

/// Command to delete a section.
#[derive(Debug, Clone)]
pub struct DeleteSection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form the section belongs to.
    pub form_id: Uuid,
    /// The section identifier.
    pub section_id: Uuid,
}

impl_command!(CreateForm, "forms.create_form");
impl_command!(RenameForm, "forms.rename_form");
impl_command!(ChangeFormDescription, "forms.change_description");
impl_command!(ChangeTheme, "forms.change_theme");
impl_command!(SetAccessMode, "forms.set_access_mode");
impl_command!(RescheduleForm, "forms.reschedule_form");
impl_command!(SetResponseLimitPolicy, "forms.set_limit_policy");
impl_command!(SetPresentationOptions, "forms.set_presentation");
impl_command!(SetAnonymousMode, "forms.set_anonymous");
impl_command!(SetAllowEditBeforeSubmit, "forms.set_allow_edit");
impl_command!(SetAutoSave, "forms.set_auto_save");
impl_command!(ChangeFormStatus, "forms.change_status");
impl_command!(GeneratePublicLink, "forms.generate_public_link");
impl_command!(DeleteForm, "forms.delete_form");
impl_command!(AddSection, "forms.add_section");
impl_command!(RenameSection, "forms.rename_section");
impl_command!(MoveSection, "forms.move_section");
impl_command!(DeleteSection, "forms.delete_section");
