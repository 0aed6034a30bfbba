//! Command handlers for forms.
//!
//! Each handler loads the current snapshot through the repository port,
//! applies one domain method, and saves the resulting snapshot. Section
//! commands live in [`super::section_handlers`].

use std::sync::Mutex;

use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::repository::{AggregateRepository, load_required};
use encuestas_core::rng::DeterministicRng;
use encuestas_core::status::Transition;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::Form;
use crate::domain::commands::{
    ChangeFormDescription, ChangeFormStatus, ChangeTheme, CreateForm, DeleteForm,
    GeneratePublicLink, RenameForm, RescheduleForm, SetAccessMode, SetAllowEditBeforeSubmit,
    SetAnonymousMode, SetAutoSave, SetPresentationOptions, SetResponseLimitPolicy,
};
use crate::domain::events::{FormEvent, FormStatusChanged};
use crate::domain::ports::{CampaignDirectory, FormTitleIndex, QuestionCounter};
use crate::domain::public_link::PublicLinkSettings;
use crate::domain::value_objects::{AvailabilityWindow, FormTitle, PublicCode};

/// Result of a successfully handled form command.
#[derive(Debug)]
pub struct FormCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
    /// The snapshot after the command.
    pub form: Form,
    /// Events produced by the command. Empty unless the status changed.
    pub events: Vec<FormEvent>,
}

impl FormCommandResult {
    fn saved(form: Form) -> Self {
        Self {
            aggregate_id: form.id(),
            form,
            events: Vec::new(),
        }
    }
}

/// Result of a `GeneratePublicLink` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLinkResult {
    /// The form identifier.
    pub form_id: Uuid,
    /// The code now assigned to the form.
    pub code: PublicCode,
    /// Whether a new code was drawn and saved.
    pub generated: bool,
}

async fn update_form<F>(
    form_id: Uuid,
    repo: &dyn AggregateRepository<Form>,
    apply: F,
) -> Result<FormCommandResult, DomainError>
where
    F: FnOnce(&Form) -> Result<Form, DomainError>,
{
    let form: Form = load_required(repo, form_id).await?;
    let next = apply(&form)?;
    repo.save(&next).await?;
    Ok(FormCommandResult::saved(next))
}

fn title_conflict(title: &FormTitle, campaign_id: Uuid) -> DomainError {
    DomainError::AlreadyExists(format!(
        "form titled \"{title}\" in campaign {campaign_id}"
    ))
}

/// Handles the `CreateForm` command: checks the campaign exists and the
/// title is free within it, then saves a draft form.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown campaign,
/// `DomainError::InvalidArgument` for an invalid title,
/// `DomainError::AlreadyExists` if the campaign already has a form with the
/// same title, or a port error.
#[instrument(skip_all, fields(form_id = %command.form_id, campaign_id = %command.campaign_id))]
pub async fn handle_create_form(
    command: &CreateForm,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    titles: &dyn FormTitleIndex,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_form command");
    if !campaigns.campaign_exists(command.campaign_id).await? {
        return Err(DomainError::not_found("campaign", command.campaign_id));
    }
    let title = FormTitle::of(&command.title)?;
    if titles.title_taken(command.campaign_id, &title, None).await? {
        return Err(title_conflict(&title, command.campaign_id));
    }

    let form = Form::create(
        command.form_id,
        command.campaign_id,
        title,
        command.options.clone(),
        clock,
    );
    repo.save(&form).await?;
    Ok(FormCommandResult::saved(form))
}

/// Handles the `RenameForm` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::InvalidArgument` for an invalid title,
/// `DomainError::AlreadyExists` if another form in the campaign has the
/// title, or a port error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_rename_form(
    command: &RenameForm,
    clock: &dyn Clock,
    titles: &dyn FormTitleIndex,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling rename_form command");
    let form: Form = load_required(repo, command.form_id).await?;
    let title = FormTitle::of(&command.title)?;
    if titles
        .title_taken(form.campaign_id(), &title, Some(form.id()))
        .await?
    {
        return Err(title_conflict(&title, form.campaign_id()));
    }
    let renamed = form.rename(title, clock);
    repo.save(&renamed).await?;
    Ok(FormCommandResult::saved(renamed))
}

/// Handles the `ChangeFormDescription` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_change_form_description(
    command: &ChangeFormDescription,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_description command");
    update_form(command.form_id, repo, |form| {
        Ok(form.change_description(command.description.clone(), clock))
    })
    .await
}

/// Handles the `ChangeTheme` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_change_theme(
    command: &ChangeTheme,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_theme command");
    update_form(command.form_id, repo, |form| {
        Ok(form.change_theme(command.theme.clone(), clock))
    })
    .await
}

/// Handles the `SetAccessMode` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_access_mode(
    command: &SetAccessMode,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_access_mode command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_access_mode(command.access_mode, clock))
    })
    .await
}

/// Handles the `RescheduleForm` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::InvalidArgument` if `close_at` precedes `open_at`, or a
/// port error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_reschedule_form(
    command: &RescheduleForm,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling reschedule_form command");
    let window = AvailabilityWindow::of(command.open_at, command.close_at)?;
    update_form(command.form_id, repo, |form| Ok(form.reschedule(window, clock))).await
}

/// Handles the `SetResponseLimitPolicy` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_limit_policy(
    command: &SetResponseLimitPolicy,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_limit_policy command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_limit_policy(command.policy, clock))
    })
    .await
}

/// Handles the `SetPresentationOptions` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_presentation(
    command: &SetPresentationOptions,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_presentation command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_presentation(command.presentation, clock))
    })
    .await
}

/// Handles the `SetAnonymousMode` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_anonymous(
    command: &SetAnonymousMode,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_anonymous command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_anonymous(command.enabled, clock))
    })
    .await
}

/// Handles the `SetAllowEditBeforeSubmit` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_allow_edit(
    command: &SetAllowEditBeforeSubmit,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_allow_edit command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_allow_edit_before_submit(command.enabled, clock))
    })
    .await
}

/// Handles the `SetAutoSave` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_set_auto_save(
    command: &SetAutoSave,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling set_auto_save command");
    update_form(command.form_id, repo, |form| {
        Ok(form.set_auto_save(command.enabled, clock))
    })
    .await
}

/// Handles the `ChangeFormStatus` command.
///
/// Publishing a form that is not yet published asks `questions` for the
/// form's question count first. A self-transition saves nothing and emits
/// no event.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::PublishWithoutQuestions` when publishing an empty form,
/// `DomainError::InvalidTransition` for an illegal or absent target, or a
/// port error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_change_form_status(
    command: &ChangeFormStatus,
    clock: &dyn Clock,
    questions: &dyn QuestionCounter,
    repo: &dyn AggregateRepository<Form>,
) -> Result<FormCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling change_status command");
    let form: Form = load_required(repo, command.form_id).await?;
    let question_count = if form.publish_needs_questions(command.target) {
        questions.count_by_form(form.id()).await?
    } else {
        0
    };

    let (next, outcome) = form
        .change_status(command.target, question_count, clock)
        .inspect_err(|e| {
            if matches!(e, DomainError::PublishWithoutQuestions(_)) {
                warn!("refusing to publish a form without questions");
            }
        })?;

    let Transition::Changed { from, to } = outcome else {
        debug!(status = %next.status(), "status unchanged");
        return Ok(FormCommandResult::saved(next));
    };

    repo.save(&next).await?;
    let event = FormEvent::status_changed(
        FormStatusChanged {
            form_id: next.id(),
            from,
            to,
            occurred_at: next.updated_at(),
        },
        command.correlation_id,
    );
    Ok(FormCommandResult {
        aggregate_id: next.id(),
        form: next,
        events: vec![event],
    })
}

/// Handles the `GeneratePublicLink` command.
///
/// Without `force`, an existing code is returned as is: nothing is saved
/// and the RNG is not consulted. With `force` a fresh code is always drawn
/// and saved, even if it happens to equal the old one.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::Infrastructure` if the RNG mutex is poisoned, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id, force = command.force))]
pub async fn handle_generate_public_link(
    command: &GeneratePublicLink,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    settings: &PublicLinkSettings,
    repo: &dyn AggregateRepository<Form>,
) -> Result<PublicLinkResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling generate_public_link command");
    let form: Form = load_required(repo, command.form_id).await?;

    // Lock RNG only for the synchronous domain method, never across an await.
    let next = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        form.set_public_code(command.force, &mut *rng_guard, settings, clock)?
    };

    let generated = next != form;
    if generated {
        repo.save(&next).await?;
    } else {
        debug!("keeping existing public code");
    }

    let code = next
        .public_code()
        .cloned()
        .ok_or_else(|| DomainError::Infrastructure("public code missing after generation".into()))?;
    Ok(PublicLinkResult {
        form_id: next.id(),
        code,
        generated,
    })
}

/// Handles the `DeleteForm` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id))]
pub async fn handle_delete_form(
    command: &DeleteForm,
    repo: &dyn AggregateRepository<Form>,
) -> Result<(), DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete_form command");
    let form: Form = load_required(repo, command.form_id).await?;
    repo.delete(form.id()).await
}
