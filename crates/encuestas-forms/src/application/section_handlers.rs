//! Command handlers for sections.
//!
//! Reorders work on a snapshot of the form's sections; only the sections
//! whose position changed are written back.

use encuestas_core::error::DomainError;
use encuestas_core::position::{
    changed_positions, move_to, next_position, remove, requested_position,
};
use encuestas_core::repository::{AggregateRepository, ChildRepository, load_required};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Form;
use crate::domain::commands::{AddSection, DeleteSection, MoveSection, RenameSection};
use crate::domain::sections::Section;

/// Result of a successfully handled section command.
#[derive(Debug)]
pub struct SectionCommandResult {
    /// The section affected by the command.
    pub aggregate_id: Uuid,
    /// The section after the command.
    pub section: Section,
    /// Sections whose position changed and were saved, in position order.
    pub repositioned: Vec<Section>,
}

async fn load_owned(
    form_id: Uuid,
    section_id: Uuid,
    sections: &dyn ChildRepository<Section>,
) -> Result<Section, DomainError> {
    let section: Section = load_required(sections, section_id).await?;
    if section.form_id() != form_id {
        return Err(DomainError::OwnershipMismatch {
            child_id: section_id,
            parent_id: form_id,
        });
    }
    Ok(section)
}

/// Handles the `AddSection` command: appends a section at the end of the
/// form.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the form does not exist,
/// `DomainError::InvalidArgument` for a title that is too long, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id, section_id = %command.section_id))]
pub async fn handle_add_section(
    command: &AddSection,
    forms: &dyn AggregateRepository<Form>,
    sections: &dyn ChildRepository<Section>,
) -> Result<SectionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling add_section command");
    let form: Form = load_required(forms, command.form_id).await?;
    let siblings = sections.list_by_parent(form.id()).await?;
    let section = Section::new(
        command.section_id,
        form.id(),
        command.title.clone(),
        next_position(&siblings),
    )?;
    sections.save(&section).await?;
    Ok(SectionCommandResult {
        aggregate_id: section.id(),
        section,
        repositioned: Vec::new(),
    })
}

/// Handles the `RenameSection` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the section does not exist,
/// `DomainError::OwnershipMismatch` if it belongs to another form,
/// `DomainError::InvalidArgument` for a title that is too long, or a port
/// error.
#[instrument(skip_all, fields(form_id = %command.form_id, section_id = %command.section_id))]
pub async fn handle_rename_section(
    command: &RenameSection,
    sections: &dyn ChildRepository<Section>,
) -> Result<SectionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling rename_section command");
    let section = load_owned(command.form_id, command.section_id, sections).await?;
    let renamed = section.rename(command.title.clone())?;
    sections.save(&renamed).await?;
    Ok(SectionCommandResult {
        aggregate_id: renamed.id(),
        section: renamed,
        repositioned: Vec::new(),
    })
}

/// Handles the `MoveSection` command.
///
/// A position past the end moves the section to the last slot.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a negative position,
/// `DomainError::NotFound` if the section does not exist,
/// `DomainError::OwnershipMismatch` if it belongs to another form, or a
/// port error.
#[instrument(skip_all, fields(form_id = %command.form_id, section_id = %command.section_id))]
pub async fn handle_move_section(
    command: &MoveSection,
    sections: &dyn ChildRepository<Section>,
) -> Result<SectionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling move_section command");
    let position = requested_position(command.new_position)?;
    let section = load_owned(command.form_id, command.section_id, sections).await?;
    let siblings = sections.list_by_parent(command.form_id).await?;

    let reordered = move_to(command.form_id, &siblings, section.id(), position)?;
    let repositioned = changed_positions(&siblings, &reordered);
    if repositioned.is_empty() {
        debug!("section already in place");
    } else {
        sections.save_all(&repositioned).await?;
    }

    let moved = reordered
        .into_iter()
        .find(|s| s.id() == section.id())
        .unwrap_or(section);
    Ok(SectionCommandResult {
        aggregate_id: moved.id(),
        section: moved,
        repositioned,
    })
}

/// Handles the `DeleteSection` command: removes the section and closes the
/// gap in the form's positions.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the section does not exist,
/// `DomainError::OwnershipMismatch` if it belongs to another form, or a
/// port error.
#[instrument(skip_all, fields(form_id = %command.form_id, section_id = %command.section_id))]
pub async fn handle_delete_section(
    command: &DeleteSection,
    sections: &dyn ChildRepository<Section>,
) -> Result<SectionCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling delete_section command");
    load_owned(command.form_id, command.section_id, sections).await?;
    let siblings = sections.list_by_parent(command.form_id).await?;

    let (removed, rest) = remove(&siblings, command.section_id)?;
    sections.delete(removed.id()).await?;
    let repositioned = changed_positions(&siblings, &rest);
    if !repositioned.is_empty() {
        sections.save_all(&repositioned).await?;
    }
    Ok(SectionCommandResult {
        aggregate_id: removed.id(),
        section: removed,
        repositioned,
    })
}
