//! Aggregate roots for the Form Authoring context.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use encuestas_core::aggregate::Aggregate;
use encuestas_core::clock::Clock;
use encuestas_core::error::DomainError;
use encuestas_core::rng::DeterministicRng;
use encuestas_core::status::{self, Lifecycle, Transition};
use encuestas_core::text::normalize_optional;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::public_link::{PublicLinkSettings, generate_code};
use super::value_objects::{
    AccessMode, AvailabilityWindow, FormTitle, PresentationOptions, PublicCode,
    ResponseLimitPolicy, Theme,
};

/// Lifecycle status of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    /// Being authored.
    Draft,
    /// Open to respondents.
    Published,
    /// No longer accepting responses.
    Closed,
    /// Retired. Terminal.
    Archived,
}

impl Lifecycle for FormStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Published, Self::Archived],
            Self::Published => &[Self::Closed, Self::Archived],
            Self::Closed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "closed" => Ok(Self::Closed),
            "archived" => Ok(Self::Archived),
            other => Err(DomainError::invalid(format!("unknown form status: {other}"))),
        }
    }
}

/// Optional settings supplied when a form is created. `Default` gives the
/// light theme, public access, no window, no response limit and every flag
/// off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormOptions {
    /// Free-text description.
    pub description: Option<String>,
    /// Cover image URL.
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
}

/// A questionnaire belonging to a campaign.
///
/// Every mutator returns a new snapshot; `updated_at` advances on every
/// change except status no-ops and keeping an existing public code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Form {
    id: Uuid,
    campaign_id: Uuid,
    title: FormTitle,
    description: Option<String>,
    cover_url: Option<String>,
    theme: Theme,
    access_mode: AccessMode,
    window: AvailabilityWindow,
    limit_policy: ResponseLimitPolicy,
    anonymous_mode: bool,
    allow_edit_before_submit: bool,
    auto_save: bool,
    presentation: PresentationOptions,
    status: FormStatus,
    public_code: Option<PublicCode>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Aggregate for Form {
    const KIND: &'static str = "form";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Form {
    /// Creates a new draft form without a public code.
    #[must_use]
    pub fn create(
        id: Uuid,
        campaign_id: Uuid,
        title: FormTitle,
        options: FormOptions,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id,
            campaign_id,
            title,
            description: normalize_optional(options.description),
            cover_url: normalize_optional(options.cover_url),
            theme: options.theme,
            access_mode: options.access_mode,
            window: options.window,
            limit_policy: options.limit_policy,
            anonymous_mode: options.anonymous_mode,
            allow_edit_before_submit: options.allow_edit_before_submit,
            auto_save: options.auto_save,
            presentation: options.presentation,
            status: FormStatus::Draft,
            public_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The form identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The owning campaign.
    #[must_use]
    pub fn campaign_id(&self) -> Uuid {
        self.campaign_id
    }

    /// The form title.
    #[must_use]
    pub fn title(&self) -> &FormTitle {
        &self.title
    }

    /// The optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The optional cover image URL.
    #[must_use]
    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    /// The visual theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Who may open the form.
    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// When the form accepts responses.
    #[must_use]
    pub fn window(&self) -> AvailabilityWindow {
        self.window
    }

    /// Responses allowed per respondent.
    #[must_use]
    pub fn limit_policy(&self) -> ResponseLimitPolicy {
        self.limit_policy
    }

    /// Whether respondent identity is hidden.
    #[must_use]
    pub fn anonymous_mode(&self) -> bool {
        self.anonymous_mode
    }

    /// Whether respondents may edit before submitting.
    #[must_use]
    pub fn allow_edit_before_submit(&self) -> bool {
        self.allow_edit_before_submit
    }

    /// Whether answers are saved as the respondent types.
    #[must_use]
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Layout options.
    #[must_use]
    pub fn presentation(&self) -> PresentationOptions {
        self.presentation
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// The public link code, once generated.
    #[must_use]
    pub fn public_code(&self) -> Option<&PublicCode> {
        self.public_code.as_ref()
    }

    /// When the form was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the form last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touched(&self, clock: &dyn Clock) -> Self {
        Self {
            updated_at: clock.now(),
            ..self.clone()
        }
    }

    /// Returns a snapshot with a new title.
    #[must_use]
    pub fn rename(&self, title: FormTitle, clock: &dyn Clock) -> Self {
        Self {
            title,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with the description replaced. Blank clears it.
    #[must_use]
    pub fn change_description(&self, description: Option<String>, clock: &dyn Clock) -> Self {
        Self {
            description: normalize_optional(description),
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with a new theme.
    #[must_use]
    pub fn change_theme(&self, theme: Theme, clock: &dyn Clock) -> Self {
        Self {
            theme,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with a new access mode.
    #[must_use]
    pub fn set_access_mode(&self, access_mode: AccessMode, clock: &dyn Clock) -> Self {
        Self {
            access_mode,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with a new availability window.
    #[must_use]
    pub fn reschedule(&self, window: AvailabilityWindow, clock: &dyn Clock) -> Self {
        Self {
            window,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with a new response limit.
    #[must_use]
    pub fn set_limit_policy(&self, limit_policy: ResponseLimitPolicy, clock: &dyn Clock) -> Self {
        Self {
            limit_policy,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with new layout options.
    #[must_use]
    pub fn set_presentation(&self, presentation: PresentationOptions, clock: &dyn Clock) -> Self {
        Self {
            presentation,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with anonymous mode switched.
    #[must_use]
    pub fn set_anonymous(&self, anonymous_mode: bool, clock: &dyn Clock) -> Self {
        Self {
            anonymous_mode,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with edit-before-submit switched.
    #[must_use]
    pub fn set_allow_edit_before_submit(&self, allow: bool, clock: &dyn Clock) -> Self {
        Self {
            allow_edit_before_submit: allow,
            ..self.touched(clock)
        }
    }

    /// Returns a snapshot with auto-save switched.
    #[must_use]
    pub fn set_auto_save(&self, auto_save: bool, clock: &dyn Clock) -> Self {
        Self {
            auto_save,
            ..self.touched(clock)
        }
    }

    /// Whether moving to `target` needs the form's question count: only a
    /// legal transition into `Published` does.
    #[must_use]
    pub fn publish_needs_questions(&self, target: Option<FormStatus>) -> bool {
        target == Some(FormStatus::Published)
            && status::is_allowed(self.status, FormStatus::Published)
    }

    /// Moves the form to `target`.
    ///
    /// Legality is checked first; `question_count` is only consulted for a
    /// legal transition into `Published`. A self-transition returns an
    /// identical snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the target is absent or
    /// not reachable from the current status, and
    /// `DomainError::PublishWithoutQuestions` when publishing a form with no
    /// questions.
    pub fn change_status(
        &self,
        target: Option<FormStatus>,
        question_count: u64,
        clock: &dyn Clock,
    ) -> Result<(Self, Transition<FormStatus>), DomainError> {
        let outcome = status::transition_to(self.status, target)?;
        let next = match outcome {
            Transition::Unchanged(_) => self.clone(),
            Transition::Changed {
                to: FormStatus::Published,
                ..
            } if question_count == 0 => {
                return Err(DomainError::PublishWithoutQuestions(self.id));
            }
            Transition::Changed { to, .. } => Self {
                status: to,
                ..self.touched(clock)
            },
        };
        Ok((next, outcome))
    }

    /// Assigns a public link code.
    ///
    /// With an existing code and `force == false` this returns an identical
    /// snapshot and never touches `rng`. Otherwise a fresh code is drawn and
    /// `updated_at` advances.
    ///
    /// # Errors
    ///
    /// Propagates a failure to build the drawn code.
    pub fn set_public_code(
        &self,
        force: bool,
        rng: &mut dyn DeterministicRng,
        settings: &PublicLinkSettings,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if self.public_code.is_some() && !force {
            return Ok(self.clone());
        }
        let code = generate_code(rng, settings)?;
        Ok(Self {
            public_code: Some(code),
            ..self.touched(clock)
        })
    }
}
