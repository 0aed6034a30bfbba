//! Value objects for the Form Authoring context.
//!
//! Every constructor validates its input, and deserialisation goes through
//! the same constructors, so a value of one of these types is always valid.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use encuestas_core::error::DomainError;
use encuestas_core::text::required_text;
use serde::{Deserialize, Serialize};

/// Maximum form title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum theme primary colour length, in characters.
pub const MAX_PRIMARY_COLOR_CHARS: usize = 20;

/// Primary colour of the default theme.
pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

/// A trimmed, non-blank form title of at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormTitle(String);

impl FormTitle {
    /// Validates and normalises a title.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the title is blank or too
    /// long.
    pub fn of(value: &str) -> Result<Self, DomainError> {
        required_text("form title", value, MAX_TITLE_CHARS).map(Self)
    }

    /// The normalised title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FormTitle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<FormTitle> for String {
    fn from(title: FormTitle) -> Self {
        title.0
    }
}

impl fmt::Display for FormTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Light or dark rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl FromStr for ThemeMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(DomainError::invalid(format!("unknown theme mode: {other}"))),
        }
    }
}

#[derive(Deserialize)]
struct RawTheme {
    mode: ThemeMode,
    primary_color: Option<String>,
}

/// Visual theme of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTheme")]
pub struct Theme {
    mode: ThemeMode,
    primary_color: Option<String>,
}

impl Theme {
    /// Validates a theme. A blank colour is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the colour is longer than
    /// 20 characters.
    pub fn of(mode: ThemeMode, primary_color: Option<String>) -> Result<Self, DomainError> {
        let primary_color = encuestas_core::text::normalize_optional(primary_color);
        if let Some(color) = &primary_color {
            if color.chars().count() > MAX_PRIMARY_COLOR_CHARS {
                return Err(DomainError::invalid(format!(
                    "primary color exceeds {MAX_PRIMARY_COLOR_CHARS} characters"
                )));
            }
        }
        Ok(Self {
            mode,
            primary_color,
        })
    }

    /// Rendering mode.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Primary colour, if any.
    #[must_use]
    pub fn primary_color(&self) -> Option<&str> {
        self.primary_color.as_deref()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            primary_color: Some(DEFAULT_PRIMARY_COLOR.to_owned()),
        }
    }
}

impl TryFrom<RawTheme> for Theme {
    type Error = DomainError;

    fn try_from(raw: RawTheme) -> Result<Self, Self::Error> {
        Self::of(raw.mode, raw.primary_color)
    }
}

/// Who may open a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessMode {
    /// Anyone with the link.
    #[default]
    Public,
    /// Invited respondents only.
    Private,
}

impl FromStr for AccessMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            other => Err(DomainError::invalid(format!("unknown access mode: {other}"))),
        }
    }
}

#[derive(Deserialize)]
struct RawWindow {
    open_at: Option<DateTime<Utc>>,
    close_at: Option<DateTime<Utc>>,
}

/// Optional period during which a form accepts responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct AvailabilityWindow {
    open_at: Option<DateTime<Utc>>,
    close_at: Option<DateTime<Utc>>,
}

impl AvailabilityWindow {
    /// Validates a window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `close_at` is before
    /// `open_at`.
    pub fn of(
        open_at: Option<DateTime<Utc>>,
        close_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if let (Some(open), Some(close)) = (open_at, close_at) {
            if close < open {
                return Err(DomainError::invalid(format!(
                    "close_at {close} is before open_at {open}"
                )));
            }
        }
        Ok(Self { open_at, close_at })
    }

    /// Opening instant, if bounded.
    #[must_use]
    pub fn open_at(&self) -> Option<DateTime<Utc>> {
        self.open_at
    }

    /// Closing instant, if bounded.
    #[must_use]
    pub fn close_at(&self) -> Option<DateTime<Utc>> {
        self.close_at
    }

    /// Whether `instant` falls inside the window. Both ends are inclusive.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.open_at.is_none_or(|open| instant >= open)
            && self.close_at.is_none_or(|close| instant <= close)
    }
}

impl TryFrom<RawWindow> for AvailabilityWindow {
    type Error = DomainError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::of(raw.open_at, raw.close_at)
    }
}

/// How many responses one respondent may submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLimitPolicy", into = "RawLimitPolicy")]
pub enum ResponseLimitPolicy {
    /// No limit.
    #[default]
    Unlimited,
    /// A single response per respondent.
    OnePerUser,
    /// At most `n` responses per respondent.
    LimitedN(NonZeroU32),
}

impl ResponseLimitPolicy {
    /// Builds a `LIMITED_N` policy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `n` is zero.
    pub fn limited(n: u32) -> Result<Self, DomainError> {
        NonZeroU32::new(n)
            .map(Self::LimitedN)
            .ok_or_else(|| DomainError::invalid("LIMITED_N requires n >= 1"))
    }

    /// Parses a mode name plus optional count, as submitted by clients.
    ///
    /// `n` is only accepted with `LIMITED_N`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for an unknown mode, a missing
    /// or zero count on `LIMITED_N`, or a count on any other mode.
    pub fn parse(mode: &str, n: Option<u32>) -> Result<Self, DomainError> {
        let policy = match mode.trim().to_ascii_uppercase().as_str() {
            "UNLIMITED" => Self::Unlimited,
            "ONE_PER_USER" => Self::OnePerUser,
            "LIMITED_N" => {
                let n = n.ok_or_else(|| DomainError::invalid("LIMITED_N requires n"))?;
                return Self::limited(n);
            }
            other => {
                return Err(DomainError::invalid(format!(
                    "unknown response limit mode: {other}"
                )));
            }
        };
        if n.is_some() {
            return Err(DomainError::invalid("n only applies to LIMITED_N"));
        }
        Ok(policy)
    }

    /// Stable mode name.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Unlimited => "UNLIMITED",
            Self::OnePerUser => "ONE_PER_USER",
            Self::LimitedN(_) => "LIMITED_N",
        }
    }

    /// Maximum responses per respondent, if bounded.
    #[must_use]
    pub fn max_responses_per_user(&self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::OnePerUser => Some(1),
            Self::LimitedN(n) => Some(n.get()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawLimitPolicy {
    mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
}

impl TryFrom<RawLimitPolicy> for ResponseLimitPolicy {
    type Error = DomainError;

    fn try_from(raw: RawLimitPolicy) -> Result<Self, Self::Error> {
        Self::parse(&raw.mode, raw.n)
    }
}

impl From<ResponseLimitPolicy> for RawLimitPolicy {
    fn from(policy: ResponseLimitPolicy) -> Self {
        let n = match policy {
            ResponseLimitPolicy::LimitedN(n) => Some(n.get()),
            _ => None,
        };
        Self {
            mode: policy.mode().to_owned(),
            n,
        }
    }
}

/// How a form is laid out for respondents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PresentationOptions {
    /// Randomise question order.
    pub shuffle_questions: bool,
    /// Randomise option order inside questions.
    pub shuffle_options: bool,
    /// Show a progress bar.
    pub progress_bar: bool,
    /// One section per page.
    pub paginated: bool,
}

/// Characters a public code is drawn from.
pub const PUBLIC_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque slug identifying a form in its public link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicCode(String);

impl PublicCode {
    /// Validates a code: non-empty, lowercase ASCII letters and digits only.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` otherwise.
    pub fn of(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() || !value.bytes().all(|b| PUBLIC_CODE_ALPHABET.contains(&b)) {
            return Err(DomainError::invalid(format!("malformed public code: {value:?}")));
        }
        Ok(Self(value.to_owned()))
    }

    /// The code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PublicCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<PublicCode> for String {
    fn from(code: PublicCode) -> Self {
        code.0
    }
}

impl fmt::Display for PublicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use encuestas_test_support::fixed_now;

    use super::*;

    #[test]
    fn test_title_trims_and_bounds_length() {
        assert_eq!(FormTitle::of("  Intro  ").unwrap().as_str(), "Intro");
        assert!(FormTitle::of("").is_err());
        assert!(FormTitle::of(&"t".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_default_theme_is_light_blue() {
        let theme = Theme::default();
        assert_eq!(theme.mode(), ThemeMode::Light);
        assert_eq!(theme.primary_color(), Some(DEFAULT_PRIMARY_COLOR));
    }

    #[test]
    fn test_theme_rejects_long_color_and_unknown_mode() {
        assert!(Theme::of(ThemeMode::Dark, Some("#".repeat(21))).is_err());
        assert!(Theme::of(ThemeMode::Dark, Some("#".repeat(20))).is_ok());
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert!(serde_json::from_str::<Theme>(r#"{"mode":"sepia","primary_color":null}"#).is_err());
    }

    #[test]
    fn test_window_requires_close_after_open() {
        let open = fixed_now();
        assert!(AvailabilityWindow::of(Some(open), Some(open)).is_ok());
        assert!(AvailabilityWindow::of(Some(open), None).is_ok());
        assert!(matches!(
            AvailabilityWindow::of(Some(open), Some(open - Duration::seconds(1))),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let open = fixed_now();
        let close = open + Duration::days(1);
        let window = AvailabilityWindow::of(Some(open), Some(close)).unwrap();
        assert!(window.contains(open));
        assert!(window.contains(close));
        assert!(!window.contains(close + Duration::seconds(1)));
        assert!(AvailabilityWindow::default().contains(open));
    }

    #[test]
    fn test_limit_policy_parse() {
        assert_eq!(
            ResponseLimitPolicy::parse("limited_n", Some(3)).unwrap(),
            ResponseLimitPolicy::limited(3).unwrap()
        );
        assert_eq!(
            ResponseLimitPolicy::limited(3).unwrap().max_responses_per_user(),
            Some(3)
        );
        assert!(ResponseLimitPolicy::parse("LIMITED_N", Some(0)).is_err());
        assert!(ResponseLimitPolicy::parse("LIMITED_N", None).is_err());
        assert!(ResponseLimitPolicy::parse("UNLIMITED", Some(2)).is_err());
        assert!(ResponseLimitPolicy::parse("SOMETIMES", None).is_err());
        assert_eq!(ResponseLimitPolicy::OnePerUser.max_responses_per_user(), Some(1));
    }

    #[test]
    fn test_limit_policy_serde_rejects_zero() {
        let json = serde_json::to_string(&ResponseLimitPolicy::limited(2).unwrap()).unwrap();
        assert_eq!(json, r#"{"mode":"LIMITED_N","n":2}"#);
        let zero = r#"{"mode":"LIMITED_N","n":0}"#;
        assert!(serde_json::from_str::<ResponseLimitPolicy>(zero).is_err());
    }

    #[test]
    fn test_limited_policy_rejects_zero_count() {
        assert!(matches!(
            ResponseLimitPolicy::limited(0),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_access_mode_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AccessMode::Private).unwrap(), "\"PRIVATE\"");
        assert_eq!("public".parse::<AccessMode>().unwrap(), AccessMode::Public);
    }

    #[test]
    fn test_public_code_accepts_only_slug_alphabet() {
        assert!(PublicCode::of("abc123xyz0").is_ok());
        assert!(PublicCode::of("ABC").is_err());
        assert!(PublicCode::of("a-b").is_err());
        assert!(PublicCode::of("").is_err());
    }
}
