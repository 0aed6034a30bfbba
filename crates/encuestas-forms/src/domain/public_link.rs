//! Public link codes and their configuration.

use encuestas_core::error::DomainError;
use encuestas_core::rng::DeterministicRng;

use super::value_objects::{PUBLIC_CODE_ALPHABET, PublicCode};

/// Environment variable overriding the generated code length.
pub const PUBLIC_CODE_LENGTH_VAR: &str = "ENCUESTAS_PUBLIC_CODE_LENGTH";

/// Code length used when nothing is configured.
pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Shortest configurable code.
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest configurable code.
pub const MAX_CODE_LENGTH: usize = 64;

/// Settings for public link generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicLinkSettings {
    code_length: usize,
}

impl Default for PublicLinkSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl PublicLinkSettings {
    /// Settings producing codes of `code_length` characters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the length is outside
    /// `4..=64`.
    pub fn new(code_length: usize) -> Result<Self, DomainError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(DomainError::invalid(format!(
                "{PUBLIC_CODE_LENGTH_VAR} must be between {MIN_CODE_LENGTH} and \
                 {MAX_CODE_LENGTH}, got {code_length}"
            )));
        }
        Ok(Self { code_length })
    }

    /// Reads settings from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the variable is set but is
    /// not a valid length.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_value(std::env::var(PUBLIC_CODE_LENGTH_VAR).ok().as_deref())
    }

    /// Builds settings from the raw value of [`PUBLIC_CODE_LENGTH_VAR`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `raw` is not a number in
    /// `4..=64`.
    pub fn from_value(raw: Option<&str>) -> Result<Self, DomainError> {
        let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::default());
        };
        let code_length = raw.parse::<usize>().map_err(|e| {
            DomainError::invalid(format!("{PUBLIC_CODE_LENGTH_VAR} must be a number: {e}"))
        })?;
        Self::new(code_length)
    }

    /// Length of generated codes.
    #[must_use]
    pub fn code_length(&self) -> usize {
        self.code_length
    }
}

/// Draws a fresh code of `settings.code_length()` characters from `rng`.
///
/// # Errors
///
/// Never fails for codes drawn from the alphabet; the `Result` comes from
/// the [`PublicCode`] constructor.
pub fn generate_code(
    rng: &mut dyn DeterministicRng,
    settings: &PublicLinkSettings,
) -> Result<PublicCode, DomainError> {
    let last = u32::try_from(PUBLIC_CODE_ALPHABET.len() - 1).unwrap_or(u32::MAX);
    let code: String = (0..settings.code_length())
        .map(|_| {
            let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
            char::from(PUBLIC_CODE_ALPHABET[index.min(PUBLIC_CODE_ALPHABET.len() - 1)])
        })
        .collect();
    PublicCode::of(&code)
}
