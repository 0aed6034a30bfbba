//! Text normalisation shared by value objects.

use crate::error::DomainError;

/// Trims `value`; blank or absent input becomes `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Trims `value` and checks it is non-blank and at most `max_chars` long.
///
/// `field` names the value in error messages.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` if the trimmed value is empty or
/// longer than `max_chars` characters.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::invalid(format!(
            "{field} exceeds {max_chars} characters"
        )));
    }
    Ok(trimmed.to_owned())
}
