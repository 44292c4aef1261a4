//! Field validation shared by the services
//!
//! Lengths are counted in characters, matching the VARCHAR limits in the
//! schema.

use crate::error::AppError;

/// Require a non-blank value of at most `max` characters
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be blank", field)));
    }
    limit_text(field, value, max)
}

/// Require at most `max` characters; empty is allowed
pub fn limit_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Like [`limit_text`] for optional fields
pub fn limit_optional(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(value) => limit_text(field, value, max),
        None => Ok(()),
    }
}
