//! Field normalization and presence checks shared by the orchestrators.
//!
//! Every normalizer is idempotent: feeding its output back in returns the
//! same value.

use crate::errors::ServiceError;

pub fn text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Currency codes are stored trimmed and upper-case (`" usd "` -> `"USD"`).
pub fn currency(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Category aliases are stored trimmed and lower-case.
pub fn alias(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Blank-after-trim is treated as missing.
pub fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn require_positive(field: &str, id: i64) -> Result<(), ServiceError> {
    if id <= 0 {
        return Err(ServiceError::validation(format!("invalid {}", field)));
    }
    Ok(())
}

pub fn require_non_zero(field: &str, value: i64) -> Result<(), ServiceError> {
    if value == 0 {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// `Some` only when the value has non-whitespace content.
pub fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
