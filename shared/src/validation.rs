//! Validation utilities for the Stockroom inventory service
//!
//! Raw form values arrive as optional strings. The helpers here trim and parse
//! them, and [`check`] runs the `validator` rules declared on each typed draft.
//! Every failure is reported as a [`ValidationError`] naming the offending field.

use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// A rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the alphabetically first field so the outcome is deterministic.
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                ValidationError::new(*field, message)
            }
            None => ValidationError::new("input", "Invalid input"),
        }
    }
}

/// Run the declared rules of a draft, handing it back when they all pass
pub fn check<T: Validate>(draft: T) -> Result<T, ValidationError> {
    draft.validate()?;
    Ok(draft)
}

// ============================================================================
// Field Parsing
// ============================================================================

/// Trimmed text; absent input becomes an empty string
pub fn trimmed(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Trimmed text, falling back to `default` when absent or blank
pub fn text_or(raw: Option<String>, default: &str) -> String {
    let value = trimmed(raw);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Trimmed free text; absent or blank input becomes `None`
pub fn optional_text(raw: Option<String>) -> Option<String> {
    let value = trimmed(raw);
    (!value.is_empty()).then_some(value)
}

/// Parse an integer field, using `default` when absent or blank
pub fn parse_int_or(field: &str, raw: Option<&str>, default: i32) -> Result<i32, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<i32>()
            .map_err(|_| ValidationError::new(field, format!("{} must be a whole number", field))),
    }
}

/// Largest magnitude a single quantity may have
///
/// Mirrored by the `stock_movements_qty_bounded` CHECK in the migrations so
/// per-item sums stay finite in both stores.
pub const MAX_QUANTITY: f64 = 1_000_000_000.0;

/// Parse a required, finite quantity within [`MAX_QUANTITY`]
pub fn parse_quantity(field: &str, raw: Option<&str>) -> Result<f64, ValidationError> {
    let value = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::new(field, format!("{} is required", field)))?;

    let qty = value
        .parse::<f64>()
        .ok()
        .filter(|qty| qty.is_finite())
        .ok_or_else(|| ValidationError::new(field, format!("{} must be a number", field)))?;

    if qty.abs() > MAX_QUANTITY {
        return Err(ValidationError::new(
            field,
            format!("{} must be between -{} and {}", field, MAX_QUANTITY, MAX_QUANTITY),
        ));
    }
    Ok(qty)
}

/// Parse a required identifier
pub fn parse_id(field: &str, raw: Option<&str>) -> Result<Uuid, ValidationError> {
    parse_optional_id(field, raw)?
        .ok_or_else(|| ValidationError::new(field, format!("{} is required", field)))
}

/// Parse an optional identifier; blank input means "no reference"
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| ValidationError::new(field, format!("{} is not a valid identifier", field))),
    }
}
