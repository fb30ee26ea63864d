//! Input validation errors.
//!
//! These are raised before any request is sent, so a failed validation never
//! reaches the backend.

use rust_decimal::Decimal;
use thiserror::Error;

/// A form-level validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or whitespace.
    #[error("{field} is required")]
    Required {
        /// Name of the missing field.
        field: &'static str,
    },

    /// An amount had to be strictly positive.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveAmount {
        /// Name of the amount field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A file to upload does not exist or is not a regular file.
    #[error("file not found: {path}")]
    MissingFile {
        /// Path as given by the caller.
        path: String,
    },
}

/// Return the trimmed value, or a [`ValidationError::Required`] when blank.
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}

/// Reject zero and negative amounts.
pub fn require_positive(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        Err(ValidationError::NonPositiveAmount { field, value })
    } else {
        Ok(value)
    }
}
