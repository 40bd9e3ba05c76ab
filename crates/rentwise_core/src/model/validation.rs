//! Field validation errors raised before any write reaches storage.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankField(&'static str),
    /// Required field was explicitly cleared by a patch.
    MissingField(&'static str),
    /// Rent must be a finite number greater than zero.
    InvalidRent,
    /// Value does not match any known label for an enumerated field.
    UnknownLabel { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::MissingField(field) => write!(f, "`{field}` is required and cannot be cleared"),
            Self::InvalidRent => write!(f, "`rent` must be a positive number"),
            Self::UnknownLabel { field, value } => {
                write!(f, "`{value}` is not a valid value for `{field}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_positive_rent(rent: f64) -> Result<(), ValidationError> {
    if !rent.is_finite() || rent <= 0.0 {
        return Err(ValidationError::InvalidRent);
    }
    Ok(())
}
