//! Per-field validation rules.
//!
//! Responsibilities:
//! - Define the closed set of rules a field can carry.
//! - Report rule violations as typed errors.
//!
//! Does NOT handle:
//! - Deciding which fields are validated (enablement lives in `control`).
//! - Aggregate validity reporting to the host form.

use thiserror::Error;

use crate::value::FieldValue;

/// A violation of a single field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is required but holds no value.
    #[error("value is required")]
    Required,
    /// Free text starts or ends with whitespace.
    #[error("value has leading or trailing whitespace")]
    LeadTrailWhitespace,
}

/// A validation rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// The field must hold a non-empty value.
    Required,
    /// Free text must not start or end with whitespace. Empty text passes;
    /// combine with [`Validator::Required`] when a value must be present.
    NoLeadTrailSpaces,
}

impl Validator {
    /// Checks a buffered value against this rule.
    pub fn check(&self, value: &FieldValue) -> Result<(), FieldError> {
        match self {
            Self::Required => {
                if value.is_empty() {
                    Err(FieldError::Required)
                } else {
                    Ok(())
                }
            }
            Self::NoLeadTrailSpaces => match value.as_str() {
                Some(s) if has_lead_trail_whitespace(s) => Err(FieldError::LeadTrailWhitespace),
                _ => Ok(()),
            },
        }
    }
}

/// Whether a string starts or ends with whitespace.
pub fn has_lead_trail_whitespace(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}
