//! Per-field buffer state inside a composite control.

use crate::validators::{FieldError, Validator};
use crate::value::FieldValue;

/// The transient edit state of one named field.
///
/// A field keeps its buffered value even while disabled; enablement only
/// decides whether the buffer participates in validation and in the value
/// propagated to the host form.
#[derive(Debug, Clone)]
pub struct FieldState {
    /// The current edit buffer.
    pub(crate) value: FieldValue,
    /// The value the buffer resets to when the host writes a value that
    /// omits this field. Also fixes the field's kind (text vs. flag).
    pub(crate) reset: FieldValue,
    /// Whether the field is part of the active set.
    pub(crate) enabled: bool,
    /// Rules checked while the field is enabled.
    pub(crate) validators: Vec<Validator>,
}

impl FieldState {
    pub(crate) fn new(reset: FieldValue, validators: Vec<Validator>) -> Self {
        Self {
            value: reset.clone(),
            reset,
            enabled: true,
            validators,
        }
    }

    /// Resets the buffer to an externally supplied value, or to the field's
    /// reset value when the external mapping omits it.
    pub(crate) fn reset_to(&mut self, value: Option<&FieldValue>) {
        self.value = value.cloned().unwrap_or_else(|| self.reset.clone());
    }

    /// Rule violations for the current buffer.
    pub(crate) fn errors(&self) -> Vec<FieldError> {
        self.validators
            .iter()
            .filter_map(|v| v.check(&self.value).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_to_falls_back_to_reset_value() {
        let mut field = FieldState::new(FieldValue::from(""), vec![Validator::Required]);
        field.value = FieldValue::from("edited");

        field.reset_to(None);
        assert_eq!(field.value, FieldValue::from(""));

        field.reset_to(Some(&FieldValue::from("supplied")));
        assert_eq!(field.value, FieldValue::from("supplied"));
    }

    #[test]
    fn test_errors_reports_all_violations() {
        let mut field = FieldState::new(
            FieldValue::from(""),
            vec![Validator::Required, Validator::NoLeadTrailSpaces],
        );
        assert_eq!(field.errors(), vec![FieldError::Required]);

        field.value = FieldValue::from(" x ");
        assert_eq!(field.errors(), vec![FieldError::LeadTrailWhitespace]);

        field.value = FieldValue::from("x");
        assert!(field.errors().is_empty());
    }
}
