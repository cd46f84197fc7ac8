//! Composite form-control engine.
//!
//! Responsibilities:
//! - Hold a named set of field buffers on behalf of a host form.
//! - Normalize externally written values (empty mapping for `None`, default
//!   discriminant when it is missing).
//! - Recompute which fields are active whenever the discriminant changes.
//! - Report aggregate validity over the active fields only.
//!
//! Does NOT handle:
//! - Rendering or input routing (owned by the hosting UI).
//! - Concrete field sets (see `security` for the broker security control).
//!
//! Invariants:
//! - The discriminant field always holds a non-empty tag; external values
//!   that omit it get the configured default substituted first.
//! - Enablement changes are silent: they never fire the change callback on
//!   their own. One consolidated notification per genuine edit.
//! - A discriminant-change handler finishes its enablement recomputation
//!   before the notification derived from the same edit is emitted, so
//!   consumers never observe a value snapshot with a stale enablement set.
//! - Disabled fields keep their buffers but are excluded from validation
//!   and from the propagated value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::field::FieldState;
use crate::validators::{FieldError, Validator};
use crate::value::{CompositeValue, FieldValue};

/// Aggregate validation failure.
///
/// The host form only learns pass/fail; per-field detail stays available
/// through [`CompositeControl::field_errors`] for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("composite form is invalid")]
pub struct CompositeInvalid;

/// Configuration of the optional extended sub-mode field.
///
/// When the discriminant enters `activating_tag` and the sub-mode field
/// holds no value, the field is seeded with `default_tag` before it is
/// enabled.
#[derive(Debug, Clone)]
pub struct SubModeOptions {
    pub field: String,
    pub default_tag: String,
    pub activating_tag: String,
}

/// Construction-time options for a composite control.
#[derive(Debug, Clone)]
struct CompositeOptions {
    /// Name of the field whose tag selects the active field subset.
    discriminant: String,
    /// Tag substituted when an external value omits the discriminant.
    default_tag: String,
    /// Discriminant tag to the set of field names active under it. The
    /// discriminant itself is always active.
    field_sets: BTreeMap<String, BTreeSet<String>>,
    sub_mode: Option<SubModeOptions>,
}

/// Change callback invoked with the propagated composite value.
pub type ChangeListener = Box<dyn FnMut(&CompositeValue)>;

/// A nested form control exposing an atomic value/validator pair to a host
/// form while managing per-field enablement internally.
pub struct CompositeControl {
    options: CompositeOptions,
    fields: BTreeMap<String, FieldState>,
    disabled: bool,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for CompositeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeControl")
            .field("options", &self.options)
            .field("fields", &self.fields)
            .field("disabled", &self.disabled)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl CompositeControl {
    /// Starts building a control around the named discriminant field and
    /// its default tag.
    pub fn builder(
        discriminant: impl Into<String>,
        default_tag: impl Into<String>,
    ) -> CompositeControlBuilder {
        CompositeControlBuilder {
            discriminant: discriminant.into(),
            default_tag: default_tag.into(),
            fields: BTreeMap::new(),
            field_sets: BTreeMap::new(),
            sub_mode: None,
        }
    }

    /// The current discriminant tag.
    ///
    /// Falls back to the configured default if the buffer was fed a
    /// malformed (non-text or empty) discriminant.
    pub fn discriminant_tag(&self) -> &str {
        self.fields
            .get(&self.options.discriminant)
            .and_then(|f| f.value.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.options.default_tag)
    }

    /// Accepts an externally supplied value from the host form.
    ///
    /// `None` is treated as an empty mapping. A missing discriminant is
    /// replaced with the default tag, every registered field buffer is reset
    /// (fields absent from the mapping go back to their reset value, unknown
    /// incoming fields are ignored), and enablement is recomputed. This path
    /// never fires the change callback.
    pub fn write_value(&mut self, value: Option<CompositeValue>) {
        let mut incoming = value.unwrap_or_default();
        let missing_tag = incoming
            .get_str(&self.options.discriminant)
            .is_none_or(str::is_empty);
        if missing_tag {
            incoming.insert(
                self.options.discriminant.clone(),
                self.options.default_tag.clone(),
            );
        }

        for (name, state) in &mut self.fields {
            state.reset_to(incoming.get(name));
        }

        let tag = self.discriminant_tag().to_string();
        tracing::debug!(discriminant = %tag, "external value written");
        self.apply_enablement(&tag);
    }

    /// Applies a user or programmatic edit to one field.
    ///
    /// Edits to unknown fields are ignored. Writing the value a field
    /// already holds is a no-op and emits nothing. A discriminant edit
    /// recomputes enablement (silently) before the single change
    /// notification for the edit fires.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        if self.disabled {
            return;
        }
        let value = value.into();
        let Some(state) = self.fields.get_mut(name) else {
            tracing::debug!(field = name, "edit to unknown field ignored");
            return;
        };
        if state.value == value {
            return;
        }
        state.value = value;
        let edited_enabled = state.enabled;

        if name == self.options.discriminant {
            let tag = self.discriminant_tag().to_string();
            tracing::debug!(discriminant = %tag, "discriminant changed");
            self.apply_enablement(&tag);
            self.notify();
        } else if edited_enabled {
            self.notify();
        }
        // A buffered edit to a disabled field is invisible in the
        // propagated value, so nothing is emitted for it.
    }

    /// Registers the callback the host form receives value changes on.
    pub fn register_on_change(&mut self, listener: impl FnMut(&CompositeValue) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Drops the registered change listener, e.g. on host-form teardown.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Enables or disables the whole control. Silent; a disabled control
    /// validates as passing and ignores edits.
    pub fn set_disabled(&mut self, disabled: bool) {
        tracing::debug!(disabled, "control disabled state changed");
        self.disabled = disabled;
    }

    /// Whether the whole control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Aggregate pass/fail over the currently enabled fields.
    pub fn validate(&self) -> Result<(), CompositeInvalid> {
        if self.disabled || self.field_errors().is_empty() {
            Ok(())
        } else {
            Err(CompositeInvalid)
        }
    }

    /// Convenience wrapper over [`CompositeControl::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Per-field violations among the enabled fields. Empty when valid.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<FieldError>> {
        self.fields
            .iter()
            .filter(|(_, state)| state.enabled)
            .filter_map(|(name, state)| {
                let errors = state.errors();
                (!errors.is_empty()).then(|| (name.clone(), errors))
            })
            .collect()
    }

    /// The propagated value: enabled fields only.
    pub fn value(&self) -> CompositeValue {
        self.fields
            .iter()
            .filter(|(_, state)| state.enabled)
            .map(|(name, state)| (name.clone(), state.value.clone()))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    /// The full edit buffer, including fields currently disabled.
    pub fn raw_value(&self) -> CompositeValue {
        self.fields
            .iter()
            .map(|(name, state)| (name.clone(), state.value.clone()))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    /// Whether the named field is currently enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|f| f.enabled)
    }

    /// Names of the currently enabled fields.
    pub fn enabled_fields(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .filter(|(_, state)| state.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Recomputes field enablement for a discriminant tag.
    ///
    /// Silent by construction: flips only the `enabled` flags and never
    /// touches the change listener. Re-applying the current tag is a no-op.
    fn apply_enablement(&mut self, tag: &str) {
        if let Some(sub) = &self.options.sub_mode
            && tag == sub.activating_tag
            && let Some(state) = self.fields.get_mut(&sub.field)
            && state.value.as_str().is_none_or(str::is_empty)
        {
            tracing::trace!(field = %sub.field, tag = %sub.default_tag, "sub-mode seeded");
            state.value = FieldValue::Text(sub.default_tag.clone());
        }

        let active = self.options.field_sets.get(tag).cloned().unwrap_or_default();
        for (name, state) in &mut self.fields {
            let enable = *name == self.options.discriminant || active.contains(name);
            if state.enabled != enable {
                tracing::trace!(field = %name, enable, "field enablement flipped");
                state.enabled = enable;
            }
        }
    }

    /// Emits one consolidated change notification with the current
    /// propagated value.
    fn notify(&mut self) {
        let value = self.value();
        if let Some(listener) = self.on_change.as_mut() {
            listener(&value);
        }
    }
}

/// Builder for [`CompositeControl`].
#[derive(Debug)]
pub struct CompositeControlBuilder {
    discriminant: String,
    default_tag: String,
    fields: BTreeMap<String, FieldState>,
    field_sets: BTreeMap<String, BTreeSet<String>>,
    sub_mode: Option<SubModeOptions>,
}

impl CompositeControlBuilder {
    /// Registers a free-text field with its rules.
    pub fn text_field(
        mut self,
        name: impl Into<String>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldState::new(FieldValue::Text(String::new()), validators.into_iter().collect()),
        );
        self
    }

    /// Registers a boolean toggle field.
    pub fn flag_field(mut self, name: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), FieldState::new(FieldValue::Flag(false), Vec::new()));
        self
    }

    /// Declares the field subset active under a discriminant tag.
    pub fn field_set<I, S>(mut self, tag: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_sets
            .insert(tag.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Declares the extended sub-mode field seeded on entry into the
    /// activating discriminant state.
    pub fn sub_mode(
        mut self,
        field: impl Into<String>,
        default_tag: impl Into<String>,
        activating_tag: impl Into<String>,
    ) -> Self {
        self.sub_mode = Some(SubModeOptions {
            field: field.into(),
            default_tag: default_tag.into(),
            activating_tag: activating_tag.into(),
        });
        self
    }

    /// Finishes the control. The discriminant field is registered
    /// automatically with the default tag as its reset value, and the
    /// initial enablement set is derived from the default tag.
    pub fn build(mut self) -> CompositeControl {
        self.fields.insert(
            self.discriminant.clone(),
            FieldState::new(FieldValue::Text(self.default_tag.clone()), Vec::new()),
        );
        let mut control = CompositeControl {
            options: CompositeOptions {
                discriminant: self.discriminant,
                default_tag: self.default_tag,
                field_sets: self.field_sets,
                sub_mode: self.sub_mode,
            },
            fields: self.fields,
            disabled: false,
            on_change: None,
        };
        let tag = control.options.default_tag.clone();
        control.apply_enablement(&tag);
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn two_state_control() -> CompositeControl {
        CompositeControl::builder("kind", "plain")
            .text_field("name", [Validator::Required])
            .text_field("path", [Validator::NoLeadTrailSpaces])
            .field_set("plain", ["name"])
            .field_set("filed", ["name", "path"])
            .build()
    }

    #[test]
    fn test_initial_enablement_follows_default_tag() {
        let control = two_state_control();
        assert_eq!(control.discriminant_tag(), "plain");
        assert!(control.is_enabled("kind"));
        assert!(control.is_enabled("name"));
        assert!(!control.is_enabled("path"));
    }

    #[test]
    fn test_write_value_substitutes_default_discriminant() {
        let mut control = two_state_control();
        control.write_value(Some(CompositeValue::new().with("name", "a")));
        assert_eq!(control.discriminant_tag(), "plain");
        assert_eq!(control.value().get_str("name"), Some("a"));
    }

    #[test]
    fn test_write_value_none_resets_buffers() {
        let mut control = two_state_control();
        control.set_field("name", "edited");
        control.write_value(None);
        assert_eq!(control.value().get_str("name"), Some(""));
        assert_eq!(control.discriminant_tag(), "plain");
        // The default tag's required field is now empty again.
        assert!(!control.is_valid());
    }

    #[test]
    fn test_write_value_never_propagates() {
        let mut control = two_state_control();
        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);
        control.register_on_change(move |_| *seen.borrow_mut() += 1);

        control.write_value(Some(CompositeValue::new().with("kind", "filed")));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut control = two_state_control();
        control.write_value(Some(CompositeValue::new().with("bogus", "x")));
        assert!(!control.raw_value().contains("bogus"));

        control.set_field("bogus", "y");
        assert!(!control.raw_value().contains("bogus"));
    }

    #[test]
    fn test_discriminant_edit_recomputes_before_notify() {
        let mut control = two_state_control();
        let snapshots: Rc<RefCell<Vec<CompositeValue>>> = Rc::default();
        let sink = Rc::clone(&snapshots);
        control.register_on_change(move |v| sink.borrow_mut().push(v.clone()));

        control.set_field("kind", "filed");

        let snaps = snapshots.borrow();
        assert_eq!(snaps.len(), 1);
        // The snapshot already reflects the new enablement set.
        assert!(snaps[0].contains("path"));
    }

    #[test]
    fn test_same_value_edit_is_a_noop() {
        let mut control = two_state_control();
        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);
        control.register_on_change(move |_| *seen.borrow_mut() += 1);

        control.set_field("kind", "filed");
        control.set_field("kind", "filed");
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(
            control.enabled_fields(),
            ["kind", "name", "path"].into_iter().collect()
        );
    }

    #[test]
    fn test_disabled_field_edit_is_buffered_but_silent() {
        let mut control = two_state_control();
        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);
        control.register_on_change(move |_| *seen.borrow_mut() += 1);

        control.set_field("path", "/tmp/ca.pem");
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(control.raw_value().get_str("path"), Some("/tmp/ca.pem"));
        assert!(!control.value().contains("path"));
    }

    #[test]
    fn test_validation_covers_enabled_fields_only() {
        let mut control = two_state_control();
        // Required "name" empty under the default tag.
        assert!(!control.is_valid());

        control.set_field("name", "n");
        assert!(control.is_valid());

        // "path" has trailing whitespace but is disabled under "plain".
        control.set_field("path", "bad ");
        assert!(control.is_valid());

        control.set_field("kind", "filed");
        assert!(!control.is_valid());
        assert_eq!(
            control.field_errors().get("path"),
            Some(&vec![FieldError::LeadTrailWhitespace])
        );
    }

    #[test]
    fn test_whole_control_disable_silences_and_passes() {
        let mut control = two_state_control();
        assert!(!control.is_valid());

        control.set_disabled(true);
        assert!(control.is_valid());

        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);
        control.register_on_change(move |_| *seen.borrow_mut() += 1);
        control.set_field("name", "ignored while disabled");
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(control.raw_value().get_str("name"), Some(""));

        control.set_disabled(false);
        assert!(!control.is_valid());
    }

    #[test]
    fn test_clear_on_change_drops_listener() {
        let mut control = two_state_control();
        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);
        control.register_on_change(move |_| *seen.borrow_mut() += 1);
        control.clear_on_change();

        control.set_field("name", "x");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_malformed_discriminant_falls_back_to_default() {
        let mut control = two_state_control();
        control.set_field("kind", true);
        assert_eq!(control.discriminant_tag(), "plain");
        assert!(control.is_enabled("name"));
        assert!(!control.is_enabled("path"));
    }

    #[test]
    fn test_unknown_tag_enables_discriminant_only() {
        let mut control = two_state_control();
        control.set_field("kind", "mystery");
        assert_eq!(control.enabled_fields(), ["kind"].into_iter().collect());
    }
}
