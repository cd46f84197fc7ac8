//! Composite value types exchanged between nested controls and host forms.
//!
//! Responsibilities:
//! - Define the loosely typed field values a form buffer can hold.
//! - Define the named-field mapping (`CompositeValue`) passed in and out of
//!   a composite control.
//!
//! Does NOT handle:
//! - Field enablement or validation (see `control` and `validators` modules).
//! - Typed views of concrete configurations (see `security` module).
//!
//! Invariants:
//! - `CompositeValue` serializes as a plain JSON object so it matches the
//!   wire shape the gateway connectors expect.
//! - Field ordering is stable (sorted by name) for deterministic output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single form field value.
///
/// Free-text inputs and enum tags are both carried as strings; toggles are
/// carried as booleans. The untagged representation keeps the serialized
/// form identical to the raw JSON object the host form works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text or an enum tag.
    Text(String),
    /// A boolean toggle.
    Flag(bool),
}

impl FieldValue {
    /// Returns the string content for text values, `None` for flags.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    /// Returns the boolean content for flags, `None` for text values.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Text(_) => None,
            Self::Flag(b) => Some(*b),
        }
    }

    /// Whether the value counts as empty for "required" purposes.
    ///
    /// Flags are never empty: an unchecked toggle is still an answer.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Flag(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// The full named-field mapping passed between a nested control and its host
/// form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeValue(BTreeMap<String, FieldValue>);

impl CompositeValue {
    /// Creates an empty composite value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, for concise construction in callers and tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Looks up a field's text content by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Whether the mapping holds a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of fields in the mapping.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, FieldValue>> for CompositeValue {
    fn from(map: BTreeMap<String, FieldValue>) -> Self {
        Self(map)
    }
}

impl IntoIterator for CompositeValue {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
