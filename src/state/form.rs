//! Whole-form state types.
//!
//! `FormState` maps field keys to their state in declaration order. The key
//! set is fixed when the form is built; fields are never added or removed.

use super::field::{FieldError, FieldState, FieldValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered mapping of field key to field state.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    fields: Vec<(String, FieldState)>,
}

impl FormState {
    pub(crate) fn from_entries(fields: Vec<(String, FieldState)>) -> Self {
        FormState { fields }
    }

    /// Get the state for a key.
    ///
    pub fn get(&self, key: &str) -> Option<&FieldState> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, field)| field)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut FieldState> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, field)| field)
    }

    /// Get the value for a key.
    ///
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).map(|field| &field.value)
    }

    /// Get the error for a key, if the key exists and has one.
    ///
    pub fn error(&self, key: &str) -> Option<&FieldError> {
        self.get(key).and_then(|field| field.error.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over keys in declaration order.
    ///
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over entries in declaration order.
    ///
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldState)> {
        self.fields.iter().map(|(k, field)| (k.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Return true if any field currently carries an error.
    ///
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|(_, field)| field.has_error())
    }

    /// Key of the first field, in order, that carries an error.
    ///
    pub fn first_error(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, field)| field.has_error())
            .map(|(k, _)| k.as_str())
    }

    /// Key of the first field, in order, whose value is blank.
    ///
    pub fn first_blank(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, field)| field.value.is_blank())
            .map(|(k, _)| k.as_str())
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

/// Read-only view handed to observers on every state change.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub form: FormState,
    pub loading: bool,
    pub disabled: bool,
}
