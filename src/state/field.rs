//! Per-field state types.
//!
//! This module contains the field type tag, the value a field holds, the
//! validation error attached to it, and the per-field state record.

use crate::utils::numeric::format_number;
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Specifying the kind of input a field accepts.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Email,
    Text,
    Password,
    Number,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Email => "email",
            FieldType::Text => "text",
            FieldType::Password => "password",
            FieldType::Number => "number",
        };
        f.write_str(name)
    }
}

/// Value held by a field, either raw text from an input or a number.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Return the textual form of the value.
    ///
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(n) => format_number(*n),
        }
    }

    /// Return true if the textual form of the value is empty.
    ///
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

/// Validation error attached to a single field.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        FieldError {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Current state of one field.
///
/// `field_type` and `limit` are fixed when the form is built. `value` and
/// `error` only change together.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: FieldValue,
    pub error: Option<FieldError>,
    pub limit: Option<usize>,
}

impl FieldState {
    /// Return a fresh state with no error.
    ///
    pub fn new(field_type: FieldType, value: FieldValue, limit: Option<usize>) -> Self {
        FieldState {
            field_type,
            value,
            error: None,
            limit,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Replace value and error as one step.
    ///
    pub(crate) fn set(&mut self, value: FieldValue, error: Option<FieldError>) {
        self.value = value;
        self.error = error;
    }
}
