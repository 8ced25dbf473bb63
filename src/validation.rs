//! Field validation rules.
//!
//! `validate` checks credential-style input (e-mail addresses and passwords).
//! `validate_field` dispatches on a field's type and is what the form
//! controller runs on every change. Both are pure.
//!
//! The "empty" message differs between the two paths: the credential path has
//! no trailing `!`, the text and number paths do. Hosts match on these
//! strings, so both are kept as they are.

use crate::state::{FieldError, FieldType, FieldValue};
use crate::utils::numeric::is_numeric;
use regex::Regex;
use std::sync::OnceLock;

/// Empty input on the credential path.
pub const EMPTY_INPUT: &str = "Input field cannot be empty";
/// Empty input on the text and number paths, and the required-field error.
pub const REQUIRED_FIELD: &str = "Input field cannot be empty!";
pub const INVALID_EMAIL: &str = "Invalid e-mail entered";
pub const SHORT_PASSWORD: &str = "Password must contain atleat 6 characters";
pub const INVALID_NUMBER: &str = "Invalid data provided!";
pub const NUMBER_TOO_LONG: &str = "Invalid length of characters!";

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Local part of word characters, '-' and '.', then one or more "label."
// groups and a 2-5 character top-level label.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,5}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Email pattern is a valid regex"))
}

/// Field types that go through the credential rules.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialType {
    Email,
    Password,
}

impl TryFrom<FieldType> for CredentialType {
    type Error = FieldType;

    fn try_from(field_type: FieldType) -> Result<Self, Self::Error> {
        match field_type {
            FieldType::Email => Ok(CredentialType::Email),
            FieldType::Password => Ok(CredentialType::Password),
            other => Err(other),
        }
    }
}

/// Validate an e-mail address or password.
///
/// Empty input is rejected before any type-specific rule runs.
///
/// # Returns
/// `None` if the input is valid, otherwise the error to show for it.
pub fn validate(value: &str, credential: CredentialType) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(EMPTY_INPUT));
    }

    match credential {
        CredentialType::Email => {
            if email_regex().is_match(value) {
                None
            } else {
                Some(FieldError::new(INVALID_EMAIL))
            }
        }
        CredentialType::Password => {
            if value.chars().count() < MIN_PASSWORD_LENGTH {
                Some(FieldError::new(SHORT_PASSWORD))
            } else {
                None
            }
        }
    }
}

/// Validate a value against the rule for `field_type`.
///
/// `limit` bounds the textual length of number fields and is ignored for the
/// other types. A number field without a limit is unbounded.
///
pub fn validate_field(
    field_type: FieldType,
    limit: Option<usize>,
    value: &FieldValue,
) -> Option<FieldError> {
    match field_type {
        FieldType::Email => validate(&value.as_text(), CredentialType::Email),
        FieldType::Password => validate(&value.as_text(), CredentialType::Password),
        FieldType::Text => {
            if value.as_text().chars().count() < 1 {
                Some(FieldError::new(REQUIRED_FIELD))
            } else {
                None
            }
        }
        FieldType::Number => validate_number(limit, value),
    }
}

fn validate_number(limit: Option<usize>, value: &FieldValue) -> Option<FieldError> {
    let numeric = match value {
        FieldValue::Text(text) if text.is_empty() => {
            return Some(FieldError::new(REQUIRED_FIELD));
        }
        FieldValue::Text(text) => is_numeric(text),
        FieldValue::Number(n) => !n.is_nan(),
    };
    if !numeric {
        return Some(FieldError::new(INVALID_NUMBER));
    }

    match limit {
        Some(limit) if value.as_text().chars().count() > limit => {
            Some(FieldError::new(NUMBER_TOO_LONG))
        }
        _ => None,
    }
}
