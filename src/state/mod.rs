//! Form state data model.
//!
//! This module contains the types the form controller owns and hands out:
//! - Per-field types (FieldType, FieldValue, FieldError, FieldState)
//! - The ordered FormState map and the FormSnapshot seen by observers
//! - Form construction and lookup errors

mod error;
mod field;
mod form;

pub use error::FormError;
pub use field::{FieldError, FieldState, FieldType, FieldValue};
pub use form::{FormSnapshot, FormState};
