//! Form construction and lookup error types.

/// Errors that can occur while building or addressing a form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    /// Number field declared without a digit limit
    #[error("Number field '{key}' requires a limit")]
    MissingLimit { key: String },

    /// Same key declared twice
    #[error("Field '{key}' is declared more than once")]
    DuplicateField { key: String },

    /// Key not present in the form
    #[error("Unknown field: {key}")]
    UnknownField { key: String },
}
