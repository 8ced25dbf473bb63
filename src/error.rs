//! Crate-wide error types.
//!
//! Validation and submission failures never surface here: they are recorded
//! in the form state or handed to the submit hooks. This type covers the
//! operations that can fail outright, such as loading a schema or building a
//! form from it.

pub use crate::config::SchemaError;
pub use crate::state::FormError;

/// Main error type.
///
#[derive(Debug, thiserror::Error)]
pub enum FormitaError {
    /// Schema loading errors
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Form construction and lookup errors
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Logger installation errors
    #[error("Logger error: {0}")]
    Logger(String),
}

/// Convenience type alias for Result with FormitaError
pub type FormitaResult<T> = Result<T, FormitaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formita_error_from_schema_error() {
        let schema_error = SchemaError::DeserializationFailed("bad".to_string());
        let error: FormitaError = schema_error.into();
        assert!(matches!(error, FormitaError::Schema(_)));
        assert!(error.to_string().contains("Schema error"));
    }

    #[test]
    fn test_formita_error_from_form_error() {
        let form_error = FormError::UnknownField {
            key: "phone".to_string(),
        };
        let error: FormitaError = form_error.into();
        assert!(matches!(error, FormitaError::Form(_)));
        assert_eq!(error.to_string(), "Form error: Unknown field: phone");
    }

    #[test]
    fn test_formita_error_logger() {
        let error = FormitaError::Logger("already set".to_string());
        assert!(error.to_string().contains("Logger error"));
    }
}
