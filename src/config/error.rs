//! Schema loading error types.

use std::path::PathBuf;

/// Errors that can occur while loading a form schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Failed to read schema file
    #[error("Failed to load schema from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Schema file extension is not yml, yaml or json
    #[error("Unsupported schema format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Failed to deserialize schema
    #[error("Failed to deserialize schema: {0}")]
    DeserializationFailed(String),
}
