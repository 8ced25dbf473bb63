//! Form schema module.
//!
//! This module describes the fields a form is built from and handles loading
//! that description from YAML or JSON, either inline or from disk.

mod error;

pub use error::SchemaError;

use crate::state::{FieldType, FieldValue};
use log::*;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, fs, path::Path};

/// Declaration of a single field.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FieldSpec {
    fn of(field_type: FieldType) -> Self {
        FieldSpec {
            field_type,
            value: None,
            limit: None,
        }
    }

    pub fn email() -> Self {
        FieldSpec::of(FieldType::Email)
    }

    pub fn text() -> Self {
        FieldSpec::of(FieldType::Text)
    }

    pub fn password() -> Self {
        FieldSpec::of(FieldType::Password)
    }

    /// Number field whose textual form may be at most `limit` characters.
    ///
    pub fn number(limit: usize) -> Self {
        FieldSpec {
            limit: Some(limit),
            ..FieldSpec::of(FieldType::Number)
        }
    }

    /// Set the initial value.
    ///
    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Ordered set of field declarations a form is built from.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl FormSchema {
    /// Return a new empty schema.
    ///
    pub fn new() -> FormSchema {
        FormSchema { fields: vec![] }
    }

    /// Append a field declaration.
    ///
    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((key.into(), spec));
        self
    }

    /// Iterate over declarations in order.
    ///
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a schema from a YAML mapping of key to field declaration.
    ///
    pub fn from_yaml_str(contents: &str) -> Result<FormSchema, SchemaError> {
        serde_yaml::from_str(contents).map_err(|e| SchemaError::DeserializationFailed(e.to_string()))
    }

    /// Parse a schema from a JSON object of key to field declaration.
    ///
    pub fn from_json_str(contents: &str) -> Result<FormSchema, SchemaError> {
        serde_json::from_str(contents).map_err(|e| SchemaError::DeserializationFailed(e.to_string()))
    }

    /// Load a schema file, choosing the format from its extension.
    ///
    pub fn load(path: impl AsRef<Path>) -> Result<FormSchema, SchemaError> {
        let path = path.as_ref();
        debug!("Loading form schema from {}...", path.display());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let parse: fn(&str) -> Result<FormSchema, SchemaError> = match extension.as_deref() {
            Some("yml") | Some("yaml") => FormSchema::from_yaml_str,
            Some("json") => FormSchema::from_json_str,
            _ => {
                return Err(SchemaError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let contents = fs::read_to_string(path).map_err(|e| SchemaError::LoadFailed {
            path: path.to_path_buf(),
            message: format!("IO error: {}", e),
        })?;
        let schema = parse(&contents)?;
        debug!(
            "Loaded {} field declarations from {}",
            schema.len(),
            path.display()
        );
        Ok(schema)
    }
}

impl Serialize for FormSchema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, spec) in &self.fields {
            map.serialize_entry(key, spec)?;
        }
        map.end()
    }
}

// Visits map entries in document order so field order survives parsing.
struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = FormSchema;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field key to field declaration")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, spec)) = access.next_entry::<String, FieldSpec>()? {
            fields.push((key, spec));
        }
        Ok(FormSchema { fields })
    }
}

impl<'de> Deserialize<'de> for FormSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}
