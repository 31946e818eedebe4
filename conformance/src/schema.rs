//! Minimal schema description and its dotted-path flattening.
//!
//! Only the parts needed to compare declared fields with example payloads are
//! modelled. Anything else in the document (`type`, `required`, `if`, ...)
//! is ignored on deserialization.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::error::HarnessError;
use crate::set::FieldSet;
use crate::tree::join_key;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    pub title: Option<String>,
    pub properties: BTreeMap<String, Schema>,
    pub additional_properties: Option<Value>,
    pub pattern_properties: Option<Value>,
    pub items: Option<Box<Schema>>,
    pub max_length: Option<u64>,
}

impl Schema {
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidSchema`] if the text is not a schema document.
    pub fn from_json_str(schema: &str) -> Result<Self, HarnessError> {
        serde_json::from_str(schema).map_err(|e| HarnessError::InvalidSchema(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidSchema`] if the input is not a schema document.
    pub fn from_reader(reader: impl Read) -> Result<Self, HarnessError> {
        serde_json::from_reader(reader).map_err(|e| HarnessError::InvalidSchema(e.to_string()))
    }
}

/// Include every declared property.
#[must_use]
pub fn all_properties(_schema: &Schema) -> bool {
    true
}

/// Include only properties carrying a `maxLength` restriction.
#[must_use]
pub fn length_restricted(schema: &Schema) -> bool {
    schema.max_length.is_some()
}

/// Add the dotted names of the properties declared below `schema` to `out`.
///
/// Descends through `properties`, or through `items` when a node declares no
/// properties. `include` decides per property whether its own name is added;
/// descent continues either way.
pub fn flatten_schema_names<F>(schema: &Schema, prefix: &str, include: &F, out: &mut FieldSet)
where
    F: Fn(&Schema) -> bool,
{
    if !schema.properties.is_empty() {
        for (name, property) in &schema.properties {
            let key = join_key(prefix, name);
            flatten_schema_names(property, &key, include, out);
            if include(property) {
                out.insert(key);
            }
        }
    } else if let Some(items) = &schema.items {
        flatten_schema_names(items, prefix, include, out);
    }
}

/// Every property name the schema declares.
#[must_use]
pub fn schema_names(schema: &Schema) -> FieldSet {
    let mut out = FieldSet::new();
    flatten_schema_names(schema, "", &all_properties, &mut out);
    out
}
