//! # conformance-jsonschema
//!
//! A [`Processor`] backed by a compiled JSON Schema, for running the
//! `conformance` oracles against a schema document directly.
//!
//! Validation collects every error the schema reports, so a rejection message
//! contains the fragments [`Diagnostics::jsonschema`](conformance::Diagnostics::jsonschema)
//! expects. Decoding deserializes the payload into `T`; use a typed model to
//! check that everything the schema admits also decodes.

use std::fmt;
use std::marker::PhantomData;

use conformance::{HarnessError, Processor, Rejection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema does not compile: {0}")]
    Compile(String),
}

impl From<SchemaError> for HarnessError {
    fn from(err: SchemaError) -> Self {
        Self::InvalidSchema(err.to_string())
    }
}

/// Validates payloads against a JSON Schema and decodes them into `T`.
pub struct JsonSchemaProcessor<T = Value> {
    validator: jsonschema::Validator,
    decoded: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for JsonSchemaProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaProcessor").finish_non_exhaustive()
    }
}

impl<T> JsonSchemaProcessor<T> {
    /// Compile `schema`, detecting the draft from `$schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the document is not a valid schema.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self {
            validator,
            decoded: PhantomData,
        })
    }

    /// Parse and compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the text is not JSON or not a valid schema.
    pub fn from_json_str(schema: &str) -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(schema)?;
        Self::new(&schema)
    }
}

impl<T> Processor for JsonSchemaProcessor<T>
where
    T: DeserializeOwned,
{
    type Decoded = T;

    fn validate(&self, payload: &Value) -> Result<(), Rejection> {
        let mut errors = Vec::new();
        for error in self.validator.iter_errors(payload) {
            errors.push(error.to_string());
        }
        if errors.is_empty() {
            return Ok(());
        }
        debug!(errors = errors.len(), "payload rejected");
        Err(Rejection::new(errors.join("; ")))
    }

    fn decode(&self, payload: &Value) -> Result<T, Rejection> {
        T::deserialize(payload).map_err(|e| Rejection::new(format!("decode: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn processor() -> JsonSchemaProcessor {
        JsonSchemaProcessor::new(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "maxLength": 4},
                "pid": {"type": ["integer", "null"]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_accepts_and_rejects() {
        let p = processor();
        assert!(p.validate(&json!({"name": "svc"})).is_ok());

        let err = p.validate(&json!({"pid": 1})).unwrap_err();
        assert!(err.mentions("\"name\" is a required property"), "{err}");

        let err = p.validate(&json!({"name": null})).unwrap_err();
        assert!(err.mentions("null is not of type"), "{err}");

        let err = p.validate(&json!({"name": "toolong"})).unwrap_err();
        assert!(err.mentions("is longer than"), "{err}");
    }

    #[test]
    fn test_all_errors_are_reported() {
        let err = processor()
            .validate(&json!({"name": "toolong", "pid": "x"}))
            .unwrap_err();
        assert!(err.mentions("is longer than"), "{err}");
        assert!(err.mentions("is not of type"), "{err}");
    }

    #[test]
    fn test_decode_into_typed_model() {
        #[derive(Debug, Deserialize)]
        struct Model {
            name: String,
        }

        let p: JsonSchemaProcessor<Model> =
            JsonSchemaProcessor::from_json_str(r#"{"type": "object"}"#).unwrap();
        assert_eq!(p.decode(&json!({"name": "svc"})).unwrap().name, "svc");
        let err = p.decode(&json!({"name": 1})).unwrap_err();
        assert!(err.message().starts_with("decode:"));
    }

    #[test]
    fn test_invalid_schema() {
        assert!(matches!(
            JsonSchemaProcessor::<Value>::from_json_str("{"),
            Err(SchemaError::Json(_))
        ));
        let err = JsonSchemaProcessor::<Value>::new(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::Compile(_)));
        assert!(matches!(HarnessError::from(err), HarnessError::InvalidSchema(_)));
    }
}
