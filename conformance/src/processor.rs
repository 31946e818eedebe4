//! Contract for the validator/decoder under test.

use serde_json::Value;
use thiserror::Error;

/// A payload refused by the processor, carrying its diagnostic text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct Rejection {
    message: String,
}

impl Rejection {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Case-insensitive substring match against the diagnostic text.
    #[must_use]
    pub fn mentions(&self, fragment: &str) -> bool {
        mentions(&self.message, fragment)
    }
}

/// Whether `message` contains `fragment`, ignoring case.
///
/// Every oracle compares diagnostics this way.
#[must_use]
pub fn mentions(message: &str, fragment: &str) -> bool {
    message.to_lowercase().contains(&fragment.to_lowercase())
}

/// The system under test: a validator plus the decoder that turns accepted
/// payloads into domain values.
///
/// Oracles only ever call [`decode`](Processor::decode) on payloads that
/// passed [`validate`](Processor::validate) and were expected to; a decode
/// failure there is reported as a validator/decoder disagreement.
pub trait Processor {
    type Decoded;

    /// Validate a payload tree.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] describing why the payload is invalid.
    fn validate(&self, payload: &Value) -> Result<(), Rejection>;

    /// Decode a payload tree into the domain result.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the payload cannot be decoded.
    fn decode(&self, payload: &Value) -> Result<Self::Decoded, Rejection>;
}
