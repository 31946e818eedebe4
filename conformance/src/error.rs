//! Harness setup failures.
//!
//! These are distinct from [`Rejection`](crate::Rejection) (the processor
//! refusing a payload, which is what the oracles observe) and from
//! [`Mismatch`](crate::Mismatch) (an oracle expectation that did not hold).
//! A `HarnessError` means the check could not run at all and aborts the
//! calling test.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HarnessError {
    /// A fixture or template file could not be read.
    #[error("failed to read {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture or template file was read but could not be deserialized.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The payload prepared for a condition is already rejected by the
    /// processor, before the field under test was touched.
    #[error("condition on [{keys}] yields a payload the processor rejects: {message}")]
    ConditionRejected { keys: String, message: String },

    /// A schema description could not be deserialized.
    #[error("invalid schema description: {0}")]
    InvalidSchema(String),
}
