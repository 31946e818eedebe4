//! Reusable oracles asserting accept/reject behaviour of a [`Processor`].
//!
//! Every check follows the same cycle on a freshly loaded copy of the
//! canonical payload: apply the field's [`Condition`], apply the mutation for
//! the field under test, validate, and compare the outcome with the
//! expectation. Payloads expected to pass must also decode.

pub mod data;
pub mod keyword;
pub mod parity;
pub mod presence;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::condition::{Condition, apply_condition};
use crate::config::OracleConfig;
use crate::error::HarnessError;
use crate::loader::PayloadLoader;
use crate::processor::{Processor, mentions};
use crate::report::{Mismatch, OracleReport};
use crate::tree::{Mutation, mutate};

/// What the processor should do with a payload variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expectation {
    /// Validation and decoding succeed.
    Accept,
    /// Validation fails with a message containing the fragment.
    Reject(String),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "acceptance"),
            Self::Reject(fragment) => write!(f, "rejection containing \"{fragment}\""),
        }
    }
}

/// What the processor did with a payload variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Accepted,
    Rejected(String),
    /// Validation passed but decoding failed.
    DecodeFailed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "acceptance"),
            Self::Rejected(message) => write!(f, "rejection \"{message}\""),
            Self::DecodeFailed(message) => write!(f, "decode failure \"{message}\""),
        }
    }
}

impl Outcome {
    #[must_use]
    pub fn satisfies(&self, expected: &Expectation) -> bool {
        match (expected, self) {
            (Expectation::Accept, Self::Accepted) => true,
            (Expectation::Reject(fragment), Self::Rejected(message)) => {
                mentions(message, fragment)
            }
            _ => false,
        }
    }
}

/// The processor under test together with the fixtures the oracles need.
pub struct ProcessorSetup<P, L> {
    pub processor: P,
    pub loader: L,
    /// Path (for the loader) of a full, valid example payload.
    pub full_payload_path: PathBuf,
    /// Paths (for the loader) of storage template definitions.
    pub template_paths: Vec<PathBuf>,
    pub config: OracleConfig,
}

impl<P, L> ProcessorSetup<P, L>
where
    P: Processor,
    L: PayloadLoader,
{
    pub fn new(processor: P, loader: L, full_payload_path: impl Into<PathBuf>) -> Self {
        Self {
            processor,
            loader,
            full_payload_path: full_payload_path.into(),
            template_paths: Vec::new(),
            config: OracleConfig::default(),
        }
    }

    #[must_use]
    pub fn with_template_paths(mut self, template_paths: Vec<PathBuf>) -> Self {
        self.template_paths = template_paths;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: OracleConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one check: fresh payload, condition, mutation, validation.
    fn change_payload(
        &self,
        key: &str,
        mutation: &Mutation,
        condition: &Condition,
        expected: Expectation,
        report: &mut OracleReport,
    ) -> Result<(), HarnessError> {
        let payload = self.loader.load_data(&self.full_payload_path)?;
        let payload = apply_condition(payload, condition, &self.processor)?;
        let payload = mutate(payload, key, mutation);

        let actual = match self.processor.validate(&payload) {
            Err(rejection) => Outcome::Rejected(rejection.message().to_owned()),
            Ok(()) if expected == Expectation::Accept => {
                match self.processor.decode(&payload) {
                    Ok(_) => Outcome::Accepted,
                    Err(rejection) => Outcome::DecodeFailed(rejection.message().to_owned()),
                }
            }
            Ok(()) => Outcome::Accepted,
        };

        let value = match mutation {
            Mutation::Upsert(value) => Some(value.clone()),
            Mutation::Delete => None,
        };
        if actual.satisfies(&expected) {
            debug!(oracle = %report.oracle, key, outcome = %actual, "check passed");
            report.record(None);
        } else {
            let mismatch = Mismatch {
                key: key.to_owned(),
                value,
                expected,
                actual,
            };
            warn!(oracle = %report.oracle, "{mismatch}");
            report.record(Some(mismatch));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Rejection;

    #[test]
    fn test_outcome_satisfies() {
        let reject = Expectation::Reject("MaxLength".to_owned());
        assert!(Outcome::Rejected("error: maxlength exceeded".to_owned()).satisfies(&reject));
        assert!(!Outcome::Rejected("wrong type".to_owned()).satisfies(&reject));
        assert!(!Outcome::Accepted.satisfies(&reject));

        assert!(Outcome::Accepted.satisfies(&Expectation::Accept));
        assert!(!Outcome::DecodeFailed("bad".to_owned()).satisfies(&Expectation::Accept));
        assert!(!Outcome::Rejected("bad".to_owned()).satisfies(&Expectation::Accept));
    }

    #[test]
    fn test_outcome_matches_like_rejection() {
        let rejection = Rejection::new("\"PID\" is a required property");
        for fragment in ["\"pid\" is a required", "REQUIRED PROPERTY", "maxlength"] {
            let expected = Expectation::Reject(fragment.to_owned());
            let outcome = Outcome::Rejected(rejection.message().to_owned());
            assert_eq!(outcome.satisfies(&expected), rejection.mentions(fragment));
        }
    }
}
