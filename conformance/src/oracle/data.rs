//! Data-driven valid/invalid value checks.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{Expectation, ProcessorSetup};
use crate::condition::Condition;
use crate::error::HarnessError;
use crate::loader::PayloadLoader;
use crate::processor::Processor;
use crate::report::OracleReport;
use crate::tree::Mutation;

/// Values that must be rejected with a message containing `msg`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Invalid {
    pub msg: String,
    pub values: Vec<Value>,
}

/// The full value matrix of one field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaTestData {
    pub key: String,
    pub valid: Vec<Value>,
    pub invalid: Vec<Invalid>,
    pub condition: Condition,
}

impl SchemaTestData {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn valid(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.valid.extend(values);
        self
    }

    #[must_use]
    pub fn invalid(mut self, msg: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        self.invalid.push(Invalid {
            msg: msg.into(),
            values: values.into_iter().collect(),
        });
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

impl<P, L> ProcessorSetup<P, L>
where
    P: Processor,
    L: PayloadLoader,
{
    /// Check that the listed values of each field fail or pass validation.
    ///
    /// Valid values also guard the setup itself: if a value meant to pass is
    /// rejected, the invalid cases of the same field prove nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if the payload cannot be loaded or a
    /// condition yields a payload the processor already rejects.
    pub fn data_validation(&self, test_data: &[SchemaTestData]) -> Result<OracleReport, HarnessError> {
        let mut report = OracleReport::new("data_validation");
        for data in test_data {
            for invalid in &data.invalid {
                for value in &invalid.values {
                    self.change_payload(
                        &data.key,
                        &Mutation::Upsert(value.clone()),
                        &data.condition,
                        Expectation::Reject(invalid.msg.clone()),
                        &mut report,
                    )?;
                }
            }
            for value in &data.valid {
                self.change_payload(
                    &data.key,
                    &Mutation::Upsert(value.clone()),
                    &data.condition,
                    Expectation::Accept,
                    &mut report,
                )?;
            }
        }

        info!(
            fields = test_data.len(),
            checks = report.checks,
            mismatches = report.mismatches.len(),
            "data_validation finished"
        );
        Ok(report)
    }
}
