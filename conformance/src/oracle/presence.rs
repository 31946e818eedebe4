//! Required-field enforcement.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use super::{Expectation, ProcessorSetup};
use crate::condition::Condition;
use crate::error::HarnessError;
use crate::loader::PayloadLoader;
use crate::processor::Processor;
use crate::report::OracleReport;
use crate::set::FieldSet;
use crate::tree::{Mutation, flatten, split_key};

impl<P, L> ProcessorSetup<P, L>
where
    P: Processor,
    L: PayloadLoader,
{
    /// Check that payloads missing required attributes fail validation.
    ///
    /// Every path of the full payload is checked twice:
    /// - set to `null`: rejected if the path is required (the caller's
    ///   `required_keys` plus the configured baseline), accepted otherwise;
    /// - deleted, after preparing the payload with the path's entry in
    ///   `cond_required_keys`: rejected naming the leaf key if the path is
    ///   required or conditionally required, accepted otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if the payload cannot be loaded or a
    /// condition yields a payload the processor already rejects.
    pub fn attrs_presence(
        &self,
        required_keys: &FieldSet,
        cond_required_keys: &BTreeMap<String, Condition>,
    ) -> Result<OracleReport, HarnessError> {
        let required = required_keys.union(&self.config.baseline_required);
        let diagnostics = &self.config.diagnostics;

        let payload = self.loader.load_data(&self.full_payload_path)?;
        let keys = flatten(&payload);

        let mut report = OracleReport::new("attrs_presence");
        let unconditional = Condition::default();
        for key in keys.iter() {
            let expected = if required.contains(key) {
                Expectation::Reject(diagnostics.null_rejected.clone())
            } else {
                Expectation::Accept
            };
            self.change_payload(
                key,
                &Mutation::Upsert(Value::Null),
                &unconditional,
                expected,
                &mut report,
            )?;

            let condition = cond_required_keys.get(key);
            let (_, leaf) = split_key(key);
            let expected = if required.contains(key) || condition.is_some() {
                Expectation::Reject(diagnostics.missing_property_for(leaf))
            } else {
                Expectation::Accept
            };
            self.change_payload(
                key,
                &Mutation::Delete,
                condition.unwrap_or(&unconditional),
                expected,
                &mut report,
            )?;
        }

        info!(
            checks = report.checks,
            mismatches = report.mismatches.len(),
            "attrs_presence finished"
        );
        Ok(report)
    }
}
