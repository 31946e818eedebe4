//! Oracle result types.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::oracle::{Expectation, Outcome};
use crate::set::FieldSet;

/// One case where the processor did not behave as the oracle expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Mismatch {
    /// Dotted path of the field under test.
    pub key: String,
    /// Value written at `key`; `None` when the key was deleted.
    pub value: Option<Value>,
    pub expected: Expectation,
    pub actual: Outcome,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "key <{}> set to <{}>", self.key, truncate(value))?,
            None => write!(f, "key <{}> deleted", self.key)?,
        }
        write!(f, ": expected {}, got {}", self.expected, self.actual)
    }
}

fn truncate(value: &Value) -> String {
    const MAX_CHARS: usize = 48;
    let text = value.to_string();
    if text.chars().count() > MAX_CHARS {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{head}... ({} chars)", text.chars().count())
    } else {
        text
    }
}

/// Result of one oracle run.
///
/// A report with mismatches means the processor disagrees with the schema
/// contract; [`assert_ok`](Self::assert_ok) turns that into a test failure.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct OracleReport {
    pub oracle: String,
    /// Number of payload variants sent to the processor.
    pub checks: usize,
    pub mismatches: Vec<Mismatch>,
}

impl OracleReport {
    #[must_use]
    pub fn new(oracle: impl Into<String>) -> Self {
        Self {
            oracle: oracle.into(),
            checks: 0,
            mismatches: Vec::new(),
        }
    }

    pub fn record(&mut self, mismatch: Option<Mismatch>) {
        self.checks += 1;
        if let Some(mismatch) = mismatch {
            self.mismatches.push(mismatch);
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatches recorded for `key`.
    pub fn mismatches_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Mismatch> {
        self.mismatches.iter().filter(move |m| m.key == key)
    }

    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let mut out = format!(
            "{}: {} checks, {} mismatches",
            self.oracle,
            self.checks,
            self.mismatches.len()
        );
        for mismatch in &self.mismatches {
            out.push_str("\n  ");
            out.push_str(&mismatch.to_string());
        }
        out
    }

    /// # Panics
    ///
    /// Panics when at least one mismatch was recorded, listing all of them.
    pub fn assert_ok(&self) {
        assert!(self.is_ok(), "{}", self.format_human_readable());
    }
}

/// Result of comparing an example payload with a schema declaration.
///
/// Both directions are always computed, so one failing does not hide the other.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ParityReport {
    /// Documented payload fields the schema does not declare.
    pub payload_not_in_schema: FieldSet,
    /// Schema properties the full payload never uses.
    pub schema_not_in_payload: FieldSet,
}

impl ParityReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.payload_not_in_schema.is_empty() && self.schema_not_in_payload.is_empty()
    }

    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let mut lines = Vec::new();
        if !self.payload_not_in_schema.is_empty() {
            lines.push(format!(
                "Json payload fields missing in Schema {}",
                self.payload_not_in_schema
            ));
        }
        if !self.schema_not_in_payload.is_empty() {
            lines.push(format!(
                "Json schema fields missing in Payload {}",
                self.schema_not_in_payload
            ));
        }
        lines.join("\n")
    }

    /// # Panics
    ///
    /// Panics when either direction found names missing on the other side.
    pub fn assert_ok(&self) {
        assert!(self.is_ok(), "{}", self.format_human_readable());
    }
}
