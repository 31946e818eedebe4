//! Oracle configuration.
//!
//! Expected diagnostics are message fragments, matched case-insensitively as
//! substrings of the processor's rejection text. The defaults follow the
//! wording of the intake validator; [`Diagnostics::jsonschema`] matches the
//! messages produced by the `jsonschema` crate.

use crate::set::FieldSet;

/// Identity fields every intake payload must carry.
pub const BASELINE_REQUIRED: &[&str] = &[
    "service",
    "service.name",
    "service.agent",
    "service.agent.name",
    "service.agent.version",
    "service.language.name",
    "service.runtime.name",
    "service.runtime.version",
    "service.framework.name",
    "service.framework.version",
    "process.pid",
];

/// Length ceiling shared by every keyword-indexed field.
pub const KEYWORD_MAX_LENGTH: usize = 1024;

/// Expected rejection fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Diagnostics {
    /// Reported when a required key is missing. `{key}` is replaced with the
    /// leaf segment of the deleted path.
    pub missing_property: String,
    /// Reported when a required key is `null`.
    pub null_rejected: String,
    /// Reported when a keyword value exceeds the length ceiling.
    pub max_length: String,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            missing_property: "missing properties: \"{key}\"".to_owned(),
            null_rejected: "but got null".to_owned(),
            max_length: "maxlength".to_owned(),
        }
    }
}

impl Diagnostics {
    /// Fragments emitted by the `jsonschema` crate.
    #[must_use]
    pub fn jsonschema() -> Self {
        Self {
            missing_property: "\"{key}\" is a required property".to_owned(),
            null_rejected: "null is not of type".to_owned(),
            max_length: "is longer than".to_owned(),
        }
    }

    #[must_use]
    pub fn missing_property_for(&self, key: &str) -> String {
        self.missing_property.replace("{key}", key)
    }
}

/// Settings shared by all oracles of a [`ProcessorSetup`](crate::ProcessorSetup).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OracleConfig {
    /// Always-required fields, merged with the caller's required set.
    pub baseline_required: FieldSet,
    /// Maximum accepted length of keyword fields, in characters.
    pub keyword_max_length: usize,
    pub diagnostics: Diagnostics,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            baseline_required: BASELINE_REQUIRED.iter().copied().collect(),
            keyword_max_length: KEYWORD_MAX_LENGTH,
            diagnostics: Diagnostics::default(),
        }
    }
}
