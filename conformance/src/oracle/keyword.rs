//! Keyword length ceiling enforcement.
//!
//! Fields indexed as keywords in storage are truncated beyond a fixed length,
//! so intake must refuse longer values. Length counts characters, not bytes.

use serde_json::Value;
use tracing::{debug, info};

use super::{Expectation, ProcessorSetup};
use crate::condition::Condition;
use crate::config::KEYWORD_MAX_LENGTH;
use crate::error::HarnessError;
use crate::fields::{fetch_flattened_field_names, is_keyword_field};
use crate::loader::PayloadLoader;
use crate::processor::Processor;
use crate::report::OracleReport;
use crate::set::FieldSet;
use crate::tree::Mutation;

/// 64 single-byte characters used to build boundary strings.
pub const STR_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Multi-byte alphabet: each character is one logical character but several bytes.
pub const STR_WIDE_ALPHABET: &str = "\u{2318} ";

/// A string of exactly `n` characters cycling through `alphabet`
/// (`a` repeated when the alphabet is empty).
#[must_use]
pub fn create_str(n: usize, alphabet: &str) -> String {
    if alphabet.is_empty() {
        return "a".repeat(n);
    }
    alphabet.chars().cycle().take(n).collect()
}

#[must_use]
pub fn str1024() -> String {
    create_str(KEYWORD_MAX_LENGTH, STR_ALPHABET)
}

#[must_use]
pub fn str1024_special() -> String {
    create_str(KEYWORD_MAX_LENGTH, STR_WIDE_ALPHABET)
}

#[must_use]
pub fn str1025() -> String {
    create_str(KEYWORD_MAX_LENGTH + 1, STR_ALPHABET)
}

/// Rewrite a storage field name to its intake name using the first mapping
/// whose storage prefix matches.
fn translate(key: &str, template_to_schema: &[(String, String)]) -> String {
    template_to_schema
        .iter()
        .find_map(|(from, to)| key.strip_prefix(from.as_str()).map(|rest| format!("{to}{rest}")))
        .unwrap_or_else(|| key.to_owned())
}

impl<P, L> ProcessorSetup<P, L>
where
    P: Processor,
    L: PayloadLoader,
{
    /// Check that every keyword field of the storage templates has the same
    /// length limit on intake.
    ///
    /// `keyword_exception_keys` are storage names exempt from the check (for
    /// example fields whose pattern already bounds them). `template_to_schema`
    /// maps storage name prefixes to intake names for fields that are nested
    /// or named differently.
    ///
    /// For each remaining field, a value one character over the limit must be
    /// rejected; values exactly at the limit, single- and multi-byte, must be
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`HarnessError`] if a template or the payload cannot be loaded.
    pub fn keyword_limitation(
        &self,
        keyword_exception_keys: &FieldSet,
        template_to_schema: &[(String, String)],
    ) -> Result<OracleReport, HarnessError> {
        let keyword_fields =
            fetch_flattened_field_names(&self.loader, &self.template_paths, &is_keyword_field)?;
        let limit = self.config.keyword_max_length;
        let max_length = &self.config.diagnostics.max_length;

        let mut report = OracleReport::new("keyword_limitation");
        let unconditional = Condition::default();
        for field in keyword_fields.iter() {
            if keyword_exception_keys.contains(field) {
                debug!(field, "keyword exception, skipped");
                continue;
            }
            let key = translate(field, template_to_schema);

            let cases = [
                (
                    create_str(limit + 1, STR_ALPHABET),
                    Expectation::Reject(max_length.clone()),
                ),
                (create_str(limit, STR_ALPHABET), Expectation::Accept),
                (create_str(limit, STR_WIDE_ALPHABET), Expectation::Accept),
            ];
            for (value, expected) in cases {
                self.change_payload(
                    &key,
                    &Mutation::Upsert(Value::String(value)),
                    &unconditional,
                    expected,
                    &mut report,
                )?;
            }
        }

        info!(
            fields = keyword_fields.len(),
            checks = report.checks,
            mismatches = report.mismatches.len(),
            "keyword_limitation finished"
        );
        Ok(report)
    }
}

/// Build the `(from, to)` mapping list from string pairs.
#[must_use]
pub fn mapping<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(from, to)| (from.to_owned(), to.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_64_chars() {
        assert_eq!(STR_ALPHABET.chars().count(), 64);
    }

    #[test]
    fn test_create_str_counts_characters() {
        assert_eq!(str1024().chars().count(), 1024);
        assert_eq!(str1025().chars().count(), 1025);
        assert!(str1024().starts_with(STR_ALPHABET));

        let wide = str1024_special();
        assert_eq!(wide.chars().count(), 1024);
        assert!(wide.len() > 1024);
    }

    #[test]
    fn test_create_str_empty_alphabet() {
        assert_eq!(create_str(3, ""), "aaa");
        assert_eq!(create_str(0, STR_ALPHABET), "");
    }

    #[test]
    fn test_translate_first_prefix_wins() {
        let map = mapping([
            ("system.process", "process"),
            ("system", "host"),
        ]);
        assert_eq!(translate("system.process.title", &map), "process.title");
        assert_eq!(translate("system.hostname", &map), "host.hostname");
        assert_eq!(translate("service.name", &map), "service.name");
    }

    #[test]
    fn test_wide_alphabet_is_multibyte() {
        assert!(STR_WIDE_ALPHABET.len() > STR_WIDE_ALPHABET.chars().count());
    }
}
