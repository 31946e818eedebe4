//! # conformance
//!
//! Oracle-driven conformance checks for schema-validated JSON intake payloads.
//!
//! The crate answers one question: does a deployed validator/decoder accept
//! exactly the payload shapes its schema declares, and reject everything
//! else with the right diagnostics? It works on untyped `serde_json::Value`
//! trees addressed by dotted paths (`error.log.message`), where array
//! indices collapse so one path names a field inside every array element.
//!
//! The validator under test is consumed through the [`Processor`] trait and
//! fixtures through the [`PayloadLoader`] trait; [`FsLoader`] reads them
//! from a directory on disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//!
//! use conformance::{Condition, FieldSet, FsLoader, Processor, ProcessorSetup, Rejection};
//! use serde_json::Value;
//!
//! struct AcceptAll;
//!
//! impl Processor for AcceptAll {
//!     type Decoded = ();
//!
//!     fn validate(&self, _payload: &Value) -> Result<(), Rejection> {
//!         Ok(())
//!     }
//!
//!     fn decode(&self, _payload: &Value) -> Result<(), Rejection> {
//!         Ok(())
//!     }
//! }
//!
//! let setup = ProcessorSetup::new(AcceptAll, FsLoader::new("testdata"), "error/payload.json");
//! let required: FieldSet = ["error.id"].into_iter().collect();
//! let mut conditional = BTreeMap::new();
//! conditional.insert("error.exception".to_owned(), Condition::absent(["error.log"]));
//!
//! let report = setup.attrs_presence(&required, &conditional).unwrap();
//! report.assert_ok();
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod fields;
pub mod loader;
pub mod oracle;
pub mod processor;
pub mod report;
pub mod schema;
pub mod set;
pub mod tree;

pub use condition::{Condition, apply_condition};
pub use config::{BASELINE_REQUIRED, Diagnostics, KEYWORD_MAX_LENGTH, OracleConfig};
pub use error::HarnessError;
pub use fields::{FieldDescriptor, fetch_flattened_field_names, is_keyword_field};
pub use loader::{FsLoader, PayloadLoader};
pub use oracle::data::{Invalid, SchemaTestData};
pub use oracle::keyword::{
    STR_ALPHABET, STR_WIDE_ALPHABET, create_str, mapping, str1024, str1024_special, str1025,
};
pub use oracle::parity::{check_parity, payload_attributes_in_schema};
pub use oracle::{Expectation, Outcome, ProcessorSetup};
pub use processor::{Processor, Rejection};
pub use report::{Mismatch, OracleReport, ParityReport};
pub use schema::{Schema, flatten_schema_names, schema_names};
pub use set::FieldSet;
pub use tree::{Mutation, flatten, join_key, mutate, split_key, values_at};
