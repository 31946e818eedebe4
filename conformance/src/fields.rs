//! Storage-layer field definitions (`fields.yml` templates).
//!
//! Templates list fields the way the storage index declares them: nested
//! `group`s with child `fields`, each field carrying a storage `type` and
//! optional `multi_fields` (the same value indexed a second way).

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::HarnessError;
use crate::loader::PayloadLoader;
use crate::set::FieldSet;
use crate::tree::join_key;

const KEYWORD: &str = "keyword";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub object_type: String,
    pub multi_fields: Vec<FieldDescriptor>,
    pub fields: Vec<FieldDescriptor>,
}

/// Whether a field is indexed as a keyword, directly or via a multi-field.
#[must_use]
pub fn is_keyword_field(field: &FieldDescriptor) -> bool {
    field.field_type == KEYWORD
        || field.object_type == KEYWORD
        || field.multi_fields.iter().any(|mf| mf.field_type == KEYWORD)
}

/// Add the dotted names of `fields` (and their nested fields) accepted by
/// `include` to `out`.
pub fn flatten_field_names<F>(fields: &[FieldDescriptor], prefix: &str, include: &F, out: &mut FieldSet)
where
    F: Fn(&FieldDescriptor) -> bool,
{
    for field in fields {
        let key = join_key(prefix, &field.name);
        if !key.is_empty() && include(field) {
            out.insert(key.clone());
        }
        flatten_field_names(&field.fields, &key, include, out);
    }
}

/// Load every template and collect the names of the fields accepted by `include`.
///
/// # Errors
///
/// Returns the loader's error for the first template that cannot be read.
pub fn fetch_flattened_field_names<L, F>(
    loader: &L,
    paths: &[PathBuf],
    include: &F,
) -> Result<FieldSet, HarnessError>
where
    L: PayloadLoader + ?Sized,
    F: Fn(&FieldDescriptor) -> bool,
{
    let mut out = FieldSet::new();
    for path in paths {
        let fields = loader.load_fields(path)?;
        flatten_field_names(&fields, "", include, &mut out);
    }
    Ok(out)
}
