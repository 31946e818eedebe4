//! Payload/schema parity: documentation and validation rules must agree.

use serde_json::Value;
use tracing::info;

use crate::error::HarnessError;
use crate::loader::PayloadLoader;
use crate::report::ParityReport;
use crate::schema::{Schema, schema_names};
use crate::set::FieldSet;
use crate::tree::flatten;

/// Compare the field names of `payload` with the properties `schema` declares.
///
/// `undocumented_attrs` are left out of the payload-to-schema direction only;
/// the schema-to-payload direction uses the full payload.
#[must_use]
pub fn check_parity(payload: &Value, undocumented_attrs: &FieldSet, schema: &Schema) -> ParityReport {
    let json_names = flatten(payload);
    let documented = json_names.difference(undocumented_attrs);
    let declared = schema_names(schema);

    ParityReport {
        payload_not_in_schema: documented.difference(&declared),
        schema_not_in_payload: declared.difference(&json_names),
    }
}

/// Check that the canonical valid payload `name` and the schema document
/// `schema` describe the same fields.
///
/// # Errors
///
/// Returns a [`HarnessError`] if the payload cannot be loaded or the schema
/// cannot be parsed.
pub fn payload_attributes_in_schema<L>(
    loader: &L,
    name: &str,
    undocumented_attrs: &FieldSet,
    schema: &str,
) -> Result<ParityReport, HarnessError>
where
    L: PayloadLoader + ?Sized,
{
    let payload = loader.load_valid_data(name)?;
    let schema = Schema::from_json_str(schema)?;
    let report = check_parity(&payload, undocumented_attrs, &schema);
    info!(
        name,
        payload_not_in_schema = %report.payload_not_in_schema,
        schema_not_in_payload = %report.schema_not_in_payload,
        "parity check finished"
    );
    Ok(report)
}
