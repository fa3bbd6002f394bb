//! Submission payload assembly

use serde_json::json;

use crate::domain::{FormSchema, FormValues, SubmissionError, SubmissionPayload};

/// Combine a schema and the current values into a submission payload.
///
/// Iterates the schema's fields in their declared order and emits
/// `{value, meta}` for every field exactly once; fields the user never
/// touched submit the empty string. Fails only when no schema is active.
pub fn build(
    schema: Option<&FormSchema>,
    values: &FormValues,
) -> Result<SubmissionPayload, SubmissionError> {
    let schema = schema.ok_or(SubmissionError::NoActiveSchema)?;

    let mut payload = SubmissionPayload::new();
    for field in &schema.fields {
        let value = values.get(&field.name).cloned().unwrap_or_default();
        payload.insert(
            field.name.clone(),
            json!({
                "value": value,
                "meta": field.meta,
            }),
        );
    }

    Ok(payload)
}
