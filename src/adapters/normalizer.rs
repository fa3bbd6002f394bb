//! Schema normalization
//!
//! Generation backends return form schemas in several shapes: the
//! canonical object, the schema JSON-encoded inside a `raw_output`
//! string, or the whole body as a JSON string. Each shape is handled by
//! one [`DecodeStrategy`]; strategies are consulted in a fixed priority
//! order and the first one to claim the input decides the outcome. The
//! canonical shape always wins over reinterpretation, and each strategy
//! runs at most once per call.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::{FormSchema, NormalizeError};

/// Attribute under which backends commonly embed model output as text.
const WRAPPED_OUTPUT_KEY: &str = "raw_output";

/// One way of reading a raw backend response as a form schema.
///
/// `decode` returns `None` to decline the input (the next strategy is
/// consulted) or `Some(result)` to claim it, ending the chain whether
/// the result is a schema or an error.
trait DecodeStrategy {
    fn name(&self) -> &'static str;
    fn decode(&self, raw: &Value) -> Option<Result<FormSchema, NormalizeError>>;
}

/// The response is already a schema object with a `fields` array.
struct Canonical;

impl DecodeStrategy for Canonical {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn decode(&self, raw: &Value) -> Option<Result<FormSchema, NormalizeError>> {
        if !raw.get("fields")?.is_array() {
            return None;
        }
        Some(parse_schema(raw))
    }
}

/// The schema is JSON-encoded inside a string attribute.
struct WrappedText;

impl DecodeStrategy for WrappedText {
    fn name(&self) -> &'static str {
        "wrapped_text"
    }

    fn decode(&self, raw: &Value) -> Option<Result<FormSchema, NormalizeError>> {
        let text = raw.get(WRAPPED_OUTPUT_KEY)?.as_str()?;
        Some(decode_embedded(text))
    }
}

/// The whole response body is a JSON string that decodes to one of the
/// other shapes.
struct EncodedRoot;

impl DecodeStrategy for EncodedRoot {
    fn name(&self) -> &'static str {
        "encoded_root"
    }

    fn decode(&self, raw: &Value) -> Option<Result<FormSchema, NormalizeError>> {
        let text = raw.as_str()?;
        let decoded: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(_) => {
                return Some(Err(NormalizeError::EmbeddedPayloadUnparseable {
                    raw: text.to_string(),
                }))
            }
        };
        // The decoded body may itself be canonical or wrapped.
        if let Some(result) = Canonical.decode(&decoded) {
            return Some(result);
        }
        if let Some(result) = WrappedText.decode(&decoded) {
            return Some(result);
        }
        Some(Err(NormalizeError::Unrecognized { raw: decoded }))
    }
}

/// Interpret a raw backend response as a [`FormSchema`].
///
/// Total over all JSON inputs: every path terminates in either a schema
/// or a [`NormalizeError`], never a panic.
pub fn normalize(raw: &Value) -> Result<FormSchema, NormalizeError> {
    let strategies: [&dyn DecodeStrategy; 3] = [&Canonical, &WrappedText, &EncodedRoot];

    for strategy in strategies {
        if let Some(result) = strategy.decode(raw) {
            debug!(strategy = strategy.name(), ok = result.is_ok(), "decode strategy claimed response");
            return result;
        }
    }

    Err(NormalizeError::Unrecognized { raw: raw.clone() })
}

/// Decode an embedded JSON string and apply the canonical interpretation
/// to the result.
fn decode_embedded(text: &str) -> Result<FormSchema, NormalizeError> {
    let decoded: Value =
        serde_json::from_str(text).map_err(|_| NormalizeError::EmbeddedPayloadUnparseable {
            raw: text.to_string(),
        })?;

    match Canonical.decode(&decoded) {
        Some(result) => result,
        None => Err(NormalizeError::Unrecognized { raw: decoded }),
    }
}

/// Deserialize a claimed canonical value and validate its field names:
/// every name must be non-empty, and names must be pairwise distinct. A
/// duplicate is a hard failure, never a silent overwrite.
fn parse_schema(raw: &Value) -> Result<FormSchema, NormalizeError> {
    let schema: FormSchema =
        serde_json::from_value(raw.clone()).map_err(|e| NormalizeError::InvalidField {
            detail: e.to_string(),
            raw: raw.clone(),
        })?;

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.is_empty() {
            return Err(NormalizeError::InvalidField {
                detail: "field name must be a non-empty string".to_string(),
                raw: raw.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(NormalizeError::DuplicateField {
                name: field.name.clone(),
                raw: raw.clone(),
            });
        }
    }

    Ok(schema)
}
