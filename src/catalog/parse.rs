use serde_json::Value;
use tracing::warn;

use crate::catalog::source::{CatalogFormat, RawCatalog, SourceError};
use crate::types::ToolRecord;

/// Records decoded from one catalog document.
#[derive(Debug, Clone, Default)]
pub struct DecodedCatalog {
    pub records: Vec<ToolRecord>,
    /// Entries dropped because they could not be decoded or failed validation.
    pub skipped: usize,
}

/// Decode a raw catalog into records.
///
/// Accepted shapes are a bare array of records or an object with a `tools`
/// array. A malformed entry is skipped and logged; it never fails the whole
/// document.
pub fn decode_catalog(raw: &RawCatalog) -> Result<DecodedCatalog, SourceError> {
    let document: Value = match raw.format {
        CatalogFormat::Json => serde_json::from_slice(&raw.bytes)?,
        CatalogFormat::Yaml => serde_yaml::from_slice(&raw.bytes)?,
    };

    let entries = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tools") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SourceError::Shape(format!(
                    "`tools` must be an array, found {}",
                    kind_of(&other)
                )))
            }
            None => return Err(SourceError::Shape("object without a `tools` array".into())),
        },
        other => {
            return Err(SourceError::Shape(format!(
                "expected an array of tools, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut decoded = DecodedCatalog {
        records: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for (position, entry) in entries.into_iter().enumerate() {
        let label = entry
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let record = match serde_json::from_value::<ToolRecord>(entry) {
            Ok(record) => record,
            Err(err) => {
                warn!(position, id = %label, error = %err, "skipping undecodable tool record");
                decoded.skipped += 1;
                continue;
            }
        };

        if let Err(err) = record.validate() {
            warn!(position, id = %label, error = %err, "skipping invalid tool record");
            decoded.skipped += 1;
            continue;
        }

        decoded.records.push(record);
    }

    Ok(decoded)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
