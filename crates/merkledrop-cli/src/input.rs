//! # Record Input
//!
//! Record files are JSON in one of two shapes:
//!
//! - an array of records: `[{"address": "0x…", "amount": "…"}, …]`
//! - an object wrapping that array under `participants`, `recipients`, or
//!   `records`: `{"participants": [{"index": 0, "address": "0x…"}, …]}`
//!
//! A bare string element is shorthand for `{"address": "<string>"}`, so a
//! plain participant list works with the `addresses` schema.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use merkledrop_core::Record;

/// Keys under which a wrapped record array may appear, in lookup order.
pub const RECORD_KEYS: [&str; 3] = ["participants", "recipients", "records"];

/// Load records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        bail!("input file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))?;
    let records = records_from_value(value)
        .with_context(|| format!("unexpected record layout: {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Extract the record list from a parsed input document.
pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = RECORD_KEYS
                .iter()
                .find(|k| matches!(map.get(**k), Some(Value::Array(_))));
            match key.and_then(|k| map.remove(*k)) {
                Some(Value::Array(items)) => items,
                _ => bail!(
                    "expected an array under one of {}",
                    RECORD_KEYS.join(", ")
                ),
            }
        }
        _ => bail!("expected a JSON array of records"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| record_from_value(item).with_context(|| format!("record #{i}")))
        .collect()
}

/// Interpret one JSON value as a record.
pub fn record_from_value(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(address) => {
            let mut map = Record::new();
            map.insert("address".to_string(), Value::String(address));
            Ok(map)
        }
        Value::Null => bail!("expected a record object, got null"),
        Value::Bool(_) => bail!("expected a record object, got a boolean"),
        Value::Number(_) => bail!("expected a record object, got a number"),
        Value::Array(_) => bail!("expected a record object, got an array"),
    }
}
