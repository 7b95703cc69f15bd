//! Forgiving serde decoders for persisted documents.
//!
//! Documents come from the remote store and the local mirror, both of which
//! may hold data written by older clients. Every numeric field goes through
//! these helpers so that garbage coerces to a default instead of failing the
//! whole document.

use crate::model::types::DayLog;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a finite number.
///
/// Numeric strings ("300", " 12.5 ") are accepted; everything else is `None`.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Decode a number, treating anything malformed as zero.
pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number).unwrap_or(0.0))
}

/// Decode a nested document, falling back to its default when malformed.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Decode a string, treating anything that is not a string as empty.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// Decode a stored log collection one element at a time.
///
/// `None` when `value` is not an array. Elements that are not objects are
/// skipped with a warning; the rest decode leniently and are kept.
pub(crate) fn log_collection(value: Value) -> Option<Vec<DayLog>> {
    let Value::Array(items) = value else {
        return None;
    };

    let total = items.len();
    let logs: Vec<DayLog> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::warn!(index, "Skipping day-log that is not an object");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(log) => Some(log),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed day-log");
                    None
                }
            }
        })
        .collect();

    if logs.len() < total {
        tracing::warn!(kept = logs.len(), total, "Dropped malformed day-logs");
    }
    Some(logs)
}
