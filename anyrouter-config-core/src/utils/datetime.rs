//! Datetime serialization/deserialization helpers.
//!
//! The persisted envelope stores `savedAt` as epoch milliseconds:
//! - Serialization: `Option<DateTime<Utc>>` -> integer milliseconds or `null`
//! - Deserialization: milliseconds, seconds, RFC3339 string, or `null` -> `Option<DateTime<Utc>>`
//!
//! Unreadable values degrade to `None` instead of failing the whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Serializes `Option<DateTime<Utc>>` as epoch milliseconds or `null`.
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.timestamp_millis()),
        None => serializer.serialize_none(),
    }
}

/// Deserializes `Option<DateTime<Utc>>` leniently; malformed input yields `None`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(from_value))
}

/// Reads a timestamp out of an arbitrary JSON value.
///
/// Accepts integers (seconds or milliseconds, auto-detected), floats and RFC3339 strings.
/// Zero, `false`, empty strings and `null` count as "never saved".
pub fn from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(ts) = n.as_i64() {
                parse_unix_timestamp(ts)
            } else if let Some(ts) = n.as_u64() {
                // The `cast_signed` method explicitly performs a wrapping cast from u64 to i64.
                // This is safe for timestamps, which are not expected to exceed i64::MAX.
                parse_unix_timestamp(ts.cast_signed())
            } else {
                #[allow(clippy::cast_possible_truncation)]
                let ts = n.as_f64().map(|f| f as i64);
                ts.and_then(parse_unix_timestamp)
            }
        }
        Value::String(s) if !s.is_empty() => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Parses a Unix timestamp with second/millisecond auto-detection.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts <= 0 {
        return None;
    }
    // Values larger than 10^11 are interpreted as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
