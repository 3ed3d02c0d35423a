//! Timestamp helpers for stored documents.
//!
//! Timestamps are written as RFC 3339 strings. Reads are lenient: RFC 3339
//! strings, unix milliseconds and `{seconds, nanos}` objects are understood;
//! anything else reads as absent.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Current time as a stored timestamp value.
pub fn now_value() -> Value {
    to_value(Utc::now())
}

/// Converts a timestamp to its stored form.
pub fn to_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parses a stored timestamp, returning `None` when it is missing or unreadable.
pub fn parse(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(ms) => Utc.timestamp_millis_opt(ms.as_i64()?).single(),
        Value::Object(parts) => {
            let seconds = parts
                .get("seconds")
                .or_else(|| parts.get("_seconds"))?
                .as_i64()?;
            let nanos = parts
                .get("nanos")
                .or_else(|| parts.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, u32::try_from(nanos).ok()?).single()
        }
        _ => None,
    }
}
