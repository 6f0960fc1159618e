//! Timestamp normalization.
//!
//! The source API reports timestamps in nanoseconds while the collector only
//! understands 13 digit epoch milliseconds. Every known timestamp field is
//! scaled down by 1,000,000; all other fields pass through untouched.

use serde_json::{Number, Value as JsonValue};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Nested objects whose start/end timestamps are rescaled.
const NESTED_TIMESTAMP_OBJECTS: &[&str] = &["cache", "edge"];
const NESTED_TIMESTAMP_FIELDS: &[&str] = &["startTimestamp", "endTimestamp"];

/// Returns a copy of `record` with its timestamp fields in milliseconds.
///
/// Absent, null and non-numeric fields are left as they are.
pub fn normalize(mut record: JsonValue) -> JsonValue {
    let Some(fields) = record.as_object_mut() else {
        return record;
    };

    rescale_field(fields, "timestamp");

    for object in NESTED_TIMESTAMP_OBJECTS {
        if let Some(nested) = fields.get_mut(*object).and_then(JsonValue::as_object_mut) {
            for field in NESTED_TIMESTAMP_FIELDS {
                rescale_field(nested, field);
            }
        }
    }

    record
}

fn rescale_field(fields: &mut serde_json::Map<String, JsonValue>, name: &str) {
    if let Some(value) = fields.get_mut(name) {
        if let Some(scaled) = nanos_to_millis(value) {
            *value = scaled;
        }
    }
}

/// Integers divisible by 1,000,000 stay integers; anything else becomes a
/// float with the fractional milliseconds preserved.
fn nanos_to_millis(value: &JsonValue) -> Option<JsonValue> {
    let JsonValue::Number(number) = value else {
        return None;
    };

    if let Some(n) = number.as_u64() {
        if n % NANOS_PER_MILLI == 0 {
            return Some(JsonValue::from(n / NANOS_PER_MILLI));
        }
    } else if let Some(n) = number.as_i64() {
        let divisor = NANOS_PER_MILLI as i64;
        if n % divisor == 0 {
            return Some(JsonValue::from(n / divisor));
        }
    }

    number
        .as_f64()
        .and_then(|n| Number::from_f64(n / NANOS_PER_MILLI as f64))
        .map(JsonValue::Number)
}
