//! Counter service response body
//!
//! The service reports a key's value under `count` or `value` depending on the
//! endpoint and version. `count` wins when both are usable, a missing or
//! unusable field falls through to the next, and the final default is 0.
//! Only a JSON object can carry the fields; any other JSON body reads as 0.

use serde_json::Value;

use super::trait_def::CounterResult;

#[derive(Debug, Default)]
pub struct CountPayload {
    count: Option<Value>,
    value: Option<Value>,
}

impl CountPayload {
    /// Decode a response body. Fails only when the bytes are not JSON.
    pub fn from_slice(body: &[u8]) -> CounterResult<Self> {
        let payload = match serde_json::from_slice::<Value>(body)? {
            Value::Object(mut fields) => Self {
                count: fields.remove("count"),
                value: fields.remove("value"),
            },
            _ => Self::default(),
        };
        Ok(payload)
    }

    /// Resolved count, never negative
    pub fn count(&self) -> u64 {
        self.count
            .as_ref()
            .and_then(coerce_count)
            .or_else(|| self.value.as_ref().and_then(coerce_count))
            .unwrap_or(0)
    }
}

fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.max(0.0) as u64)
            }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(body: &str) -> u64 {
        CountPayload::from_slice(body.as_bytes()).unwrap().count()
    }

    #[test]
    fn test_prefers_count_field() {
        assert_eq!(count_of(r#"{"count": 12, "value": 3}"#), 12);
    }

    #[test]
    fn test_falls_back_to_value_field() {
        assert_eq!(count_of(r#"{"value": 7}"#), 7);
        assert_eq!(count_of(r#"{"count": null, "value": 7}"#), 7);
    }

    #[test]
    fn test_defaults_to_zero_when_both_absent() {
        assert_eq!(count_of(r#"{}"#), 0);
        assert_eq!(count_of(r#"{"id": 4, "name": "visits"}"#), 0);
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        assert_eq!(count_of(r#"{"count": -5}"#), 0);
        assert_eq!(count_of(r#"{"count": -2.5}"#), 0);
    }

    #[test]
    fn test_numeric_strings_and_floats_are_coerced() {
        assert_eq!(count_of(r#"{"count": "42"}"#), 42);
        assert_eq!(count_of(r#"{"value": 9.0}"#), 9);
    }

    #[test]
    fn test_unusable_count_falls_through_to_value() {
        assert_eq!(count_of(r#"{"count": "n/a", "value": 3}"#), 3);
        assert_eq!(count_of(r#"{"count": {"total": 1}}"#), 0);
    }

    #[test]
    fn test_non_object_bodies_read_as_zero() {
        assert_eq!(count_of("[7]"), 0);
        assert_eq!(count_of("[null, 3]"), 0);
        assert_eq!(count_of("5"), 0);
        assert_eq!(count_of(r#""x""#), 0);
        assert_eq!(count_of("true"), 0);
        assert_eq!(count_of("null"), 0);
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        assert!(CountPayload::from_slice(b"<html>bad gateway</html>").is_err());
    }
}
