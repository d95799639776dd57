//! Parse-or-default helpers shared by every raw-record field of the same
//! semantic type.
//!
//! None of these functions fail: absent, `null`, or malformed input collapses
//! to the sentinel for that type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Sentinel stored in `Issue::number` when the source value is not an integer.
pub const UNKNOWN_NUMBER: i64 = -1;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Look up `key` on a raw record, treating non-objects as empty records.
pub(crate) fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.as_object()?.get(key).filter(|v| !v.is_null())
}

/// Coerce a scalar to text. Strings pass through, numbers and booleans are
/// rendered; everything else is unset.
pub fn string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse an ISO-8601-like timestamp.
///
/// Accepts RFC 3339 with an offset, naive date-times (interpreted as UTC) with
/// either a `T` or a space separator, and bare dates (midnight UTC).
pub fn date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let s = value?.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an integer, falling back to [`UNKNOWN_NUMBER`].
#[allow(clippy::cast_possible_truncation)]
pub fn number(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < 9.2e18)
                    .map(|f| f.trunc() as i64)
            })
            .unwrap_or(UNKNOWN_NUMBER),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(UNKNOWN_NUMBER),
        _ => UNKNOWN_NUMBER,
    }
}

/// Elements of a raw array, or nothing when the value is not an array.
pub(crate) fn elements(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn number_accepts_strings_and_integers() {
        assert_eq!(number(Some(&json!("42"))), 42);
        assert_eq!(number(Some(&json!(" 7 "))), 7);
        assert_eq!(number(Some(&json!(42))), 42);
        assert_eq!(number(Some(&json!(12.9))), 12);
    }

    #[test]
    fn number_falls_back_to_sentinel() {
        assert_eq!(number(Some(&json!("not-a-number"))), UNKNOWN_NUMBER);
        assert_eq!(number(Some(&json!([1]))), UNKNOWN_NUMBER);
        assert_eq!(number(Some(&json!(true))), UNKNOWN_NUMBER);
        assert_eq!(number(None), UNKNOWN_NUMBER);
    }

    #[test]
    fn date_accepts_offset_naive_and_bare_forms() {
        let z = date(Some(&json!("2020-01-01T00:00:00Z"))).unwrap();
        assert_eq!((z.year(), z.month(), z.day()), (2020, 1, 1));

        let offset = date(Some(&json!("2020-01-01T02:00:00+02:00"))).unwrap();
        assert_eq!(offset, z);

        let naive = date(Some(&json!("2025-01-01T12:00:00"))).unwrap();
        assert_eq!(naive.hour(), 12);

        let spaced = date(Some(&json!("2025-01-01 12:00:00.250"))).unwrap();
        assert_eq!(spaced.timestamp_subsec_millis(), 250);

        let bare = date(Some(&json!("2025-03-04"))).unwrap();
        assert_eq!((bare.month(), bare.day(), bare.hour()), (3, 4, 0));
    }

    #[test]
    fn date_swallows_garbage() {
        assert!(date(Some(&json!("garbage-date-string"))).is_none());
        assert!(date(Some(&json!(""))).is_none());
        assert!(date(Some(&json!(1_577_836_800))).is_none());
        assert!(date(None).is_none());
    }

    #[test]
    fn string_renders_scalars_only() {
        assert_eq!(string(Some(&json!("x"))).as_deref(), Some("x"));
        assert_eq!(string(Some(&json!(3))).as_deref(), Some("3"));
        assert_eq!(string(Some(&json!(false))).as_deref(), Some("false"));
        assert!(string(Some(&json!({"a": 1}))).is_none());
    }

    #[test]
    fn field_ignores_null_and_non_objects() {
        assert!(field(&json!({"a": null}), "a").is_none());
        assert!(field(&json!([1, 2]), "a").is_none());
        assert_eq!(field(&json!({"a": 1}), "a"), Some(&json!(1)));
    }
}
