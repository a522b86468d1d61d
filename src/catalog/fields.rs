//! Typed accessors over loosely-shaped JSON payloads
//!
//! The catalog API is inconsistent about types: counters arrive as numbers or
//! numeric strings, optional blocks may be `null`, objects, or missing. Every
//! read in the catalog code goes through these helpers, which check the type
//! and hand back either a typed value or a defined default.

use serde_json::{Map, Value};

/// A JSON object, the only shape the catalog code ever descends into
pub type Object = Map<String, Value>;

/// Returns `value[key]` when `value` is an object holding that key
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|object| object.get(key))
}

/// Returns `value[key]` when it is itself an object
pub fn object_field<'a>(value: &'a Value, key: &str) -> Option<&'a Object> {
    field(value, key).and_then(Value::as_object)
}

/// Returns `value[key]` when it is a string
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    field(value, key).and_then(Value::as_str)
}

/// String coercion: strings pass through, numbers are formatted
///
/// Everything else (including `null`, booleans, arrays and objects) has no
/// string form and yields `None`.
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`coerce_string`], but an absent value becomes the empty string
pub fn string_or_empty(value: Option<&Value>) -> String {
    coerce_string(value).unwrap_or_default()
}

/// Numeric coercion: numbers pass through, numeric strings are parsed
pub fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Unsigned integer coercion for page counters
///
/// Accepts non-negative integers, integral floats and numeric strings.
/// Negative or fractional values have no counter meaning and yield `None`.
pub fn coerce_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Stock count coercion: never fails, never negative
///
/// Numbers truncate toward zero, numeric strings parse (integer first, then
/// decimal truncated), anything else counts as zero.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    let count = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };

    count.map_or(0, |c| c.max(0) as u64)
}

/// Truthiness of a JSON value
///
/// `null`, `false`, zero, empty strings, empty arrays and empty objects are
/// falsy. Everything else is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(object)) => !object.is_empty(),
    }
}

/// Evaluates named candidates in order and returns the first present value
///
/// Used for the fallback chains where the API may put the same datum in one
/// of several places. Returns the winning candidate's name alongside the value.
pub fn first_present<S, T, F>(
    source: &S,
    candidates: &[(&'static str, F)],
) -> Option<(&'static str, T)>
where
    F: Fn(&S) -> Option<T>,
{
    candidates
        .iter()
        .find_map(|(name, extract)| extract(source).map(|value| (*name, value)))
}
