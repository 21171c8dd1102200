//! Conversions between this crate's own [`JsonValue`] and
//! [`serde_json::Value`], for callers who already have a Serde JSON based
//! pipeline downstream and would rather not carry two value types.
//!
//! Heads up: you need to enable the `serde_json` feature for this module.

use serde_json::{Map, Number, Value};

use crate::value::JsonValue;

/// An error converting a [`serde_json::Value`] into a [`JsonValue`]. The only
/// way this can happen is a float that Serde JSON parsed but that does not
/// fit in an `f64` (e.g. an arbitrary-precision number parsed with the
/// `arbitrary_precision` feature enabled upstream).
#[derive(Debug, Clone, PartialEq)]
pub struct NotRepresentable;

impl std::fmt::Display for NotRepresentable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "number is not representable as i64 or f64")
    }
}

impl std::error::Error for NotRepresentable {}

/// Convert this crate's value type into a Serde JSON [`Value`].
///
/// ```
/// use arraytap::JsonValue;
/// use arraytap::serde_json::to_value;
///
/// let v = JsonValue::Array(vec![JsonValue::Int(1), JsonValue::Bool(true)]);
/// assert_eq!(to_value(&v), serde_json::json!([1, true]));
/// ```
pub fn to_value(v: &JsonValue) -> Value {
    match v {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Int(i) => Value::Number(Number::from(*i)),
        JsonValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        JsonValue::Object(pairs) => {
            let mut map = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                map.insert(k.clone(), to_value(v));
            }
            Value::Object(map)
        }
    }
}

/// Convert a Serde JSON [`Value`] into this crate's value type.
///
/// ```
/// use arraytap::serde_json::from_value;
///
/// let v = from_value(&serde_json::json!({"a": 1})).unwrap();
/// assert_eq!(v.get("a").and_then(|x| x.as_array()), None);
/// ```
pub fn from_value(v: &Value) -> Result<JsonValue, NotRepresentable> {
    Ok(match v {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                JsonValue::Float(f)
            } else {
                return Err(NotRepresentable);
            }
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_value(item)?);
            }
            JsonValue::Array(out)
        }
        Value::Object(map) => {
            let mut out = Vec::with_capacity(map.len());
            for (k, v) in map {
                out.push((k.clone(), from_value(v)?));
            }
            JsonValue::Object(out)
        }
    })
}
