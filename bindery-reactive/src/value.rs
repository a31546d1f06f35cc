//! Values stored in observed records
//!
//! A [`Value`] is either a primitive or a handle to an observed [`Record`].
//! Converting plain JSON into a `Value` observes it deeply: every nested
//! object (and array) becomes a `Record` with its own per-key cells.

use crate::record::Record;
use serde_json::Value as JsonValue;
use std::fmt;

/// A primitive or an observed record
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Record(Record),
}

impl Value {
    /// Identity comparison used by the write path.
    ///
    /// Primitives compare by value (so `NaN` never equals itself), records by
    /// handle. Two structurally equal records are still different values.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Record(_) => "record",
        }
    }

    /// Convert back to plain JSON without registering any reads
    pub fn to_plain(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Record(record) => record.to_plain(),
        }
    }
}

fn number_to_json(n: f64) -> JsonValue {
    if is_integral(n) {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

/// Display form painted into markup: null is empty, integral numbers have
/// no fraction, records print as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Record(record) => write!(f, "{}", record.to_plain()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl From<JsonValue> for Value {
    fn from(plain: JsonValue) -> Self {
        match plain {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Object(map) => Value::Record(Record::from_plain(map)),
            JsonValue::Array(items) => Value::Record(Record::from_items(items)),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_numbers_like_markup_text() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(5.0).to_string(), "5");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_display_other_values() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("<b>hi</b>").to_string(), "<b>hi</b>");
        assert_eq!(Value::from(json!({"a": 1})).to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn test_identity_of_primitives() {
        assert!(Value::from(3).same(&Value::from(3.0)));
        assert!(!Value::from(3).same(&Value::from("3")));
        assert!(!Value::Number(f64::NAN).same(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_identity_of_records_is_by_handle() {
        let a = Value::from(json!({"name": "a"}));
        let b = Value::from(json!({"name": "a"}));

        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn test_arrays_become_indexed_records() {
        let value = Value::from(json!(["x", "y"]));
        let record = value.as_record().unwrap();

        assert_eq!(record.keys(), vec!["0".to_string(), "1".to_string()]);
        assert_eq!(record.get("1").unwrap(), Value::from("y"));
    }

    #[test]
    fn test_to_plain_round_trips_integers() {
        let value = Value::from(json!({"count": 2, "ratio": 0.25, "tags": null}));
        assert_eq!(value.to_plain(), json!({"count": 2, "ratio": 0.25, "tags": null}));
    }
}
