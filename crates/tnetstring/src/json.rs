//! Conversions between [`Value`] and [`serde_json::Value`].
//!
//! TNetstring strings are raw bytes while JSON strings are UTF-8, so the
//! direction into JSON is lossy for invalid UTF-8 (replacement characters)
//! and for non-finite floats (mapped to `null`).

use serde_json::{Map, Number};

use crate::value::Value;

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.into_bytes()),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.into_bytes(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Render as a JSON value.
    ///
    /// Duplicate object keys collapse to the last occurrence.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(b) => serde_json::Value::String(lossy(b)),
            Value::Integer(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Null => serde_json::Value::Null,
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (key, val) in fields {
                    map.insert(lossy(key), val.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        v.to_json()
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let v = Value::from(json!({"a": [1, 2.5, "x"], "b": null, "c": true}));
        let mut expected = Value::object();
        expected.push_field(
            "a",
            vec![Value::integer(1), Value::float(2.5), Value::from("x")].into(),
        );
        expected.push_field("b", Value::null());
        expected.push_field("c", Value::boolean(true));
        assert_eq!(v, expected);
    }

    #[test]
    fn test_to_json() {
        let mut obj = Value::object();
        obj.push_field("s", Value::from("hi"));
        obj.push_field("n", Value::integer(-4));
        obj.push_field("f", Value::float(0.5));
        obj.push_field("nan", Value::float(f64::NAN));
        obj.push_field("bin", Value::string(vec![0xff, b'a']));
        obj.push_field("list", vec![Value::null(), Value::boolean(false)].into());
        assert_eq!(
            obj.to_json(),
            json!({
                "s": "hi",
                "n": -4,
                "f": 0.5,
                "nan": null,
                "bin": "\u{fffd}a",
                "list": [null, false]
            })
        );
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let mut obj = Value::object();
        obj.push_field("k", Value::integer(1));
        obj.push_field("k", Value::integer(2));
        assert_eq!(serde_json::Value::from(&obj), json!({"k": 2}));
    }
}
