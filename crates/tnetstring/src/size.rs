//! Exact encoded size of a [`Value`], computed without building the output.

use crate::encoder::format_float;
use crate::value::Value;

/// Number of bytes [`encode`](crate::encode) produces for `value`.
///
/// # Example
///
/// ```
/// use tnetstring::{encode, encoded_len, Value};
///
/// let v = Value::from(vec![Value::from("a"), Value::integer(10)]);
/// assert_eq!(encoded_len(&v), encode(&v).len());
/// ```
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Boolean(true) => 7,
        Value::Boolean(false) => 8,
        Value::Null => 3,
        _ => framed(payload_len(value)),
    }
}

fn payload_len(value: &Value) -> usize {
    match value {
        Value::String(b) => b.len(),
        Value::Integer(n) => n.to_string().len(),
        Value::Float(f) => format_float(*f).len(),
        Value::Boolean(true) => 4,
        Value::Boolean(false) => 5,
        Value::Null => 0,
        Value::Array(items) => items.iter().map(encoded_len).sum(),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, val)| framed(key.len()) + encoded_len(val))
            .sum(),
    }
}

/// Length prefix, separator, payload and tag.
pub(crate) fn framed(payload: usize) -> usize {
    decimal_digits(payload) + 1 + payload + 1
}

fn decimal_digits(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
