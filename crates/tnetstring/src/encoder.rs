//! `Encoder` — renders a [`Value`] into its canonical tagged netstring bytes.
//!
//! Wire format, one element per value:
//! - String:  `<len>:<bytes>,`     e.g. `5:hello,`
//! - Integer: `<len>:<decimal>#`   e.g. `2:42#`
//! - Float:   `<len>:<decimal>^`   e.g. `3:1.5^`
//! - Boolean: `4:true!` / `5:false!`
//! - Null:    `0:~`
//! - Array:   `<len>:<elements>]`
//! - Object:  `<len>:<key><value>...}` with every key encoded as a string
//!
//! There are no options: each value has exactly one encoding.

use crate::size::{encoded_len, framed};
use crate::value::{Field, Kind, Value};

/// Shortest decimal that parses back to the same `f64`, always carrying a
/// fractional part for finite values (`2.0`, never `2`).
pub(crate) fn format_float(f: f64) -> String {
    let mut s = f.to_string();
    if f.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// TNetstring encoder.
///
/// Container lengths are measured in one pass before any byte is written,
/// so each length prefix goes out ahead of its payload and encoding stays
/// linear in the output size.
///
/// # Example
///
/// ```
/// use tnetstring::{Encoder, Value};
///
/// let mut encoder = Encoder::new();
/// let arr = Value::from(vec![Value::integer(1), Value::integer(2)]);
/// assert_eq!(encoder.encode(&arr), b"8:1:1#1:2#]");
/// ```
#[derive(Default)]
pub struct Encoder {
    buf: Vec<u8>,
    /// Payload length of every container, in pre-order.
    sizes: Vec<usize>,
    next_size: usize,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `value` and return the bytes.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.buf.clear();
        self.write_any(value);
        std::mem::take(&mut self.buf)
    }

    /// Append the encoding of `value` to the buffer.
    pub fn write_any(&mut self, value: &Value) {
        self.sizes.clear();
        self.next_size = 0;
        let total = self.measure(value);
        self.buf.reserve(total);
        self.write_value(value);
    }

    pub fn write_str(&mut self, bytes: &[u8]) {
        self.write_netstring(bytes, Kind::String);
    }

    pub fn write_integer(&mut self, n: i64) {
        self.write_netstring(n.to_string().as_bytes(), Kind::Integer);
    }

    pub fn write_float(&mut self, f: f64) {
        self.write_netstring(format_float(f).as_bytes(), Kind::Float);
    }

    pub fn write_boolean(&mut self, b: bool) {
        let lit: &[u8] = if b { b"true" } else { b"false" };
        self.write_netstring(lit, Kind::Boolean);
    }

    pub fn write_null(&mut self) {
        self.write_netstring(b"", Kind::Null);
    }

    /// Record container payload lengths and return the encoded length of
    /// `value`.
    fn measure(&mut self, value: &Value) -> usize {
        match value {
            Value::Array(items) => {
                let slot = self.sizes.len();
                self.sizes.push(0);
                let payload = items.iter().map(|item| self.measure(item)).sum();
                self.sizes[slot] = payload;
                framed(payload)
            }
            Value::Object(fields) => {
                let slot = self.sizes.len();
                self.sizes.push(0);
                let payload = fields
                    .iter()
                    .map(|(key, val)| framed(key.len()) + self.measure(val))
                    .sum();
                self.sizes[slot] = payload;
                framed(payload)
            }
            scalar => encoded_len(scalar),
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::String(b) => self.write_str(b),
            Value::Integer(n) => self.write_integer(*n),
            Value::Float(f) => self.write_float(*f),
            Value::Boolean(b) => self.write_boolean(*b),
            Value::Null => self.write_null(),
            Value::Array(items) => self.write_arr(items),
            Value::Object(fields) => self.write_obj(fields),
        }
    }

    fn write_arr(&mut self, items: &[Value]) {
        self.write_prefix();
        for item in items {
            self.write_value(item);
        }
        self.buf.push(Kind::Array.tag());
    }

    fn write_obj(&mut self, fields: &[Field]) {
        self.write_prefix();
        for (key, val) in fields {
            self.write_str(key);
            self.write_value(val);
        }
        self.buf.push(Kind::Object.tag());
    }

    /// Write the measured length of the next container.
    fn write_prefix(&mut self) {
        let len = self.sizes[self.next_size];
        self.next_size += 1;
        self.buf.extend_from_slice(len.to_string().as_bytes());
        self.buf.push(b':');
    }

    fn write_netstring(&mut self, payload: &[u8], kind: Kind) {
        self.buf.extend_from_slice(payload.len().to_string().as_bytes());
        self.buf.push(b':');
        self.buf.extend_from_slice(payload);
        self.buf.push(kind.tag());
    }
}
