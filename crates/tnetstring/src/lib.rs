//! Tagged netstring (TNetstring) codec.
//!
//! A tagged netstring is a length-prefixed byte span followed by a one-byte
//! type tag:
//!
//! ```text
//! payload := (SIZE ':' DATA TAG)*
//! SIZE    := [0-9]{1,9}
//! DATA    := raw bytes of length SIZE
//! TAG     := one of , # ^ ! ~ ] }
//! ```
//!
//! Because every length is declared up front there is no escaping, and a
//! reader can refuse an oversized element before reading its payload.
//!
//! # Example
//!
//! ```
//! use tnetstring::{decode, encode, Value};
//!
//! let (value, rest) = decode(b"35:2:hi,8:1:a,1:b,]5:there,8:1:c,1:d,]}").unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(value.field("there").map(Value::len), Some(2));
//!
//! let mut list = Value::array();
//! list.push(Value::integer(1));
//! list.push(Value::from("two"));
//! assert_eq!(encode(&list), b"10:1:1#3:two,]");
//! ```

pub mod cli;
pub mod decoder;
pub mod encoder;
pub mod error;
mod json;
pub mod size;
pub mod value;

pub use decoder::{Decoder, Values, DEFAULT_MAX_DEPTH, MAX_LENGTH_DIGITS};
pub use encoder::Encoder;
pub use error::{DecodeError, ValueError};
pub use size::encoded_len;
pub use value::{Field, Kind, Value};

/// Decode one value from the front of `input` with the default [`Decoder`].
///
/// Returns the value and the unconsumed remainder of `input`.
pub fn decode(input: &[u8]) -> Result<(Value, &[u8]), DecodeError> {
    Decoder::new().decode(input)
}

/// Decode every value in `input` with the default [`Decoder`].
pub fn decode_all(input: &[u8]) -> Result<Vec<Value>, DecodeError> {
    Decoder::new().decode_all(input)
}

/// Canonical encoding of `value`.
///
/// Never fails. Payloads of a billion bytes or more get a length prefix
/// longer than nine digits, which decoders reject.
pub fn encode(value: &Value) -> Vec<u8> {
    Encoder::new().encode(value)
}
