//! `Decoder` — parses tagged netstrings into [`Value`] trees.
//!
//! Every element has the shape `<len>:<payload><tag>`. The length is read
//! first, so a decoder can reject oversized input before touching the
//! payload. Nested arrays and objects are decoded by the same routine,
//! consuming their payload one element at a time.

use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::value::{Field, Kind, Value};

/// Longest accepted length prefix, in ASCII digits.
pub const MAX_LENGTH_DIGITS: usize = 9;

/// Default limit on nested arrays and objects, same as serde_json's.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// TNetstring decoder.
///
/// The default configuration follows the format exactly, except that at
/// most [`DEFAULT_MAX_DEPTH`] arrays and objects may nest inside each other.
/// Decoding recurses once per nesting level, so the limit keeps the stack
/// bounded whatever the input. The knobs:
///
/// - [`max_depth`](Decoder::max_depth) changes that nesting limit.
/// - [`max_payload`](Decoder::max_payload) rejects any declared length above
///   a ceiling, at every nesting level, before the payload is sliced.
/// - [`strict_booleans`](Decoder::strict_booleans) rejects `!` payloads
///   other than `true` and `false` instead of reading them as `false`.
///
/// # Example
///
/// ```
/// use tnetstring::{Decoder, DecodeError, Value};
///
/// let decoder = Decoder::new().max_payload(1024);
/// let (value, rest) = decoder.decode(b"5:hello,0:~").unwrap();
/// assert_eq!(value, Value::from("hello"));
/// assert_eq!(rest, b"0:~");
///
/// assert_eq!(
///     Decoder::new().strict_booleans(true).decode(b"3:qux!"),
///     Err(DecodeError::InvalidBoolean)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    max_payload: Option<usize>,
    max_depth: usize,
    strict_booleans: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            max_payload: None,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_booleans: false,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow at most `limit` arrays and objects nested inside each other.
    ///
    /// Zero rejects every container.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Reject declared lengths greater than `limit`.
    pub fn max_payload(mut self, limit: usize) -> Self {
        self.max_payload = Some(limit);
        self
    }

    pub fn strict_booleans(mut self, strict: bool) -> Self {
        self.strict_booleans = strict;
        self
    }

    /// Decode one value from the front of `input`.
    ///
    /// Returns the value together with the bytes that follow it. On error
    /// nothing is returned; a malformed nested element fails the whole call.
    pub fn decode<'a>(&self, input: &'a [u8]) -> Result<(Value, &'a [u8]), DecodeError> {
        let result = self.read_any(input, 0);
        if let Err(err) = &result {
            debug!(%err, input_len = input.len(), "tnetstring decode failed");
        }
        result
    }

    /// Decode consecutive values until `input` is exhausted.
    pub fn decode_all(&self, input: &[u8]) -> Result<Vec<Value>, DecodeError> {
        self.iter(input).collect()
    }

    /// Iterate over consecutive values in `input`.
    ///
    /// The iterator stops after the first error.
    pub fn iter<'a>(&self, input: &'a [u8]) -> Values<'a> {
        Values {
            decoder: *self,
            rest: input,
            failed: false,
        }
    }

    /// `depth` counts the containers enclosing `input`.
    fn read_any<'a>(
        &self,
        input: &'a [u8],
        depth: usize,
    ) -> Result<(Value, &'a [u8]), DecodeError> {
        let (payload, tag, rest) = self.split(input)?;
        let kind = Kind::from_tag(tag).ok_or(DecodeError::UnknownTag(tag))?;
        let value = match kind {
            Kind::String => Value::String(payload.to_vec()),
            Kind::Integer => {
                Value::Integer(parse_ascii(payload).ok_or(DecodeError::InvalidInteger)?)
            }
            Kind::Float => Value::Float(read_float(payload)?),
            Kind::Boolean => Value::Boolean(self.read_boolean(payload)?),
            Kind::Null => {
                if !payload.is_empty() {
                    return Err(DecodeError::NonEmptyNull);
                }
                Value::Null
            }
            Kind::Array => self.read_arr(payload, self.enter(depth)?)?,
            Kind::Object => self.read_obj(payload, self.enter(depth)?)?,
        };
        Ok((value, rest))
    }

    /// Depth of the children of a container found at `depth`.
    fn enter(&self, depth: usize) -> Result<usize, DecodeError> {
        if depth >= self.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    /// Split `input` into payload, tag byte and remainder.
    fn split<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], u8, &'a [u8]), DecodeError> {
        let sep = input
            .iter()
            .position(|&b| b == b':')
            .ok_or(DecodeError::NoSeparator)?;
        let len = parse_length(&input[..sep])?;
        if let Some(limit) = self.max_payload {
            if len > limit {
                return Err(DecodeError::PayloadTooLarge {
                    declared: len,
                    limit,
                });
            }
        }
        let body = &input[sep + 1..];
        // The payload must be followed by at least the tag byte.
        if body.len() <= len {
            return Err(DecodeError::TruncatedPayload {
                declared: len,
                available: body.len(),
            });
        }
        Ok((&body[..len], body[len], &body[len + 1..]))
    }

    fn read_boolean(&self, payload: &[u8]) -> Result<bool, DecodeError> {
        match payload {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ if self.strict_booleans => Err(DecodeError::InvalidBoolean),
            _ => Ok(false),
        }
    }

    fn read_arr(&self, mut payload: &[u8], depth: usize) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        while !payload.is_empty() {
            let (item, rest) = self.read_any(payload, depth)?;
            items.push(item);
            payload = rest;
        }
        trace!(len = items.len(), "decoded array");
        Ok(Value::Array(items))
    }

    fn read_obj(&self, mut payload: &[u8], depth: usize) -> Result<Value, DecodeError> {
        let mut fields: Vec<Field> = Vec::new();
        while !payload.is_empty() {
            let (key, rest) = self.read_any(payload, depth)?;
            if rest.is_empty() {
                return Err(DecodeError::UnbalancedPair);
            }
            let key = match key {
                Value::String(bytes) => bytes,
                other => return Err(DecodeError::NonStringKey(other.kind())),
            };
            let (val, rest) = self.read_any(rest, depth)?;
            fields.push((key, val));
            payload = rest;
        }
        trace!(len = fields.len(), "decoded object");
        Ok(Value::Object(fields))
    }
}

fn parse_length(digits: &[u8]) -> Result<usize, DecodeError> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::InvalidLength);
    }
    if digits.len() > MAX_LENGTH_DIGITS {
        return Err(DecodeError::LengthTooLong);
    }
    Ok(digits
        .iter()
        .fold(0, |n, d| n * 10 + usize::from(d - b'0')))
}

/// NaN collapses to the canonical NaN; the encoder writes every NaN as
/// `NaN`, so a sign or payload bit would not survive re-encoding.
fn read_float(payload: &[u8]) -> Result<f64, DecodeError> {
    let f: f64 = parse_ascii(payload).ok_or(DecodeError::InvalidFloat)?;
    Ok(if f.is_nan() { f64::NAN } else { f })
}

fn parse_ascii<T: std::str::FromStr>(payload: &[u8]) -> Option<T> {
    std::str::from_utf8(payload).ok()?.parse().ok()
}

/// Iterator over consecutive values in a buffer, see [`Decoder::iter`].
#[derive(Debug, Clone)]
pub struct Values<'a> {
    decoder: Decoder,
    rest: &'a [u8],
    failed: bool,
}

impl<'a> Values<'a> {
    /// Bytes not yet consumed.
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }
}

impl Iterator for Values<'_> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match self.decoder.decode(self.rest) {
            Ok((value, rest)) => {
                self.rest = rest;
                Some(Ok(value))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
