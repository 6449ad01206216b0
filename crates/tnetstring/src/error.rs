//! Error types for TNetstring decoding and value manipulation.

use thiserror::Error;

use crate::value::Kind;

/// Errors that can occur while decoding a tagged netstring.
///
/// Every variant aborts the whole decode call: a malformed element nested
/// anywhere inside an array or object invalidates the outermost value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No `:` separator in the input.
    #[error("no ':' separator found")]
    NoSeparator,
    /// The length prefix is empty or contains something other than ASCII digits.
    #[error("invalid length prefix")]
    InvalidLength,
    /// The length prefix is longer than 9 digits.
    #[error("length prefix longer than 9 digits")]
    LengthTooLong,
    /// The declared payload plus its tag byte run past the end of the input.
    #[error("truncated payload: declared {declared} bytes, {available} available")]
    TruncatedPayload { declared: usize, available: usize },
    /// An `#` payload that is not a signed decimal integer.
    #[error("invalid integer payload")]
    InvalidInteger,
    /// A `^` payload that is not a decimal float.
    #[error("invalid float payload")]
    InvalidFloat,
    /// A `!` payload other than `true`/`false` while strict booleans are on.
    #[error("invalid boolean payload")]
    InvalidBoolean,
    /// A `~` value with a non-zero declared length.
    #[error("null must have an empty payload")]
    NonEmptyNull,
    /// The tag byte is not one of `, # ^ ! ~ ] }`.
    #[error("unknown type tag '{}'", .0.escape_ascii())]
    UnknownTag(u8),
    /// An object payload ended after a key with no value.
    #[error("object key without a value")]
    UnbalancedPair,
    /// An object key decoded to something other than a string.
    #[error("object key must be a string, got {0}")]
    NonStringKey(Kind),
    /// The declared length exceeds the decoder's configured ceiling.
    #[error("payload of {declared} bytes exceeds limit of {limit}")]
    PayloadTooLarge { declared: usize, limit: usize },
    /// Arrays and objects nest deeper than the decoder's configured limit.
    #[error("containers nested deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
}

/// Errors raised by [`Value`](crate::Value) mutators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("key not found: {}", String::from_utf8_lossy(.0))]
    KeyNotFound(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(DecodeError::UnknownTag(b'*').to_string(), "unknown type tag '*'");
        assert_eq!(
            DecodeError::NonStringKey(Kind::Integer).to_string(),
            "object key must be a string, got integer"
        );
        assert_eq!(
            DecodeError::DepthLimitExceeded { limit: 128 }.to_string(),
            "containers nested deeper than 128 levels"
        );
        assert_eq!(
            ValueError::KeyNotFound(b"yo".to_vec()).to_string(),
            "key not found: yo"
        );
    }
}
