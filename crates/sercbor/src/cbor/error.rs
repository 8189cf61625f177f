use std::fmt;

use sercbor_buffers::BufferError;
use thiserror::Error;

/// What the decoder was looking for when it met an unexpected header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// One exact header byte, e.g. `0xbf` for a record start.
    Byte(u8),
    Boolean,
    TextString,
    Integer,
    UnsignedInteger,
    /// Any item the self-describing decoder understands.
    Value,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Byte(b) => write!(f, "byte {b:#04x}"),
            Expected::Boolean => f.write_str("boolean value"),
            Expected::TextString => f.write_str("start of text string"),
            Expected::Integer => f.write_str("integer"),
            Expected::UnsignedInteger => f.write_str("unsigned integer"),
            Expected::Value => f.write_str("supported cbor item"),
        }
    }
}

/// Error type for CBOR encoding/decoding operations.
#[derive(Debug, Error)]
pub enum CborError {
    #[error("expected {expected}, but found {found:#04x}")]
    Parsing { expected: Expected, found: u8 },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("integer magnitude not supported")]
    UnsupportedMagnitude,
    #[error("invalid UTF-8 in text string")]
    InvalidUtf8,
    #[error("{0} is not a unicode scalar value")]
    InvalidChar(u64),
    #[error("unexpected trailing bytes after root item")]
    TrailingBytes,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl CborError {
    pub(crate) fn parsing(expected: Expected, found: u8) -> Self {
        CborError::Parsing { expected, found }
    }

    /// Returns `true` for header mismatches.
    pub fn is_parsing(&self) -> bool {
        matches!(self, CborError::Parsing { .. })
    }

    /// Returns `true` when the input ended in the middle of an item.
    pub fn is_eof(&self) -> bool {
        matches!(self, CborError::UnexpectedEof)
    }
}

impl From<BufferError> for CborError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfStream => CborError::UnexpectedEof,
            BufferError::Io(e) => CborError::Io(e),
        }
    }
}

impl serde::ser::Error for CborError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CborError::Message(msg.to_string())
    }
}

impl serde::de::Error for CborError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CborError::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CborError>;
