//! Primitive CBOR encoder.
//!
//! Integer headers always use the shortest form that fits; floats always use
//! the fixed 5-byte (`0xfa`) or 9-byte (`0xfb`) form.

use std::io::Write;

use sercbor_buffers::Writer;

use super::constants::*;
use super::error::Result;

/// A composed item header: one initial byte plus up to eight value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    bytes: [u8; 9],
    len: u8,
}

impl Header {
    fn new(initial: u8, tail: &[u8]) -> Self {
        let mut bytes = [0u8; 9];
        bytes[0] = initial;
        bytes[1..=tail.len()].copy_from_slice(tail);
        Self {
            bytes,
            len: 1 + tail.len() as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// ORs a major type overlay into the initial byte.
    fn with_overlay(mut self, overlay: u8) -> Self {
        self.bytes[0] |= overlay;
        self
    }
}

/// Composes the minimal unsigned integer header (major type 0).
pub fn compose_uint(value: u64) -> Header {
    if value <= MAX_INLINE {
        Header::new(OVERLAY_UIN | value as u8, &[])
    } else if value <= 0xff {
        Header::new(MINOR_U8, &[value as u8])
    } else if value <= 0xffff {
        Header::new(MINOR_U16, &(value as u16).to_be_bytes())
    } else if value <= 0xffff_ffff {
        Header::new(MINOR_U32, &(value as u32).to_be_bytes())
    } else {
        Header::new(MINOR_U64, &value.to_be_bytes())
    }
}

/// Composes a signed integer header.
///
/// Negative values store the magnitude `-1 - value`, which is at most
/// `i64::MAX` even for `i64::MIN`.
pub fn compose_int(value: i64) -> Header {
    if value >= 0 {
        compose_uint(value as u64)
    } else {
        let magnitude = (-1 - value) as u64;
        compose_uint(magnitude).with_overlay(OVERLAY_NIN)
    }
}

/// Composes a header of the given major type carrying `value`.
pub fn compose_with_major(major: u8, value: u64) -> Header {
    compose_uint(value).with_overlay(major << 5)
}

/// CBOR encoder writing primitive items to a byte sink.
pub struct CborEncoder<W: Write> {
    pub writer: Writer<W>,
}

impl<W: Write> CborEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: Writer::new(sink),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub fn write_null(&mut self) -> Result<()> {
        Ok(self.writer.u8(CBOR_NULL)?)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        Ok(self.writer.u8(if value { CBOR_TRUE } else { CBOR_FALSE })?)
    }

    pub fn write_uint(&mut self, value: u64) -> Result<()> {
        Ok(self.writer.buf(compose_uint(value).as_bytes())?)
    }

    pub fn write_int(&mut self, value: i64) -> Result<()> {
        Ok(self.writer.buf(compose_int(value).as_bytes())?)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let mut buf = [0u8; 5];
        buf[0] = CBOR_F32;
        buf[1..].copy_from_slice(&value.to_bits().to_be_bytes());
        Ok(self.writer.buf(&buf)?)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = CBOR_F64;
        buf[1..].copy_from_slice(&value.to_bits().to_be_bytes());
        Ok(self.writer.buf(&buf)?)
    }

    /// Writes a text string: length header followed by the raw UTF-8 bytes.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        let data = value.as_bytes();
        self.writer
            .buf(compose_with_major(MAJOR_STR, data.len() as u64).as_bytes())?;
        Ok(self.writer.buf(data)?)
    }

    /// Writes a structural token (`0x9f`, `0xbf` or the `0xff` break) if
    /// there is one.
    pub fn write_token(&mut self, token: Option<u8>) -> Result<()> {
        match token {
            Some(byte) => Ok(self.writer.u8(byte)?),
            None => Ok(()),
        }
    }
}
