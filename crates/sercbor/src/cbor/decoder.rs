//! Primitive CBOR decoder.
//!
//! The decoder keeps the header byte of the next item in the reader's
//! lookahead. Every `next_*` method consumes one complete item and leaves the
//! lookahead on the header of the following one.

use std::io::Read;

use sercbor_buffers::Reader;

use super::constants::*;
use super::error::{CborError, Expected, Result};

/// Text payloads are pulled in chunks so a forged length cannot force one
/// huge allocation before the source runs dry.
const READ_CHUNK: usize = 64 * 1024;

/// CBOR decoder reading primitive items from a byte source.
pub struct CborDecoder<R: Read> {
    pub reader: Reader<R>,
}

impl<R: Read> CborDecoder<R> {
    /// Creates a decoder and loads the first header byte.
    pub fn new(source: R) -> Result<Self> {
        Ok(Self {
            reader: Reader::new(source)?,
        })
    }

    /// Returns the next header byte without consuming it.
    pub fn peek(&self) -> Result<u8> {
        self.reader.current().ok_or(CborError::UnexpectedEof)
    }

    /// Returns the major type of the next item.
    pub fn peek_major(&self) -> Result<u8> {
        Ok(major_of(self.peek()?))
    }

    pub fn is_null(&self) -> bool {
        self.reader.current() == Some(CBOR_NULL)
    }

    pub fn is_end(&self) -> bool {
        self.reader.current() == Some(CBOR_END)
    }

    /// Returns `true` once every byte of the source has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.reader.is_at_end()
    }

    fn advance(&mut self) -> Result<()> {
        self.reader.read_byte()?;
        Ok(())
    }

    /// Consumes the next byte, which must equal `expected`.
    pub fn skip_byte(&mut self, expected: u8) -> Result<()> {
        let found = self.peek()?;
        if found != expected {
            return Err(CborError::parsing(Expected::Byte(expected), found));
        }
        self.advance()
    }

    /// Consumes a structural token if there is one.
    pub fn skip_token(&mut self, token: Option<u8>) -> Result<()> {
        match token {
            Some(expected) => self.skip_byte(expected),
            None => Ok(()),
        }
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.skip_byte(CBOR_NULL)
    }

    pub fn next_bool(&mut self) -> Result<bool> {
        let value = match self.peek()? {
            CBOR_TRUE => true,
            CBOR_FALSE => false,
            found => return Err(CborError::parsing(Expected::Boolean, found)),
        };
        self.advance()?;
        Ok(value)
    }

    /// Reads the value carried by the current header without consuming the
    /// header itself. Over-long encodings are accepted.
    fn read_argument(&mut self, expected: Expected) -> Result<u64> {
        let header = self.peek()?;
        let len = trailing_len(header & MINOR_MASK)
            .ok_or_else(|| CborError::parsing(expected, header))?;
        if len == 0 {
            return Ok((header & MINOR_MASK) as u64);
        }
        let mut buf = [0u8; 8];
        self.reader.read_into(&mut buf[8 - len..])?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Reads a signed integer of major type 0 or 1.
    pub fn next_number(&mut self) -> Result<i64> {
        let header = self.peek()?;
        let major = major_of(header);
        if major != MAJOR_UIN && major != MAJOR_NIN {
            return Err(CborError::parsing(Expected::Integer, header));
        }
        let magnitude = self.read_argument(Expected::Integer)?;
        let magnitude = i64::try_from(magnitude).map_err(|_| CborError::UnsupportedMagnitude)?;
        self.advance()?;
        Ok(if major == MAJOR_NIN {
            -1 - magnitude
        } else {
            magnitude
        })
    }

    /// Reads an unsigned integer (major type 0) over the full `u64` range.
    pub fn next_unsigned(&mut self) -> Result<u64> {
        let header = self.peek()?;
        if major_of(header) != MAJOR_UIN {
            return Err(CborError::parsing(Expected::UnsignedInteger, header));
        }
        let value = self.read_argument(Expected::UnsignedInteger)?;
        self.advance()?;
        Ok(value)
    }

    pub fn next_string(&mut self) -> Result<String> {
        let header = self.peek()?;
        if major_of(header) != MAJOR_STR {
            return Err(CborError::parsing(Expected::TextString, header));
        }
        let len = self.read_argument(Expected::TextString)?;
        let len = usize::try_from(len).map_err(|_| CborError::UnsupportedMagnitude)?;
        let mut data = Vec::with_capacity(len.min(READ_CHUNK));
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(READ_CHUNK);
            let start = data.len();
            data.resize(start + chunk, 0);
            self.reader.read_into(&mut data[start..])?;
            remaining -= chunk;
        }
        let value = String::from_utf8(data).map_err(|_| CborError::InvalidUtf8)?;
        self.advance()?;
        Ok(value)
    }

    pub fn next_f32(&mut self) -> Result<f32> {
        let header = self.peek()?;
        if header != CBOR_F32 {
            return Err(CborError::parsing(Expected::Byte(CBOR_F32), header));
        }
        let mut buf = [0u8; 4];
        self.reader.read_into(&mut buf)?;
        self.advance()?;
        Ok(f32::from_bits(u32::from_be_bytes(buf)))
    }

    pub fn next_f64(&mut self) -> Result<f64> {
        let header = self.peek()?;
        if header != CBOR_F64 {
            return Err(CborError::parsing(Expected::Byte(CBOR_F64), header));
        }
        let mut buf = [0u8; 8];
        self.reader.read_into(&mut buf)?;
        self.advance()?;
        Ok(f64::from_bits(u64::from_be_bytes(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_decoder(hex_input: &str, block: impl FnOnce(&mut CborDecoder<&[u8]>)) {
        let bytes = hex::decode(hex_input).unwrap();
        let mut decoder = CborDecoder::new(&bytes[..]).unwrap();
        block(&mut decoder);
    }

    #[test]
    fn decode_integers() {
        with_decoder("0C1903E8", |d| {
            assert_eq!(d.next_number().unwrap(), 12);
            assert_eq!(d.next_number().unwrap(), 1000);
            assert!(d.is_exhausted());
        });
        with_decoder("203903e7", |d| {
            assert_eq!(d.next_number().unwrap(), -1);
            assert_eq!(d.next_number().unwrap(), -1000);
        });
    }

    #[test]
    fn decode_one_byte_argument_above_127() {
        with_decoder("18c8", |d| assert_eq!(d.next_number().unwrap(), 200));
    }

    #[test]
    fn decode_extreme_integers() {
        with_decoder("3b7fffffffffffffff", |d| {
            assert_eq!(d.next_number().unwrap(), i64::MIN);
        });
        with_decoder("1bffffffffffffffff", |d| {
            assert_eq!(d.next_unsigned().unwrap(), u64::MAX);
        });
        with_decoder("1bffffffffffffffff", |d| {
            assert!(matches!(
                d.next_number(),
                Err(CborError::UnsupportedMagnitude)
            ));
        });
        with_decoder("3b8000000000000000", |d| {
            assert!(matches!(
                d.next_number(),
                Err(CborError::UnsupportedMagnitude)
            ));
        });
    }

    #[test]
    fn over_long_encoding_is_accepted() {
        with_decoder("1a00000001", |d| assert_eq!(d.next_number().unwrap(), 1));
    }

    #[test]
    fn decode_strings() {
        with_decoder("6568656C6C6F", |d| {
            assert_eq!(d.next_string().unwrap(), "hello");
        });
        with_decoder(
            "7828737472696E672074686174206973206C6F6E676572207468616E2032332063686172616374657273",
            |d| {
                assert_eq!(
                    d.next_string().unwrap(),
                    "string that is longer than 23 characters"
                );
            },
        );
    }

    #[test]
    fn decode_floats_and_doubles() {
        with_decoder("fb7e37e43c8800759c", |d| {
            assert_eq!(d.next_f64().unwrap().to_bits(), 1e300f64.to_bits());
        });
        with_decoder("fa47c35000", |d| {
            assert_eq!(d.next_f32().unwrap().to_bits(), 100_000.0f32.to_bits());
        });
    }

    #[test]
    fn float_header_must_match_exactly() {
        with_decoder("fa47c35000", |d| match d.next_f64() {
            Err(CborError::Parsing {
                expected: Expected::Byte(0xfb),
                found: 0xfa,
            }) => {}
            other => panic!("unexpected {other:?}"),
        });
    }

    #[test]
    fn truncated_argument_is_eof() {
        with_decoder("1903", |d| assert!(d.next_number().unwrap_err().is_eof()));
        with_decoder("6568656c", |d| assert!(d.next_string().unwrap_err().is_eof()));
        with_decoder("", |d| assert!(d.next_bool().unwrap_err().is_eof()));
    }

    #[test]
    fn structural_bytes() {
        with_decoder("9fbff6f5f4ff", |d| {
            d.skip_token(Some(CBOR_START_ARR)).unwrap();
            assert!(d.skip_byte(CBOR_START_ARR).unwrap_err().is_parsing());
            d.skip_token(None).unwrap();
            d.skip_token(Some(CBOR_START_MAP)).unwrap();
            assert!(d.is_null());
            d.next_null().unwrap();
            assert!(d.next_bool().unwrap());
            assert!(!d.next_bool().unwrap());
            assert!(d.is_end());
            d.skip_token(Some(CBOR_END)).unwrap();
            assert!(d.is_exhausted());
        });
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        with_decoder("62c328", |d| {
            assert!(matches!(d.next_string(), Err(CborError::InvalidUtf8)));
        });
    }

    #[test]
    fn indefinite_string_is_not_supported() {
        with_decoder("7f6161ff", |d| assert!(d.next_string().unwrap_err().is_parsing()));
    }
}
