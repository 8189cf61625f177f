//! Byte source reader with one byte of lookahead.

use std::io::{self, Read};

use crate::BufferError;

/// A reader that always holds the next unconsumed byte in `current`.
///
/// Callers inspect [`Reader::current`] to decide how to consume an item,
/// then read any payload bytes with [`Reader::read_exact`] and finally
/// advance the lookahead with [`Reader::read_byte`]. After every complete
/// item the lookahead sits on the first byte of the following one.
///
/// # Example
///
/// ```
/// use sercbor_buffers::Reader;
///
/// let data = [0x19, 0x03, 0xe8, 0x0c];
/// let mut reader = Reader::new(&data[..]).unwrap();
///
/// assert_eq!(reader.current(), Some(0x19));
/// assert_eq!(reader.read_exact(2).unwrap(), vec![0x03, 0xe8]);
/// assert_eq!(reader.read_byte().unwrap(), Some(0x0c));
/// ```
pub struct Reader<R: Read> {
    source: R,
    /// Lookahead byte; `None` once the source is exhausted.
    current: Option<u8>,
    /// Number of bytes pulled from the source, lookahead included.
    consumed: u64,
}

impl<R: Read> Reader<R> {
    /// Creates a reader and primes the lookahead with the first byte.
    pub fn new(source: R) -> Result<Self, BufferError> {
        let mut reader = Self {
            source,
            current: None,
            consumed: 0,
        };
        reader.read_byte()?;
        Ok(reader)
    }

    /// Returns the lookahead byte without consuming it.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Returns `true` once the source has no more bytes.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Replaces the lookahead with the next byte of the source.
    pub fn read_byte(&mut self) -> Result<Option<u8>, BufferError> {
        let mut byte = [0u8; 1];
        self.current = loop {
            match self.source.read(&mut byte) {
                Ok(0) => break None,
                Ok(_) => {
                    self.consumed += 1;
                    break Some(byte[0]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        Ok(self.current)
    }

    /// Fills `buf` with the bytes following the lookahead.
    ///
    /// The lookahead itself is left untouched.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<(), BufferError> {
        match self.source.read_exact(buf) {
            Ok(()) => {
                self.consumed += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(BufferError::EndOfStream),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads exactly `size` bytes following the lookahead.
    pub fn read_exact(&mut self, size: usize) -> Result<Vec<u8>, BufferError> {
        let mut buf = vec![0u8; size];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Number of bytes pulled from the source so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Unwraps the reader, returning the source.
    ///
    /// The lookahead byte, if any, is lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}
