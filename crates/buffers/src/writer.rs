//! Byte sink writer.

use std::io::Write;

use crate::BufferError;

/// Appends octets to an underlying sink.
///
/// Every write goes through [`Write::write_all`], so a sink that accepts
/// fewer bytes than offered surfaces as an error instead of a truncated
/// stream.
///
/// # Example
///
/// ```
/// use sercbor_buffers::Writer;
///
/// let mut writer = Writer::new(Vec::new());
/// writer.u8(0x9f).unwrap();
/// writer.u8(0xff).unwrap();
/// assert_eq!(writer.into_inner(), vec![0x9f, 0xff]);
/// ```
pub struct Writer<W: Write> {
    sink: W,
    /// Number of bytes written so far.
    written: u64,
}

impl<W: Write> Writer<W> {
    /// Creates a writer over the given sink.
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Writes a single byte.
    #[inline]
    pub fn u8(&mut self, byte: u8) -> Result<(), BufferError> {
        self.buf(&[byte])
    }

    /// Writes all of `data`.
    pub fn buf(&mut self, data: &[u8]) -> Result<(), BufferError> {
        self.sink.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Number of bytes handed to the sink.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<(), BufferError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Unwraps the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
