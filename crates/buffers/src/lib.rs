//! Blocking byte cursors for sercbor.
//!
//! This crate provides the two ends of the codec's byte plumbing:
//!
//! - [`Writer`] - Appends octets to any [`std::io::Write`] sink, never
//!   silently dropping a short write
//! - [`Reader`] - Reads octets from any [`std::io::Read`] source while
//!   keeping exactly one byte of lookahead
//!
//! # Example
//!
//! ```
//! use sercbor_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.u8(0x01).unwrap();
//! writer.buf(&[0x02, 0x03]).unwrap();
//! let data = writer.into_inner();
//!
//! let mut reader = Reader::new(&data[..]).unwrap();
//! assert_eq!(reader.current(), Some(0x01));
//! assert_eq!(reader.read_exact(2).unwrap(), vec![0x02, 0x03]);
//! assert_eq!(reader.read_byte().unwrap(), None);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The source ran out before a multi-byte read was complete.
    #[error("unexpected end of stream")]
    EndOfStream,
    /// The underlying sink or source failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    /// Returns `true` for the end-of-stream case.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, BufferError::EndOfStream)
    }
}
