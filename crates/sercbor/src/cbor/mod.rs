//! CBOR primitive codec and convenience entry points.

pub mod constants;
mod decoder;
mod encoder;
mod error;
mod shared;

pub use decoder::CborDecoder;
pub use encoder::{compose_int, compose_uint, compose_with_major, CborEncoder, Header};
pub use error::{CborError, Expected, Result};
pub use shared::{dump, dump_hex, dump_to_writer, load, load_from_reader, load_hex, load_with};
