//! Convenience wrappers around [`Serializer`] and [`Deserializer`].

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DecodeConfig;
use crate::de::Deserializer;
use crate::ser::Serializer;

use super::error::Result;

/// Encode a value into CBOR bytes.
pub fn dump<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut ser = Serializer::new(Vec::new());
    value.serialize(&mut ser)?;
    let bytes = ser.into_inner();
    tracing::debug!(len = bytes.len(), "dumped value");
    Ok(bytes)
}

/// Encode a value into lowercase hex.
pub fn dump_hex<T: ?Sized + Serialize>(value: &T) -> Result<String> {
    Ok(hex::encode(dump(value)?))
}

/// Encode a value directly onto `sink`. The sink is flushed on success.
pub fn dump_to_writer<W: Write, T: ?Sized + Serialize>(sink: W, value: &T) -> Result<()> {
    let mut ser = Serializer::new(sink);
    value.serialize(&mut ser)?;
    ser.flush()?;
    tracing::debug!(len = ser.written(), "dumped value to writer");
    Ok(())
}

/// Decode exactly one value from `bytes`.
///
/// Bytes left over after the root item are an error.
pub fn load<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    load_with(bytes, &DecodeConfig::default())
}

/// Decode one value from `bytes` using `config`.
pub fn load_with<T: DeserializeOwned>(bytes: &[u8], config: &DecodeConfig) -> Result<T> {
    let mut de = Deserializer::with_config(bytes, config)?;
    let value = T::deserialize(&mut de)?;
    if !config.allow_trailing_bytes {
        de.end()?;
    }
    tracing::debug!(consumed = de.consumed(), len = bytes.len(), "loaded value");
    Ok(value)
}

/// Decode one value from a hex string. Either letter case is accepted.
pub fn load_hex<T: DeserializeOwned>(input: &str) -> Result<T> {
    let bytes = hex::decode(input.trim())?;
    load(&bytes)
}

/// Decode one value from a stream.
///
/// Reading stops after the root item's last byte plus one byte of lookahead;
/// whatever follows is left in the source.
pub fn load_from_reader<R: Read, T: DeserializeOwned>(source: R) -> Result<T> {
    let mut de = Deserializer::new(source)?;
    let value = T::deserialize(&mut de)?;
    tracing::debug!(consumed = de.consumed(), "loaded value from reader");
    Ok(value)
}
