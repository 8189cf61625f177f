//! Structural writer: drives a [`CborEncoder`] from serde's data model.
//!
//! Records become `0xbf name value ... 0xff`, sequences and maps become
//! `0x9f ... 0xff`, and map entries are written as a bare key followed by
//! the value.
//!
//! `None`, `()` and unit structs all become `0xf6`, so an optional whose
//! present value is itself null (`Some(())`, `Some(None)`) reads back as
//! `None`.

use std::io::Write;

use serde::ser::{self, Serialize};

use crate::cbor::{CborEncoder, CborError, Result};
use crate::frame::{Kind, Role};

/// A serde serializer producing CBOR on a byte sink.
pub struct Serializer<W: Write> {
    encoder: CborEncoder<W>,
    depth: usize,
}

impl<W: Write> Serializer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            encoder: CborEncoder::new(sink),
            depth: 0,
        }
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> u64 {
        self.encoder.writer.written()
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        Ok(self.encoder.writer.flush()?)
    }

    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }

    fn open(&mut self, kind: Kind) -> Result<Role> {
        let role = Role::for_kind(kind);
        self.encoder.write_token(role.begin_token())?;
        tracing::trace!(?kind, %role, depth = self.depth, "open frame");
        self.depth += 1;
        Ok(role)
    }

    fn close(&mut self, role: Role) -> Result<()> {
        self.depth -= 1;
        tracing::trace!(%role, depth = self.depth, "close frame");
        self.encoder.write_token(role.end_token())
    }

    fn compound(&mut self, kind: Kind) -> Result<Compound<'_, W>> {
        let role = self.open(kind)?;
        Ok(Compound {
            ser: self,
            role,
            variant: None,
            in_entry: false,
        })
    }

    /// Opens the single-field record that wraps a data-carrying enum variant
    /// and writes the variant name as its field name.
    fn open_variant(&mut self, variant: &'static str) -> Result<Role> {
        let outer = self.open(Kind::Enum)?;
        tracing::trace!(variant, "write variant");
        self.encoder.write_str(variant)?;
        Ok(outer)
    }
}

/// One open frame of the writer.
pub struct Compound<'a, W: Write> {
    ser: &'a mut Serializer<W>,
    role: Role,
    /// Role of the enclosing variant record, closed after this frame.
    variant: Option<Role>,
    /// A map entry frame is open and waiting for its value.
    in_entry: bool,
}

impl<'a, W: Write> Compound<'a, W> {
    fn element<T: ?Sized + Serialize>(
        &mut self,
        name: Option<&'static str>,
        value: &T,
    ) -> Result<()> {
        if self.role.writes_names() {
            let name = name.ok_or_else(|| {
                CborError::Message(format!("{} element without a name", self.role))
            })?;
            tracing::trace!(field = name, "write field");
            self.ser.encoder.write_str(name)?;
        }
        value.serialize(&mut *self.ser)
    }

    fn finish(self) -> Result<()> {
        if self.in_entry {
            return Err(CborError::Message("map key without a value".to_string()));
        }
        self.ser.close(self.role)?;
        if let Some(outer) = self.variant {
            self.ser.close(outer)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = CborError;
    type SerializeSeq = Compound<'a, W>;
    type SerializeTuple = Compound<'a, W>;
    type SerializeTupleStruct = Compound<'a, W>;
    type SerializeTupleVariant = Compound<'a, W>;
    type SerializeMap = Compound<'a, W>;
    type SerializeStruct = Compound<'a, W>;
    type SerializeStructVariant = Compound<'a, W>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.encoder.write_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.encoder.write_int(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        let v = i64::try_from(v).map_err(|_| CborError::UnsupportedMagnitude)?;
        self.serialize_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.encoder.write_uint(v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        let v = u64::try_from(v).map_err(|_| CborError::UnsupportedMagnitude)?;
        self.serialize_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.encoder.write_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.encoder.write_f64(v)
    }

    // Chars travel as their scalar value.
    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.encoder.write_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        let role = self.open(Kind::List)?;
        for &byte in v {
            self.encoder.write_uint(byte as u64)?;
        }
        self.close(role)
    }

    fn serialize_none(self) -> Result<()> {
        self.encoder.write_null()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.encoder.write_null()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.encoder.write_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        let outer = self.open_variant(variant)?;
        value.serialize(&mut *self)?;
        self.close(outer)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.compound(Kind::List)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.compound(Kind::List)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.compound(Kind::List)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let outer = self.open_variant(variant)?;
        let mut compound = self.compound(Kind::List)?;
        compound.variant = Some(outer);
        Ok(compound)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.compound(Kind::Map)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.compound(Kind::Record)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let outer = self.open_variant(variant)?;
        let mut compound = self.compound(Kind::Record)?;
        compound.variant = Some(outer);
        Ok(compound)
    }
}

impl<'a, W: Write> ser::SerializeSeq for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(None, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTuple for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(None, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(None, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeTupleVariant for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.element(None, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeMap for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        if self.in_entry {
            return Err(CborError::Message("map key without a value".to_string()));
        }
        self.ser.open(Kind::MapEntry)?;
        self.in_entry = true;
        key.serialize(&mut *self.ser)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        if !self.in_entry {
            return Err(CborError::Message("map value without a key".to_string()));
        }
        value.serialize(&mut *self.ser)?;
        self.in_entry = false;
        self.ser.close(Role::Entry)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeStruct for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.element(Some(key), value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, W: Write> ser::SerializeStructVariant for Compound<'a, W> {
    type Ok = ();
    type Error = CborError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.element(Some(key), value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}
