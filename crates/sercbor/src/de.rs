//! Structural reader: the mirror image of [`crate::ser`].
//!
//! Each composite value consumes the begin token its writer role produced,
//! yields elements until it sees the break byte, and consumes the break.
//! Record field names are handed to the type's field identifier visitor,
//! which resolves them to fields.

use std::io::Read;

use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};

use crate::cbor::constants::*;
use crate::cbor::{CborDecoder, CborError, Expected, Result};
use crate::config::DecodeConfig;
use crate::frame::{EntrySlots, Kind, Role};

/// A serde deserializer reading CBOR from a byte source.
pub struct Deserializer<R: Read> {
    decoder: CborDecoder<R>,
    depth: usize,
    max_depth: usize,
}

impl<R: Read> Deserializer<R> {
    /// Creates a deserializer with the default configuration.
    pub fn new(source: R) -> Result<Self> {
        Self::with_config(source, &DecodeConfig::default())
    }

    pub fn with_config(source: R, config: &DecodeConfig) -> Result<Self> {
        Ok(Self {
            decoder: CborDecoder::new(source)?,
            depth: 0,
            max_depth: config.max_depth,
        })
    }

    /// Fails with [`CborError::TrailingBytes`] unless the source is exhausted.
    pub fn end(&self) -> Result<()> {
        if self.decoder.is_exhausted() {
            Ok(())
        } else {
            Err(CborError::TrailingBytes)
        }
    }

    /// Number of bytes pulled from the source, lookahead included.
    pub fn consumed(&self) -> u64 {
        self.decoder.reader.consumed()
    }

    /// Consumes the begin token of `kind`'s role. Only framed roles count
    /// towards `max_depth`; map entries have no bytes of their own.
    fn open(&mut self, kind: Kind) -> Result<Role> {
        let role = Role::for_kind(kind);
        let token = role.begin_token();
        if token.is_some() && self.depth >= self.max_depth {
            return Err(CborError::DepthLimitExceeded);
        }
        self.decoder.skip_token(token)?;
        tracing::trace!(?kind, %role, depth = self.depth, "enter frame");
        if token.is_some() {
            self.depth += 1;
        }
        Ok(role)
    }

    fn close(&mut self, role: Role) -> Result<()> {
        let token = role.end_token();
        self.decoder.skip_token(token)?;
        if token.is_some() {
            self.depth -= 1;
        }
        tracing::trace!(%role, depth = self.depth, "leave frame");
        Ok(())
    }

    fn integer<'de, V: Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value> {
        let header = self.decoder.peek()?;
        match major_of(header) {
            MAJOR_UIN => visitor.visit_u64(self.decoder.next_unsigned()?),
            MAJOR_NIN => visitor.visit_i64(self.decoder.next_number()?),
            _ => Err(CborError::parsing(Expected::Integer, header)),
        }
    }
}

impl<'de, 'a, R: Read> de::Deserializer<'de> for &'a mut Deserializer<R> {
    type Error = CborError;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let header = self.decoder.peek()?;
        match header {
            CBOR_START_ARR => self.deserialize_seq(visitor),
            CBOR_START_MAP => self.deserialize_struct("", &[], visitor),
            CBOR_FALSE | CBOR_TRUE => visitor.visit_bool(self.decoder.next_bool()?),
            CBOR_NULL => {
                self.decoder.next_null()?;
                visitor.visit_unit()
            }
            CBOR_F32 => visitor.visit_f32(self.decoder.next_f32()?),
            CBOR_F64 => visitor.visit_f64(self.decoder.next_f64()?),
            _ => match major_of(header) {
                MAJOR_UIN | MAJOR_NIN => self.integer(visitor),
                MAJOR_STR => visitor.visit_string(self.decoder.next_string()?),
                _ => Err(CborError::parsing(Expected::Value, header)),
            },
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.decoder.next_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.integer(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.decoder.next_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.decoder.next_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value = self.decoder.next_unsigned()?;
        let c = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(CborError::InvalidChar(value))?;
        visitor.visit_char(c)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.decoder.next_string()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let role = self.open(Kind::List)?;
        let mut bytes = Vec::new();
        while !self.decoder.is_end() {
            let value = self.decoder.next_unsigned()?;
            bytes.push(u8::try_from(value).map_err(|_| CborError::UnsupportedMagnitude)?);
        }
        self.close(role)?;
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.decoder.is_null() {
            self.decoder.next_null()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.decoder.next_null()?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let role = self.open(Kind::List)?;
        let value = visitor.visit_seq(ListAccess {
            de: &mut *self,
            index: 0,
        })?;
        self.close(role)?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let role = self.open(Kind::Map)?;
        let value = visitor.visit_map(EntryAccess {
            de: &mut *self,
            slots: EntrySlots::closed(),
        })?;
        self.close(role)?;
        Ok(value)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let role = self.open(Kind::Record)?;
        let value = visitor.visit_map(RecordAccess { de: &mut *self })?;
        self.close(role)?;
        Ok(value)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let header = self.decoder.peek()?;
        if header == CBOR_START_MAP {
            let role = self.open(Kind::Enum)?;
            let value = visitor.visit_enum(VariantAccess { de: &mut *self })?;
            self.close(role)?;
            Ok(value)
        } else if major_of(header) == MAJOR_STR {
            let name: StringDeserializer<CborError> =
                self.decoder.next_string()?.into_deserializer();
            visitor.visit_enum(name)
        } else {
            Err(CborError::parsing(Expected::TextString, header))
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_any(visitor)
    }
}

/// Record fields: a name string before each value, until break.
struct RecordAccess<'a, R: Read> {
    de: &'a mut Deserializer<R>,
}

impl<'de, 'a, R: Read> de::MapAccess<'de> for RecordAccess<'a, R> {
    type Error = CborError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.de.decoder.is_end() {
            return Ok(None);
        }
        let name = self.de.decoder.next_string()?;
        tracing::trace!(field = %name, "read field");
        let name: StringDeserializer<CborError> = name.into_deserializer();
        seed.deserialize(name).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

/// List elements: a free-running counter, one step per element, until break.
struct ListAccess<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    index: usize,
}

impl<'de, 'a, R: Read> de::SeqAccess<'de> for ListAccess<'a, R> {
    type Error = CborError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.de.decoder.is_end() {
            return Ok(None);
        }
        tracing::trace!(index = self.index, "read element");
        self.index += 1;
        seed.deserialize(&mut *self.de).map(Some)
    }
}

/// Map entries: each one an unframed key then value.
struct EntryAccess<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    /// Slot cursor of the current entry; closed between entries.
    slots: EntrySlots,
}

impl<'de, 'a, R: Read> de::MapAccess<'de> for EntryAccess<'a, R> {
    type Error = CborError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if !self.slots.is_done() {
            return Err(CborError::Message("map key without a value".to_string()));
        }
        if self.de.decoder.is_end() {
            return Ok(None);
        }
        self.de.open(Kind::MapEntry)?;
        self.slots = EntrySlots::default();
        match self.slots.next_slot() {
            Some(0) => seed.deserialize(&mut *self.de).map(Some),
            _ => Err(CborError::Message("map entry out of order".to_string())),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        match self.slots.next_slot() {
            Some(1) => {
                let value = seed.deserialize(&mut *self.de)?;
                self.de.close(Role::Entry)?;
                Ok(value)
            }
            _ => Err(CborError::Message("map value without a key".to_string())),
        }
    }
}

/// Data-carrying enum variant: `{name: payload}`.
struct VariantAccess<'a, R: Read> {
    de: &'a mut Deserializer<R>,
}

impl<'de, 'a, R: Read> de::EnumAccess<'de> for VariantAccess<'a, R> {
    type Error = CborError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self)> {
        let name = self.de.decoder.next_string()?;
        tracing::trace!(variant = %name, "read variant");
        let name: StringDeserializer<CborError> = name.into_deserializer();
        let value = seed.deserialize(name)?;
        Ok((value, self))
    }
}

impl<'de, 'a, R: Read> de::VariantAccess<'de> for VariantAccess<'a, R> {
    type Error = CborError;

    fn unit_variant(self) -> Result<()> {
        self.de.decoder.next_null()
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(&mut *self.de, len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(&mut *self.de, "", fields, visitor)
    }
}
