//! serde serializer building a [`FieldValue`] tree
//!
//! Shapes follow serde_json's data model (unit is null, enum variants are
//! externally tagged) but floats are kept as they are, so a non-finite
//! value still fails later when the record is serialized as JSON.

use super::field_value::FieldValue;
use serde::ser::{self, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ConversionError(String);

impl ser::Error for ConversionError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ConversionError(msg.to_string())
    }
}

type Result<T> = std::result::Result<T, ConversionError>;

/// Convert `value`, failing on shapes a JSON object cannot hold
pub(crate) fn to_field_value<T: Serialize + ?Sized>(value: &T) -> Result<FieldValue> {
    value.serialize(FieldValueSerializer)
}

fn unsigned(u: u64) -> FieldValue {
    match i64::try_from(u) {
        Ok(i) => FieldValue::Int(i),
        Err(_) => FieldValue::UInt(u),
    }
}

fn tagged(variant: Option<&'static str>, value: FieldValue) -> FieldValue {
    match variant {
        None => value,
        Some(name) => {
            let mut map = BTreeMap::new();
            map.insert(name.to_string(), value);
            FieldValue::Map(map)
        }
    }
}

fn map_key(key: FieldValue) -> Result<String> {
    match key {
        FieldValue::String(s) => Ok(s),
        FieldValue::Int(i) => Ok(i.to_string()),
        FieldValue::UInt(u) => Ok(u.to_string()),
        FieldValue::Bool(b) => Ok(b.to_string()),
        other => Err(ConversionError(format!("key must be a string, got {:?}", other))),
    }
}

struct FieldValueSerializer;

impl ser::Serializer for FieldValueSerializer {
    type Ok = FieldValue;
    type Error = ConversionError;
    type SerializeSeq = ListBuilder;
    type SerializeTuple = ListBuilder;
    type SerializeTupleStruct = ListBuilder;
    type SerializeTupleVariant = ListBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = MapBuilder;

    fn serialize_bool(self, v: bool) -> Result<FieldValue> {
        Ok(FieldValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<FieldValue> {
        Ok(FieldValue::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<FieldValue> {
        Ok(FieldValue::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<FieldValue> {
        Ok(FieldValue::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<FieldValue> {
        Ok(FieldValue::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<FieldValue> {
        Ok(unsigned(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<FieldValue> {
        Ok(unsigned(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<FieldValue> {
        Ok(unsigned(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<FieldValue> {
        Ok(unsigned(v))
    }

    fn serialize_f32(self, v: f32) -> Result<FieldValue> {
        Ok(FieldValue::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<FieldValue> {
        Ok(FieldValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<FieldValue> {
        Ok(FieldValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<FieldValue> {
        Ok(FieldValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<FieldValue> {
        Ok(FieldValue::List(v.iter().map(|b| FieldValue::Int((*b).into())).collect()))
    }

    fn serialize_none(self) -> Result<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<FieldValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FieldValue> {
        Ok(FieldValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<FieldValue> {
        Ok(FieldValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<FieldValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<FieldValue> {
        Ok(tagged(Some(variant), value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListBuilder> {
        Ok(ListBuilder::new(None, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListBuilder> {
        Ok(ListBuilder::new(None, Some(len)))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ListBuilder> {
        Ok(ListBuilder::new(None, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<ListBuilder> {
        Ok(ListBuilder::new(Some(variant), Some(len)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder> {
        Ok(MapBuilder::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapBuilder> {
        Ok(MapBuilder::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapBuilder> {
        Ok(MapBuilder::new(Some(variant)))
    }
}

struct ListBuilder {
    variant: Option<&'static str>,
    items: Vec<FieldValue>,
}

impl ListBuilder {
    fn new(variant: Option<&'static str>, len: Option<usize>) -> Self {
        Self {
            variant,
            items: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(FieldValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<FieldValue> {
        Ok(tagged(self.variant, FieldValue::List(self.items)))
    }
}

impl ser::SerializeSeq for ListBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

impl ser::SerializeTuple for ListBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for ListBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for ListBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

struct MapBuilder {
    variant: Option<&'static str>,
    entries: BTreeMap<String, FieldValue>,
    pending_key: Option<String>,
}

impl MapBuilder {
    fn new(variant: Option<&'static str>) -> Self {
        Self {
            variant,
            entries: BTreeMap::new(),
            pending_key: None,
        }
    }

    fn insert<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<()> {
        self.entries.insert(key, value.serialize(FieldValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<FieldValue> {
        Ok(tagged(self.variant, FieldValue::Map(self.entries)))
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(map_key(key.serialize(FieldValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ConversionError("map value without a key".to_string()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for MapBuilder {
    type Ok = FieldValue;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<FieldValue> {
        self.finish()
    }
}
