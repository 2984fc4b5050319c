use std::slice;

use serde::{
    de::{value::BytesDeserializer, DeserializeSeed, MapAccess, SeqAccess, Visitor},
    Deserializer,
};

use crate::{ElementRecord, PlyError, PropertyValue, ScalarValue};

/// Presents a decoded record to serde as a map keyed by property name.
pub(crate) struct RecordDeserializer<'a> {
    record: &'a ElementRecord,
}

impl<'a> RecordDeserializer<'a> {
    pub fn new(record: &'a ElementRecord) -> Self {
        Self { record }
    }
}

impl<'de, 'a> Deserializer<'de> for RecordDeserializer<'a> {
    type Error = PlyError;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(PlyError::RowMustBeStructOrMap)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(RecordMapAccess {
            fields: &self.record.fields,
            current_property: 0,
        })
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 i64 u64 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}

struct RecordMapAccess<'a> {
    fields: &'a [(String, PropertyValue)],
    current_property: usize,
}

impl<'de, 'a> MapAccess<'de> for RecordMapAccess<'a> {
    type Error = PlyError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((name, _)) = self.fields.get(self.current_property) else {
            return Ok(None);
        };
        seed.deserialize(BytesDeserializer::<PlyError>::new(name.as_bytes()))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let Some((_, value)) = self.fields.get(self.current_property) else {
            return Err(PlyError::Serde("value requested past the last property".to_string()));
        };
        self.current_property += 1;
        seed.deserialize(ValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len() - self.current_property)
    }
}

struct ValueDeserializer<'a> {
    value: &'a PropertyValue,
}

impl<'de, 'a> Deserializer<'de> for ValueDeserializer<'a> {
    type Error = PlyError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            PropertyValue::Scalar(value) => visit_scalar(*value, visitor),
            PropertyValue::List(values) => visitor.visit_seq(ListSeqAccess {
                values: values.iter(),
            }),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // PLY properties are always present if defined in header
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 f32 f64 i128 i64 u128 u64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct ListSeqAccess<'a> {
    values: slice::Iter<'a, ScalarValue>,
}

impl<'de, 'a> SeqAccess<'de> for ListSeqAccess<'a> {
    type Error = PlyError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(value) = self.values.next() else {
            return Ok(None);
        };
        seed.deserialize(ScalarDeserializer(*value)).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

struct ScalarDeserializer(ScalarValue);

impl<'de> Deserializer<'de> for ScalarDeserializer {
    type Error = PlyError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visit_scalar(self.0, visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 f32 f64 i128 i64 u128 u64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

fn visit_scalar<'de, V: Visitor<'de>>(value: ScalarValue, visitor: V) -> Result<V::Value, PlyError> {
    match value {
        ScalarValue::I8(v) => visitor.visit_i8(v),
        ScalarValue::U8(v) => visitor.visit_u8(v),
        ScalarValue::I16(v) => visitor.visit_i16(v),
        ScalarValue::U16(v) => visitor.visit_u16(v),
        ScalarValue::I32(v) => visitor.visit_i32(v),
        ScalarValue::U32(v) => visitor.visit_u32(v),
        ScalarValue::F32(v) => visitor.visit_f32(v),
        ScalarValue::F64(v) => visitor.visit_f64(v),
    }
}
