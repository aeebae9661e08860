use indexmap::IndexMap;
use serde::{de::Visitor, Deserialize};

use crate::{DynValue, Number};

impl<'de> Deserialize<'de> for DynValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DynValueVisitor)
    }
}

struct DynValueVisitor;

// Formats that report a narrow integer type (i8 to i32, f32) get tagged
// numbers. Formats like JSON only report i64/u64/f64, which carry no width.
impl<'de> Visitor<'de> for DynValueVisitor {
    type Value = DynValue;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map, sequence, string, byte buffer or number")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::integer(v as i64))
    }

    fn visit_i8<E>(self, v: i8) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Number(Number::Byte(v)))
    }

    fn visit_i16<E>(self, v: i16) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Number(Number::Short(v)))
    }

    fn visit_i32<E>(self, v: i32) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Number(Number::Int(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(v)
            .map(DynValue::integer)
            .map_err(|_| E::custom(format!("integer {} is too large for NBT", v)))
    }

    fn visit_f32<E>(self, v: f32) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Number(Number::Float(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::real(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::String(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Data(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DynValue::Data(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut v = Vec::<DynValue>::with_capacity(seq.size_hint().unwrap_or(0).min(4096));

        while let Some(el) = seq.next_element()? {
            v.push(el);
        }

        Ok(DynValue::List(v))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries = IndexMap::new();
        while let Some((key, value)) = map.next_entry::<String, DynValue>()? {
            entries.insert(key, value);
        }

        Ok(DynValue::Map(entries))
    }
}
