use serde::ser::{SerializeMap, SerializeSeq};
use serde::Serialize;

use crate::{DynValue, Number};

impl Serialize for DynValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            DynValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            DynValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DynValue::EmptyList(_) => serializer.serialize_seq(Some(0))?.end(),
            DynValue::IntArray(ints) => ints.serialize(serializer),
            DynValue::String(s) => serializer.serialize_str(s),
            DynValue::Data(data) => serde_bytes::Bytes::new(data).serialize(serializer),
            DynValue::Number(n) => n.serialize(serializer),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Number::Byte(v) => serializer.serialize_i8(v),
            Number::Short(v) => serializer.serialize_i16(v),
            Number::Int(v) => serializer.serialize_i32(v),
            Number::Long(v) | Number::Integer(v) => serializer.serialize_i64(v),
            Number::Float(v) => serializer.serialize_f32(v),
            Number::Double(v) | Number::Real(v) => serializer.serialize_f64(v),
        }
    }
}
