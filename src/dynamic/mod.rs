//! The loosely typed tree applications exchange with the codec.
//!
//! [`DynValue`] only distinguishes maps, lists, strings, byte buffers, int
//! arrays and numbers. The NBT width of a number is optional: a
//! [`Number`] either carries the tag it was read with (so it is written
//! back with the same tag) or is plain, in which case a schema or the
//! smallest-type rule picks its width when written.
mod convert;
mod de;
mod ser;

use indexmap::IndexMap;

use crate::{Tag, Value};

pub use self::convert::{from_value, to_value};

/// A number, either tagged with its NBT width or plain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// An integer with no particular width.
    Integer(i64),
    /// A floating point number with no particular width. Written as Double
    /// unless a schema says otherwise.
    Real(f64),
}

impl Number {
    /// The width this number is tagged with, None for plain numbers.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Number::Byte(_) => Some(Tag::Byte),
            Number::Short(_) => Some(Tag::Short),
            Number::Int(_) => Some(Tag::Int),
            Number::Long(_) => Some(Tag::Long),
            Number::Float(_) => Some(Tag::Float),
            Number::Double(_) => Some(Tag::Double),
            Number::Integer(_) | Number::Real(_) => None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.tag().is_none()
    }

    /// Drop the width tag, keeping the value.
    pub fn into_plain(self) -> Number {
        match self {
            Number::Byte(v) => Number::Integer(v as i64),
            Number::Short(v) => Number::Integer(v as i64),
            Number::Int(v) => Number::Integer(v as i64),
            Number::Long(v) => Number::Integer(v),
            Number::Float(v) => Number::Real(v as f64),
            Number::Double(v) => Number::Real(v),
            plain => plain,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Byte(v) => Some(v as i64),
            Number::Short(v) => Some(v as i64),
            Number::Int(v) => Some(v as i64),
            Number::Long(v) | Number::Integer(v) => Some(v),
            Number::Float(v) => real_as_i64(v as f64),
            Number::Double(v) | Number::Real(v) => real_as_i64(v),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Byte(v) => v as f64,
            Number::Short(v) => v as f64,
            Number::Int(v) => v as f64,
            Number::Long(v) | Number::Integer(v) => v as f64,
            Number::Float(v) => v as f64,
            Number::Double(v) | Number::Real(v) => v,
        }
    }
}

// Float to int casts saturate, so only whole values inside the range of an
// i64 convert.
fn real_as_i64(x: f64) -> Option<i64> {
    match Value::Double(x).cast(Tag::Long) {
        Some(Value::Long(v)) => Some(v),
        _ => None,
    }
}

/// A loosely typed NBT tree.
///
/// ```
/// # use nbtcodec::{DynValue, Number};
/// let v: DynValue = serde_json::from_str(r#"{ "name": "Steve", "hp": 20 }"#).unwrap();
/// assert_eq!(v.get("hp"), Some(&DynValue::Number(Number::Integer(20))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    Map(IndexMap<String, DynValue>),
    List(Vec<DynValue>),
    /// An empty list read with a concrete element tag. It is written back
    /// with that tag unless a schema names another one.
    EmptyList(Tag),
    /// A sequence of 32 bit integers stored as an NBT IntArray.
    IntArray(Vec<i32>),
    String(String),
    /// Raw bytes, stored as an NBT ByteArray.
    Data(Vec<u8>),
    Number(Number),
}

impl DynValue {
    /// A plain integer, written with the smallest fitting width.
    pub fn integer(n: i64) -> Self {
        DynValue::Number(Number::Integer(n))
    }

    /// A plain floating point number.
    pub fn real(x: f64) -> Self {
        DynValue::Number(Number::Real(x))
    }

    pub fn get(&self, key: &str) -> Option<&DynValue> {
        match self {
            DynValue::Map(m) => m.get(key),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            DynValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            DynValue::Map(_) => "map",
            DynValue::List(_) => "list",
            DynValue::EmptyList(_) => "empty list",
            DynValue::IntArray(_) => "int array",
            DynValue::String(_) => "string",
            DynValue::Data(_) => "data",
            DynValue::Number(_) => "number",
        }
    }
}

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for DynValue {
            fn from(val: $type) -> Self {
                DynValue::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(Number, Number);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<u8>, Data);
from!(Vec<i32>, IntArray);
from!(Vec<DynValue>, List);
from!(IndexMap<String, DynValue>, Map);
