mod list;

use indexmap::IndexMap;

use crate::Tag;

pub use self::list::List;

/// The children of a compound, by name. Insertion order is kept so that
/// written output follows the order data was read or built in, but it plays
/// no part in equality.
pub type Compound = IndexMap<String, Value>;

/// Value is a complete NBT value, typed exactly as it appears on the wire.
/// It owns its data. Compounds and Lists are recursively stored.
///
/// The name of a value is the key it is stored under in its parent
/// [`Compound`]. List elements have no names. The name of the root is kept
/// alongside the root rather than inside it.
///
/// ```
/// # use nbtcodec::{Compound, Value};
/// let mut level = Compound::new();
/// level.insert("hp".to_owned(), Value::Short(20));
///
/// let bytes = nbtcodec::ser::to_vec("", &Value::Compound(level), &Default::default()).unwrap();
/// assert_eq!(bytes[0], 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
}

impl Value {
    /// The tag this value is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// The narrowest integer tag that holds `n` exactly.
    pub fn smallest_integer(n: i64) -> Value {
        if let Ok(b) = i8::try_from(n) {
            Value::Byte(b)
        } else if let Ok(s) = i16::try_from(n) {
            Value::Short(s)
        } else if let Ok(i) = i32::try_from(n) {
            Value::Int(i)
        } else {
            Value::Long(n)
        }
    }

    /// Convert a number to another numeric tag without losing information.
    ///
    /// Integers convert to any integer tag they fit in, and to floating
    /// point when the result is exact. Floating point converts to an integer
    /// tag only when it is integral and in range, and to `Float` only when
    /// no precision is lost. Returns `None` for non-numeric values or targets
    /// and for lossy conversions.
    pub fn cast(&self, target: Tag) -> Option<Value> {
        if self.tag() == target {
            return Some(self.clone());
        }

        match *self {
            Value::Byte(v) => cast_integer(v as i64, target),
            Value::Short(v) => cast_integer(v as i64, target),
            Value::Int(v) => cast_integer(v as i64, target),
            Value::Long(v) => cast_integer(v, target),
            Value::Float(v) => cast_real(v as f64, target),
            Value::Double(v) => cast_real(v, target),
            _ => None,
        }
    }
}

fn cast_integer(n: i64, target: Tag) -> Option<Value> {
    match target {
        Tag::Byte => i8::try_from(n).ok().map(Value::Byte),
        Tag::Short => i16::try_from(n).ok().map(Value::Short),
        Tag::Int => i32::try_from(n).ok().map(Value::Int),
        Tag::Long => Some(Value::Long(n)),
        // Float to int casts saturate, comparing in i128 catches the values
        // that round up past i64::MAX.
        Tag::Float => {
            let f = n as f32;
            (f as i128 == n as i128).then(|| Value::Float(f))
        }
        Tag::Double => {
            let d = n as f64;
            (d as i128 == n as i128).then(|| Value::Double(d))
        }
        _ => None,
    }
}

fn cast_real(x: f64, target: Tag) -> Option<Value> {
    match target {
        Tag::Float => {
            let f = x as f32;
            (f as f64 == x || x.is_nan()).then(|| Value::Float(f))
        }
        Tag::Double => Some(Value::Double(x)),
        t if t.is_integer() => {
            let bound = -(i64::MIN as f64);
            if !x.is_finite() || x.fract() != 0.0 || x < -bound || x >= bound {
                return None;
            }
            cast_integer(x as i64, t)
        }
        _ => None,
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<u8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
