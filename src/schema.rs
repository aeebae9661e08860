//! Schemas describe the expected tags of an NBT document.
//!
//! A schema is written in the same loose grammar as the data it describes:
//!
//! * a map corresponds to a compound, its keys to the names of the tags in
//!   the compound and its values to their schemas,
//! * a list must contain exactly one schema, which applies to every element
//!   of the corresponding NBT list,
//! * a string names an atomic tag: `byte`, `short`, `int`, `long`, `float`,
//!   `double`, `data` (byte array), `string` or `intarray`.
//!
//! For example, this schema says `Items` is a list of compounds with four
//! known numerical tags. Other tags in those compounds are allowed and left
//! unconstrained.
//!
//! ```
//! # use nbtcodec::{Schema, Tag};
//! let schema: Schema = serde_json::from_str(r#"{
//!     "Items": [{ "id": "short", "Count": "byte", "Slot": "byte", "Damage": "short" }]
//! }"#).unwrap();
//!
//! assert_eq!(schema.child("Items").element().child("Count").tag(), Some(Tag::Byte));
//! assert!(schema.child("Unknown").is_any());
//! ```
//!
//! The root of a document is a named compound, and its schema a map. The
//! name of the root is not part of the schema.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::{DynValue, Tag};

pub(crate) static ANY: Schema = Schema::Any;

/// Expected shape of a value. See the [module docs][`crate::schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Anything is accepted. Numbers read at this position keep their width.
    Any,
    /// A value with exactly this tag. Numeric tags accept any numeric value
    /// that converts without loss.
    Leaf(Tag),
    /// A list whose elements match the inner schema.
    List(Box<Schema>),
    /// A compound. Listed children must match their schemas, others are
    /// unconstrained.
    Compound(IndexMap<String, Schema>),
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Any
    }
}

impl Schema {
    /// Parse a schema from its loose description.
    pub fn from_dynamic(description: &DynValue) -> Result<Schema> {
        match description {
            DynValue::Map(children) => {
                let mut compound = IndexMap::with_capacity(children.len());
                for (key, child) in children {
                    let child = Schema::from_dynamic(child)
                        .map_err(|e| Error::invalid_schema(format!("{}: {}", key, e)))?;
                    compound.insert(key.clone(), child);
                }
                Ok(Schema::Compound(compound))
            }
            DynValue::List(elements) => match elements.as_slice() {
                [element] => Ok(Schema::List(Box::new(Schema::from_dynamic(element)?))),
                _ => Err(Error::invalid_schema(format!(
                    "list schema must have exactly one element, found {}",
                    elements.len()
                ))),
            },
            DynValue::String(name) => leaf_from_name(name).map(Schema::Leaf),
            other => Err(Error::invalid_schema(format!(
                "schema nodes must be maps, lists or strings, found {}",
                other.kind_name()
            ))),
        }
    }

    /// The tag this schema expects, or None for [`Schema::Any`].
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Schema::Any => None,
            Schema::Leaf(t) => Some(*t),
            Schema::List(_) => Some(Tag::List),
            Schema::Compound(_) => Some(Tag::Compound),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Schema::Any)
    }

    /// True when this schema pins a number width.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Schema::Leaf(t) if t.is_numeric())
    }

    /// Schema of list elements. Any, unless this is a list schema.
    pub fn element(&self) -> &Schema {
        match self {
            Schema::List(element) => element,
            _ => &ANY,
        }
    }

    /// Schema of the compound child `key`. Any, if the key is not described
    /// or this is not a compound schema.
    pub fn child(&self, key: &str) -> &Schema {
        match self {
            Schema::Compound(children) => children.get(key).unwrap_or(&ANY),
            _ => &ANY,
        }
    }

    /// Whether a value with the wire tag `found` may appear here.
    pub(crate) fn accepts(&self, found: Tag) -> Result<()> {
        match self.tag() {
            None => Ok(()),
            Some(expected) if expected == found => Ok(()),
            Some(expected) if expected.is_numeric() && found.is_numeric() => Ok(()),
            Some(expected) => Err(Error::wrong_type(expected, found)),
        }
    }
}

fn leaf_from_name(name: &str) -> Result<Tag> {
    Ok(match name {
        "byte" => Tag::Byte,
        "short" => Tag::Short,
        "int" => Tag::Int,
        "long" => Tag::Long,
        "float" => Tag::Float,
        "double" => Tag::Double,
        "data" => Tag::ByteArray,
        "string" => Tag::String,
        "intarray" => Tag::IntArray,
        _ => {
            return Err(Error::invalid_schema(format!(
                "unknown schema type name: {:?}",
                name
            )))
        }
    })
}

fn name_from_leaf(tag: Tag) -> &'static str {
    match tag {
        Tag::Byte => "byte",
        Tag::Short => "short",
        Tag::Int => "int",
        Tag::Long => "long",
        Tag::Float => "float",
        Tag::Double => "double",
        Tag::ByteArray => "data",
        Tag::String => "string",
        Tag::IntArray => "intarray",
        Tag::List => "list",
        Tag::Compound => "compound",
        Tag::End => "end",
    }
}

/// Renders the schema in its own grammar, with `*` for Any.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Any => f.write_str("*"),
            Schema::Leaf(tag) => f.write_str(name_from_leaf(*tag)),
            Schema::List(element) => write!(f, "[{}]", element),
            Schema::Compound(children) => {
                f.write_str("{")?;
                for (i, (key, child)) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, child)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let description = DynValue::deserialize(deserializer)?;
        Schema::from_dynamic(&description).map_err(serde::de::Error::custom)
    }
}
