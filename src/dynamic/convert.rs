use crate::error::{Error, Result};
use crate::{Compound, DynValue, List, Number, Schema, Tag, Value};

/// Convert a loose tree into a typed NBT tree, picking the tag of every
/// value.
///
/// * Numbers tagged with a width keep that width.
/// * Plain numbers take the width the schema pins, failing if the value
///   does not fit. Unpinned plain integers take the smallest integer tag
///   that holds them, unpinned plain reals are Doubles.
/// * List elements must share a tag: numbers are widened to a common tag,
///   anything else that differs is an error. An empty list keeps the
///   element tag it was read with.
/// * Values whose structure disagrees with the schema are an error.
pub fn to_value(dynamic: &DynValue, schema: &Schema) -> Result<Value> {
    match dynamic {
        DynValue::Number(n) => number_to_value(*n, schema),
        DynValue::String(s) => {
            schema.accepts(Tag::String)?;
            Ok(Value::String(s.clone()))
        }
        DynValue::Data(d) => {
            schema.accepts(Tag::ByteArray)?;
            Ok(Value::ByteArray(d.clone()))
        }
        DynValue::IntArray(ints) => match schema {
            Schema::List(element) => {
                let items: Vec<_> = ints
                    .iter()
                    .map(|&i| DynValue::integer(i as i64))
                    .collect();
                list_to_value(&items, element)
            }
            _ => {
                schema.accepts(Tag::IntArray)?;
                Ok(Value::IntArray(ints.clone()))
            }
        },
        DynValue::List(items) => match schema.tag() {
            Some(Tag::IntArray) => items
                .iter()
                .map(|item| match item {
                    DynValue::Number(n) => {
                        let v = number_as_value(*n);
                        match v.cast(Tag::Int) {
                            Some(Value::Int(i)) => Ok(i),
                            _ => Err(Error::lossy_cast(n, Tag::Int)),
                        }
                    }
                    other => Err(Error::wrong_type(Tag::Int, other.kind_name())),
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::IntArray),
            Some(Tag::List) | None => list_to_value(items, schema.element()),
            Some(expected) => Err(Error::wrong_type(expected, Tag::List)),
        },
        DynValue::EmptyList(element) => match schema.tag() {
            Some(Tag::IntArray) => Ok(Value::IntArray(Vec::new())),
            Some(Tag::List) | None => Ok(Value::List(List::new(
                schema.element().tag().unwrap_or(*element),
            ))),
            Some(expected) => Err(Error::wrong_type(expected, Tag::List)),
        },
        DynValue::Map(entries) => {
            schema.accepts(Tag::Compound)?;
            let mut compound = Compound::with_capacity(entries.len());
            for (key, child) in entries {
                let child = to_value(child, schema.child(key))
                    .map_err(|e| Error::new(e.kind(), format!("{}: {}", key, e)))?;
                compound.insert(key.clone(), child);
            }
            Ok(Value::Compound(compound))
        }
    }
}

/// Convert a typed NBT tree into a loose one. Numbers whose width the
/// schema pins become plain. Every other number stays tagged with its width
/// so it can be written back unchanged, and so does an empty list with a
/// concrete element tag.
pub fn from_value(value: Value, schema: &Schema) -> DynValue {
    let number = |n: Number| {
        if n.tag() == schema.tag() {
            DynValue::Number(n.into_plain())
        } else {
            DynValue::Number(n)
        }
    };

    match value {
        Value::Byte(v) => number(Number::Byte(v)),
        Value::Short(v) => number(Number::Short(v)),
        Value::Int(v) => number(Number::Int(v)),
        Value::Long(v) => number(Number::Long(v)),
        Value::Float(v) => number(Number::Float(v)),
        Value::Double(v) => number(Number::Double(v)),
        Value::ByteArray(d) => DynValue::Data(d),
        Value::String(s) => DynValue::String(s),
        Value::IntArray(ints) => DynValue::IntArray(ints),
        Value::List(list) if list.is_empty() => match (list.element_tag(), schema.element()) {
            (Tag::End, _) => DynValue::List(Vec::new()),
            (tag, Schema::Any) => DynValue::EmptyList(tag),
            _ => DynValue::List(Vec::new()),
        },
        Value::List(list) => {
            let element = schema.element();
            DynValue::List(
                list.into_iter()
                    .map(|item| from_value(item, element))
                    .collect(),
            )
        }
        Value::Compound(compound) => DynValue::Map(
            compound
                .into_iter()
                .map(|(key, child)| {
                    let child = from_value(child, schema.child(&key));
                    (key, child)
                })
                .collect(),
        ),
    }
}

fn number_as_value(n: Number) -> Value {
    match n {
        Number::Byte(v) => Value::Byte(v),
        Number::Short(v) => Value::Short(v),
        Number::Int(v) => Value::Int(v),
        Number::Long(v) | Number::Integer(v) => Value::Long(v),
        Number::Float(v) => Value::Float(v),
        Number::Double(v) | Number::Real(v) => Value::Double(v),
    }
}

fn number_to_value(n: Number, schema: &Schema) -> Result<Value> {
    match schema.tag() {
        Some(expected) if !expected.is_numeric() => Err(Error::wrong_type(expected, "number")),
        _ if !n.is_plain() => Ok(number_as_value(n)),
        Some(expected) => number_as_value(n)
            .cast(expected)
            .ok_or_else(|| Error::lossy_cast(n, expected)),
        None => Ok(match n {
            Number::Integer(i) => Value::smallest_integer(i),
            other => number_as_value(other),
        }),
    }
}

fn list_to_value(items: &[DynValue], element: &Schema) -> Result<Value> {
    let values = items
        .iter()
        .map(|item| to_value(item, element))
        .collect::<Result<Vec<_>>>()?;

    // A tagged number too wide for the pinned element tag widens the list
    // instead.
    let tag = match element.tag() {
        Some(tag) if !tag.is_numeric() || values.iter().all(|v| v.cast(tag).is_some()) => tag,
        _ => common_tag(&values)?,
    };

    let values = values
        .into_iter()
        .map(|v| {
            if v.tag() == tag {
                Ok(v)
            } else if v.tag().is_numeric() && tag.is_numeric() {
                v.cast(tag).ok_or_else(|| Error::lossy_cast(&v, tag))
            } else {
                Err(Error::wrong_type(tag, v.tag()))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if values.is_empty() {
        return Ok(Value::List(List::new(tag)));
    }
    List::from_values(tag, values).map(Value::List)
}

/// The tag every element of a list can be converted to.
fn common_tag(values: &[Value]) -> Result<Tag> {
    let mut tags = values.iter().map(Value::tag);
    let first = match tags.next() {
        Some(t) => t,
        None => return Ok(Tag::End),
    };

    tags.try_fold(first, |acc, t| {
        widen(acc, t).ok_or_else(|| {
            Error::new(
                crate::error::ErrorKind::WrongType,
                format!("list elements of differing types: {} and {}", acc, t),
            )
        })
    })
}

fn widen(a: Tag, b: Tag) -> Option<Tag> {
    if a == b {
        Some(a)
    } else if a.is_integer() && b.is_integer() {
        Some(if a as u8 >= b as u8 { a } else { b })
    } else if a.is_numeric() && b.is_numeric() {
        Some(Tag::Double)
    } else {
        None
    }
}
