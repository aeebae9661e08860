use indexmap::IndexMap;

use crate::dynamic::{from_value, to_value};
use crate::error::{ErrorKind, Result};
use crate::{Compound, DynValue, List, Number, Schema, Tag, Value};

fn json(s: &str) -> DynValue {
    serde_json::from_str(s).unwrap()
}

fn schema(s: &str) -> Schema {
    serde_json::from_str(s).unwrap()
}

fn map(entries: Vec<(&str, DynValue)>) -> DynValue {
    DynValue::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect(),
    )
}

fn child<'a>(v: &'a Value, key: &str) -> &'a Value {
    &v.as_compound().unwrap()[key]
}

#[test]
fn json_numbers_are_plain() {
    let v = json(r#"{ "a": 1, "b": -2.5, "c": true }"#);
    assert_eq!(v.get("a"), Some(&DynValue::integer(1)));
    assert_eq!(v.get("b"), Some(&DynValue::real(-2.5)));
    assert_eq!(v.get("c"), Some(&DynValue::integer(1)));
}

#[test]
fn json_keeps_key_order() {
    let v = json(r#"{ "z": 1, "a": 2, "m": 3 }"#);
    match v {
        DynValue::Map(m) => {
            let keys: Vec<_> = m.keys().map(String::as_str).collect();
            assert_eq!(keys, ["z", "a", "m"]);
        }
        other => panic!("expected map, got {:?}", other),
    }
}

#[test]
fn smallest_type_without_schema() -> Result<()> {
    let v = to_value(
        &json(r#"{ "a": 127, "b": 128, "c": 32768, "d": 2147483648, "e": 0.5 }"#),
        &Schema::Any,
    )?;

    assert_eq!(child(&v, "a"), &Value::Byte(127));
    assert_eq!(child(&v, "b"), &Value::Short(128));
    assert_eq!(child(&v, "c"), &Value::Int(32768));
    assert_eq!(child(&v, "d"), &Value::Long(2147483648));
    assert_eq!(child(&v, "e"), &Value::Double(0.5));
    Ok(())
}

#[test]
fn schema_pins_number_widths() -> Result<()> {
    let v = to_value(
        &json(r#"{ "hp": 20, "x": 1.5, "n": 3 }"#),
        &schema(r#"{ "hp": "short", "x": "float", "n": "double" }"#),
    )?;

    assert_eq!(child(&v, "hp"), &Value::Short(20));
    assert_eq!(child(&v, "x"), &Value::Float(1.5));
    assert_eq!(child(&v, "n"), &Value::Double(3.0));
    Ok(())
}

#[test]
fn schema_rejects_numbers_that_do_not_fit() {
    let err = to_value(&json(r#"{ "b": 300 }"#), &schema(r#"{ "b": "byte" }"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);

    let err = to_value(&json(r#"{ "i": 1.5 }"#), &schema(r#"{ "i": "int" }"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);
}

#[test]
fn schema_rejects_wrong_structure() {
    let cases = [
        (r#"{ "a": "text" }"#, r#"{ "a": "int" }"#),
        (r#"{ "a": 1 }"#, r#"{ "a": "string" }"#),
        (r#"{ "a": [1] }"#, r#"{ "a": {} }"#),
        (r#"{ "a": {} }"#, r#"{ "a": ["int"] }"#),
        (r#"{ "a": [1] }"#, r#"{ "a": "data" }"#),
    ];

    for (data, s) in cases {
        let err = to_value(&json(data), &schema(s)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongType, "{} against {}", data, s);
    }
}

#[test]
fn tagged_numbers_keep_their_width() -> Result<()> {
    let v = map(vec![
        ("a", DynValue::Number(Number::Long(1))),
        ("b", DynValue::Number(Number::Float(2.0))),
    ]);

    let tree = to_value(&v, &schema(r#"{ "a": "byte", "b": "double" }"#))?;
    assert_eq!(child(&tree, "a"), &Value::Long(1));
    assert_eq!(child(&tree, "b"), &Value::Float(2.0));
    Ok(())
}

#[test]
fn list_elements_are_widened() -> Result<()> {
    let v = to_value(
        &json(r#"{ "ints": [1, 300, 70000], "mixed": [1, 0.5], "empty": [] }"#),
        &Schema::Any,
    )?;

    let ints = child(&v, "ints").as_list().unwrap();
    assert_eq!(ints.element_tag(), Tag::Int);
    assert_eq!(ints.get(0), Some(&Value::Int(1)));
    assert_eq!(ints.get(2), Some(&Value::Int(70000)));

    let mixed = child(&v, "mixed").as_list().unwrap();
    assert_eq!(mixed.element_tag(), Tag::Double);
    assert_eq!(mixed.get(0), Some(&Value::Double(1.0)));

    assert_eq!(child(&v, "empty"), &Value::List(List::empty()));
    Ok(())
}

#[test]
fn list_elements_of_different_kinds() {
    let err = to_value(&json(r#"{ "l": [1, "two"] }"#), &Schema::Any).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);

    let err = to_value(&json(r#"{ "l": [{}, []] }"#), &Schema::Any).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);
}

#[test]
fn list_schema_pins_element_tag() -> Result<()> {
    let v = to_value(
        &json(r#"{ "Pos": [0, 64, 0.5], "Tags": [] }"#),
        &schema(r#"{ "Pos": ["double"], "Tags": ["string"] }"#),
    )?;

    let pos = child(&v, "Pos").as_list().unwrap();
    assert_eq!(pos.element_tag(), Tag::Double);
    assert_eq!(pos.get(1), Some(&Value::Double(64.0)));

    assert_eq!(child(&v, "Tags"), &Value::List(List::new(Tag::String)));
    Ok(())
}

#[test]
fn int_arrays() -> Result<()> {
    let v = to_value(
        &json(r#"{ "HeightMap": [1, 2, 300], "Ids": [1, 2] }"#),
        &schema(r#"{ "HeightMap": "intarray" }"#),
    )?;

    assert_eq!(child(&v, "HeightMap"), &Value::IntArray(vec![1, 2, 300]));
    assert_eq!(child(&v, "Ids").tag(), Tag::List);

    let err = to_value(
        &json(r#"{ "HeightMap": [3000000000] }"#),
        &schema(r#"{ "HeightMap": "intarray" }"#),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);

    // Int arrays can also be written out as lists.
    let v = map(vec![("a", DynValue::IntArray(vec![1, 2]))]);
    let tree = to_value(&v, &schema(r#"{ "a": ["short"] }"#))?;
    let list = child(&tree, "a").as_list().unwrap();
    assert_eq!(list.element_tag(), Tag::Short);
    assert_eq!(list.len(), 2);
    Ok(())
}

#[test]
fn data_is_a_byte_array() -> Result<()> {
    let v = map(vec![("Blocks", DynValue::Data(vec![1, 2, 3]))]);
    let tree = to_value(&v, &Schema::Any)?;
    assert_eq!(child(&tree, "Blocks"), &Value::ByteArray(vec![1, 2, 3]));
    Ok(())
}

#[test]
fn errors_name_the_failing_key() {
    let err = to_value(
        &json(r#"{ "outer": { "inner": "x" } }"#),
        &schema(r#"{ "outer": { "inner": "int" } }"#),
    )
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("outer"), "{}", msg);
    assert!(msg.contains("inner"), "{}", msg);
}

#[test]
fn from_value_tags_unpinned_numbers() {
    let mut c = Compound::new();
    c.insert("hp".to_owned(), Value::Short(20));
    c.insert("x".to_owned(), Value::Float(1.5));
    c.insert("name".to_owned(), Value::String("Steve".to_owned()));

    let v = from_value(Value::Compound(c), &schema(r#"{ "hp": "short" }"#));

    assert_eq!(v.get("hp"), Some(&DynValue::integer(20)));
    assert_eq!(v.get("x"), Some(&DynValue::Number(Number::Float(1.5))));
    assert_eq!(v.get("name").and_then(DynValue::as_str), Some("Steve"));
}

#[test]
fn from_value_lists() {
    let list = List::from_values(Tag::Byte, vec![Value::Byte(1), Value::Byte(2)]).unwrap();
    let mut c = Compound::new();
    c.insert("l".to_owned(), Value::List(list.clone()));
    c.insert("p".to_owned(), Value::List(list));

    let v = from_value(Value::Compound(c), &schema(r#"{ "p": ["byte"] }"#));

    assert_eq!(
        v.get("l"),
        Some(&DynValue::List(vec![
            DynValue::Number(Number::Byte(1)),
            DynValue::Number(Number::Byte(2)),
        ]))
    );
    assert_eq!(
        v.get("p"),
        Some(&DynValue::List(vec![DynValue::integer(1), DynValue::integer(2)]))
    );
}

#[test]
fn from_value_keeps_widths_the_schema_does_not_match() {
    let mut c = Compound::new();
    c.insert("hp".to_owned(), Value::Int(100000));
    let v = from_value(Value::Compound(c), &schema(r#"{ "hp": "short" }"#));

    assert_eq!(v.get("hp"), Some(&DynValue::Number(Number::Int(100000))));
}

#[test]
fn wide_tagged_numbers_widen_pinned_lists() -> Result<()> {
    let v = map(vec![(
        "l",
        DynValue::List(vec![
            DynValue::integer(1),
            DynValue::Number(Number::Int(100000)),
        ]),
    )]);

    let tree = to_value(&v, &schema(r#"{ "l": ["short"] }"#))?;
    let l = child(&tree, "l").as_list().unwrap();
    assert_eq!(l.element_tag(), Tag::Int);
    assert_eq!(l.get(0), Some(&Value::Int(1)));
    Ok(())
}

#[test]
fn empty_lists_keep_their_element_tag() -> Result<()> {
    let mut c = Compound::new();
    c.insert("ints".to_owned(), Value::List(List::new(Tag::Int)));
    c.insert("pinned".to_owned(), Value::List(List::new(Tag::Int)));
    c.insert("none".to_owned(), Value::List(List::empty()));
    let tree = Value::Compound(c);

    let v = from_value(tree.clone(), &schema(r#"{ "pinned": ["int"] }"#));
    assert_eq!(v.get("ints"), Some(&DynValue::EmptyList(Tag::Int)));
    assert_eq!(v.get("pinned"), Some(&DynValue::List(vec![])));
    assert_eq!(v.get("none"), Some(&DynValue::List(vec![])));

    assert_eq!(to_value(&v, &schema(r#"{ "pinned": ["int"] }"#))?, tree);
    Ok(())
}

#[test]
fn empty_list_under_a_schema() -> Result<()> {
    let empty = DynValue::EmptyList(Tag::Int);

    assert_eq!(
        to_value(&empty, &schema(r#"["long"]"#))?,
        Value::List(List::new(Tag::Long))
    );
    assert_eq!(
        to_value(&empty, &schema(r#""intarray""#))?,
        Value::IntArray(vec![])
    );

    let err = to_value(&empty, &schema(r#""string""#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongType);
    Ok(())
}

#[test]
fn tagged_values_survive_a_round_trip() -> Result<()> {
    let mut c = Compound::new();
    c.insert("b".to_owned(), Value::Byte(1));
    c.insert("l".to_owned(), Value::Long(1));
    c.insert("f".to_owned(), Value::Float(1.0));
    c.insert("ia".to_owned(), Value::IntArray(vec![5]));
    let tree = Value::Compound(c);

    let dynamic = from_value(tree.clone(), &Schema::Any);
    assert_eq!(to_value(&dynamic, &Schema::Any)?, tree);
    Ok(())
}

#[test]
fn number_accessors() {
    assert_eq!(Number::Short(3).tag(), Some(Tag::Short));
    assert_eq!(Number::Integer(3).tag(), None);
    assert!(Number::Real(1.0).is_plain());
    assert_eq!(Number::Float(2.0).into_plain(), Number::Real(2.0));
    assert_eq!(Number::Double(2.5).as_i64(), None);
    assert_eq!(Number::Double(2.0).as_i64(), Some(2));
    assert_eq!(Number::Real(1e30).as_i64(), None);
    assert_eq!(Number::Real(-1e30).as_i64(), None);
    assert_eq!(Number::Float(f32::INFINITY).as_i64(), None);
    assert_eq!(Number::Real(i64::MIN as f64).as_i64(), Some(i64::MIN));
    assert_eq!(Number::Byte(-1).as_f64(), -1.0);
}

#[test]
fn serializes_to_json() {
    let mut entries = IndexMap::new();
    entries.insert("hp".to_owned(), DynValue::Number(Number::Short(20)));
    entries.insert("name".to_owned(), DynValue::from("Steve"));
    entries.insert("pos".to_owned(), DynValue::List(vec![DynValue::real(0.5)]));
    entries.insert("ids".to_owned(), DynValue::IntArray(vec![1, 2]));
    entries.insert("none".to_owned(), DynValue::EmptyList(Tag::Int));

    let s = serde_json::to_string(&DynValue::Map(entries)).unwrap();
    assert_eq!(
        s,
        r#"{"hp":20,"name":"Steve","pos":[0.5],"ids":[1,2],"none":[]}"#
    );
}
