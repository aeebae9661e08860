use num_enum::TryFromPrimitive;

use crate::error::ErrorKind;
use crate::Tag;



#[allow(clippy::float_cmp)]
mod dynamic;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
            assert_eq!(Tag::try_from($val as u8), Ok(Tag::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
    }

    for value in 12..=u8::MAX {
        assert!(Tag::try_from(value).is_err())
    }
}

#[test]
fn numeric_tags() {
    let numeric: Vec<_> = (0..=11u8)
        .filter_map(|b| Tag::try_from(b).ok())
        .filter(|t| t.is_numeric())
        .collect();
    assert_eq!(
        numeric,
        [Tag::Byte, Tag::Short, Tag::Int, Tag::Long, Tag::Float, Tag::Double]
    );
    assert!(Tag::Long.is_integer());
    assert!(!Tag::Float.is_integer());
    assert_eq!(Tag::IntArray.to_string(), "TAG_Int_Array");
}

#[test]
fn stable_error_codes() {
    let kinds = [
        ErrorKind::NoError,
        ErrorKind::Memory,
        ErrorKind::Read,
        ErrorKind::Write,
        ErrorKind::Compression,
        ErrorKind::UnknownTag,
        ErrorKind::WrongType,
        ErrorKind::ObjectTooLarge,
        ErrorKind::WrongRootName,
        ErrorKind::InvalidSchema,
    ];

    for (code, kind) in kinds.iter().enumerate() {
        assert_eq!(u8::from(*kind), code as u8);
        assert_eq!(ErrorKind::try_from_primitive(code as u8).unwrap(), *kind);
    }
    assert!(ErrorKind::try_from_primitive(10u8).is_err());
}
