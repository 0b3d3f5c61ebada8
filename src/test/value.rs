use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{from_value, nbt, to_value, ErrorKind, Value};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Section {
    y: i8,
    blocks: Vec<i64>,
    name: String,
}

#[test]
fn struct_to_tree_and_back() {
    let section = Section {
        y: -4,
        blocks: vec![1, 2, 3],
        name: "minecraft:plains".to_owned(),
    };

    let v = to_value(&section).unwrap();
    assert_eq!(
        v,
        nbt!({
            "y": -4i8,
            "blocks": [1i64, 2i64, 3i64],
            "name": "minecraft:plains",
        })
    );

    assert_eq!(from_value::<Section>(&v).unwrap(), section);
}

#[test]
fn scalars_map_one_to_one() {
    assert_eq!(to_value(1i8).unwrap(), Value::Byte(1));
    assert_eq!(to_value(1i16).unwrap(), Value::Short(1));
    assert_eq!(to_value(1i32).unwrap(), Value::Int(1));
    assert_eq!(to_value(1i64).unwrap(), Value::Long(1));
    assert_eq!(to_value(1.0f32).unwrap(), Value::Float(1.0));
    assert_eq!(to_value(1.0f64).unwrap(), Value::Double(1.0));
    assert_eq!(to_value(true).unwrap(), Value::Byte(1));
    assert_eq!(to_value("s").unwrap(), Value::String("s".to_owned()));
}

#[test]
fn unsigned_values_keep_their_bits() {
    assert_eq!(to_value(255u8).unwrap(), Value::Byte(-1));
    assert_eq!(to_value(65535u16).unwrap(), Value::Short(-1));
    assert_eq!(to_value(5u64).unwrap(), Value::Long(5));
    // Except a u64 beyond the long range, which has no lossless home.
    let err = to_value(u64::MAX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn maps_need_string_keys() {
    let mut good = HashMap::new();
    good.insert("a".to_owned(), 1);
    assert_eq!(to_value(&good).unwrap(), nbt!({"a": 1}));

    let mut bad = HashMap::new();
    bad.insert(1, 2);
    let err = to_value(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn sequences_become_lists_not_arrays() {
    // The bridge does not guess at array intent; the tree owner opts in by
    // building Value::ByteArray and friends directly.
    assert_eq!(to_value(vec![1i8, 2]).unwrap(), nbt!([1i8, 2i8]));
    assert!(matches!(to_value(vec![1i8, 2]).unwrap(), Value::List(_)));
}

#[test]
fn arrays_cross_as_scalar_sequences() {
    // Value -> T sees an array as a sequence of its scalars.
    let v = nbt!({"bytes": [B; 1, 2], "longs": [L; 9]});

    #[derive(Deserialize, Debug, PartialEq)]
    struct Holder {
        bytes: Vec<i8>,
        longs: Vec<i64>,
    }

    let h: Holder = from_value(&v).unwrap();
    assert_eq!(
        h,
        Holder {
            bytes: vec![1, 2],
            longs: vec![9],
        }
    );
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Kind {
    Empty,
    Wrapped(i32),
    Record { x: i32, y: i32 },
}

#[test]
fn unit_variants_are_strings() {
    let v = to_value(Kind::Empty).unwrap();
    assert_eq!(v, Value::String("Empty".to_owned()));
    assert_eq!(from_value::<Kind>(&v).unwrap(), Kind::Empty);
}

#[test]
fn data_variants_are_single_entry_compounds() {
    let v = to_value(Kind::Wrapped(7)).unwrap();
    assert_eq!(v, nbt!({"Wrapped": 7}));
    assert_eq!(from_value::<Kind>(&v).unwrap(), Kind::Wrapped(7));

    let v = to_value(Kind::Record { x: 1, y: 2 }).unwrap();
    assert_eq!(v, nbt!({"Record": {"x": 1, "y": 2}}));
    assert_eq!(from_value::<Kind>(&v).unwrap(), Kind::Record { x: 1, y: 2 });
}

#[test]
fn optional_fields_default_to_none() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Sparse {
        required: i32,
        extra: Option<String>,
    }

    let v = nbt!({"required": 1});
    assert_eq!(
        from_value::<Sparse>(&v).unwrap(),
        Sparse {
            required: 1,
            extra: None,
        }
    );

    let v = nbt!({"required": 1, "extra": "here"});
    assert_eq!(
        from_value::<Sparse>(&v).unwrap(),
        Sparse {
            required: 1,
            extra: Some("here".to_owned()),
        }
    );
}

#[test]
fn bools_accept_any_nonzero_numeric() {
    #[derive(Deserialize)]
    struct Flags {
        a: bool,
        b: bool,
    }

    let v = nbt!({"a": 1i8, "b": 0});
    let flags: Flags = from_value(&v).unwrap();
    assert!(flags.a);
    assert!(!flags.b);
}

#[test]
fn wrong_shape_is_an_error() {
    let v = nbt!({"x": "not a number"});

    #[derive(Deserialize, Debug)]
    struct Point {
        #[allow(dead_code)]
        x: i32,
    }

    assert!(from_value::<Point>(&v).is_err());
}

#[test]
fn value_round_trips_through_itself() {
    // Value is itself serializable, so a tree survives crossing the bridge
    // in both directions.
    let v = nbt!({
        "nested": {"list": [1, 2], "f": 0.5f32},
        "bytes": [B; 1, 2],
    });

    let crossed = to_value(&v).unwrap();
    // Arrays have no serde representation, so they come back as lists; the
    // rest is unchanged.
    assert_eq!(
        crossed,
        nbt!({
            "nested": {"list": [1, 2], "f": 0.5f32},
            "bytes": [1i8, 2i8],
        })
    );
}

#[test]
fn from_value_borrows_strings() {
    #[derive(Deserialize)]
    struct Named<'a> {
        name: &'a str,
    }

    let v = nbt!({"name": "borrowed"});
    let named: Named = from_value(&v).unwrap();
    assert_eq!(named.name, "borrowed");
}
