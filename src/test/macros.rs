use crate::{nbt, Compound, List, Value};

#[test]
fn empty_forms() {
    assert_eq!(nbt!({}), Value::Compound(Compound::new()));
    assert_eq!(nbt!([]), Value::List(List::new()));
    assert_eq!(nbt!([B;]), Value::ByteArray(vec![]));
    assert_eq!(nbt!([I;]), Value::IntArray(vec![]));
    assert_eq!(nbt!([L;]), Value::LongArray(vec![]));
}

#[test]
fn scalars_pick_their_variants() {
    assert_eq!(nbt!(1i8), Value::Byte(1));
    assert_eq!(nbt!(1i16), Value::Short(1));
    assert_eq!(nbt!(1), Value::Int(1));
    assert_eq!(nbt!(1i64), Value::Long(1));
    assert_eq!(nbt!(1.5f32), Value::Float(1.5));
    assert_eq!(nbt!(1.5), Value::Double(1.5));
    assert_eq!(nbt!(true), Value::Byte(1));
    assert_eq!(nbt!("hi"), Value::String("hi".to_owned()));
}

#[test]
fn arrays() {
    assert_eq!(nbt!([B; 1, 2, 3]), Value::ByteArray(vec![1, 2, 3]));
    assert_eq!(nbt!([I; 1, 2, 3]), Value::IntArray(vec![1, 2, 3]));
    assert_eq!(nbt!([L; 1, 2, 3,]), Value::LongArray(vec![1, 2, 3]));
}

#[test]
fn nested_structure() {
    let v = nbt!({
        "level": {
            "sections": [
                {"y": 0i8},
                {"y": 1i8},
            ],
            "heightmap": [L; 0, -1],
        },
        "tags": ["a", "b"],
    });

    let root = v.as_compound().unwrap();
    let level = root.compound("level").unwrap();
    assert_eq!(level.list("sections").unwrap().len(), 2);
    assert_eq!(
        level.get("heightmap"),
        Some(&Value::LongArray(vec![0, -1]))
    );
    assert_eq!(root.list("tags").unwrap()[1], Value::String("b".to_owned()));
}

#[test]
fn expression_values_and_keys() {
    let count = 3;
    let key = "dynamic";
    let v = nbt!({
        (key): count * 2,
        "copied": count,
    });
    assert_eq!(v, nbt!({"dynamic": 6, "copied": 3}));
}

#[test]
fn trailing_commas() {
    let v = nbt!({
        "a": 1,
        "b": [1, 2,],
    });
    assert_eq!(v, nbt!({"a": 1, "b": [1, 2]}));
}

#[test]
fn duplicate_keys_keep_the_last() {
    let v = nbt!({"k": 1, "k": 2});
    assert_eq!(v, nbt!({"k": 2}));
}
