use super::builder::Builder;
use crate::{
    from_bytes, from_bytes_named, from_bytes_named_with_opts, from_bytes_with_opts,
    from_reader_named, from_reader_named_with_opts, nbt, DecodeOpts, ErrorKind, Tag, Value,
};

#[test]
fn simple_compound() {
    let payload = Builder::new()
        .start_compound("object")
        .byte("a", 1)
        .string("b", "hello")
        .end_compound()
        .build();

    let v = from_bytes(&payload).unwrap();
    assert_eq!(v, nbt!({"a": 1i8, "b": "hello"}));
}

#[test]
fn root_name_is_returned() {
    let payload = Builder::new()
        .start_compound("level")
        .int("x", 7)
        .end_compound()
        .build();

    let (name, v) = from_bytes_named(&payload).unwrap();
    assert_eq!(name, "level");
    assert_eq!(v, nbt!({"x": 7}));
}

#[test]
fn root_name_from_reader() {
    let payload = Builder::new()
        .start_compound("level")
        .int("x", 7)
        .end_compound()
        .build();

    let (name, v) = from_reader_named(payload.as_slice()).unwrap();
    assert_eq!(name, "level");
    assert_eq!(v, nbt!({"x": 7}));

    // The reader form reads exactly one root value; trailing bytes are left
    // for the caller.
    let mut doubled = payload.clone();
    doubled.extend_from_slice(&payload);
    let mut rest = doubled.as_slice();
    from_reader_named(&mut rest).unwrap();
    assert_eq!(rest.len(), payload.len());
}

#[test]
fn named_decoding_still_budgets() {
    let payload = Builder::new()
        .start_compound("level")
        .long_array("blocks", &[0; 64])
        .end_compound()
        .build();

    let err = from_bytes_named_with_opts(&payload, DecodeOpts::budgeted(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetBytes);
    let err =
        from_reader_named_with_opts(payload.as_slice(), DecodeOpts::budgeted(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetBytes);

    let (name, _) =
        from_reader_named_with_opts(payload.as_slice(), DecodeOpts::budgeted(4096)).unwrap();
    assert_eq!(name, "level");
}

#[test]
fn every_variant_roundtrips() {
    let v = nbt!({
        "byte": 1i8,
        "short": 2i16,
        "int": 3,
        "long": 4i64,
        "float": 5.5f32,
        "double": 6.5,
        "string": "g clef: \u{1d11e}",
        "bytes": [B; 1, 2, 3],
        "ints": [I; -1, 0, 1],
        "longs": [L; 1, 2],
        "list": [[1, 2], [3]],
        "empty list": [],
        "empty compound": {},
        "nested": {"deeper": {"deepest": [1.0, 2.0]}},
    });

    let bytes = crate::to_bytes(&v).unwrap();
    assert_eq!(from_bytes(&bytes).unwrap(), v);
}

#[test]
fn trailing_bytes_rejected() {
    let mut payload = Builder::new()
        .start_compound("")
        .end_compound()
        .build();
    payload.push(0xff);

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn invalid_tag_byte() {
    let payload = Builder::new().raw_bytes(&[42]).build();
    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTag(42));
}

#[test]
fn negative_array_length() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::ByteArray)
        .name("a")
        .int_payload(-1)
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn list_of_end_with_nonzero_count() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::End, 1)
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn empty_list_of_end_is_fine() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::End, 0)
        .end_compound()
        .build();

    let v = from_bytes(&payload).unwrap();
    assert_eq!(v, nbt!({"l": []}));
}

#[test]
fn eof_mid_value() {
    let mut payload = Builder::new()
        .start_compound("")
        .long("a", 1)
        .end_compound()
        .build();
    payload.truncate(payload.len() - 5);

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn declared_length_is_not_trusted() {
    // An array claiming i32::MAX elements backed by nothing. With a byte
    // budget this must fail on the quota, before any large allocation.
    let payload = Builder::new()
        .tag(Tag::ByteArray)
        .name("")
        .int_payload(i32::MAX)
        .build();

    let err = from_bytes_with_opts(&payload, DecodeOpts::budgeted(1024)).unwrap_err();
    assert!(err.is_budget());
    assert_eq!(err.kind(), ErrorKind::BudgetBytes);

    // Without a byte quota it fails on eof instead, and the capped
    // preallocation keeps it O(actual input).
    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn byte_budget_counts_cumulatively() {
    let payload = Builder::new()
        .start_compound("")
        .long_array("a", &[0; 64])
        .long_array("b", &[0; 64])
        .end_compound()
        .build();

    // Each array alone costs over 512 accounting bytes.
    let err = from_bytes_with_opts(&payload, DecodeOpts::budgeted(700)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetBytes);

    assert!(from_bytes_with_opts(&payload, DecodeOpts::budgeted(4096)).is_ok());
}

#[test]
fn depth_budget() {
    let payload = Builder::new()
        .start_compound("")
        .start_compound("a")
        .start_compound("b")
        .start_compound("c")
        .end_compound()
        .end_compound()
        .end_compound()
        .end_compound()
        .build();

    let err = from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetDepth);

    assert!(from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(4)).is_ok());
}

#[test]
fn depth_accounts_lists_too() {
    let payload = Builder::new()
        .start_list("", Tag::List, 1)
        .start_anon_list(Tag::List, 1)
        .start_anon_list(Tag::End, 0)
        .build();

    let err = from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetDepth);

    assert!(from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(3)).is_ok());
}

#[test]
fn wrapper_compounds_unwrap_in_lists() {
    // A compound-element list holding a real record and a smuggled byte.
    let payload = Builder::new()
        .start_list("", Tag::Compound, 2)
        .start_anon_compound()
        .int("x", 1)
        .end_compound()
        .start_anon_compound()
        .byte("", 5)
        .end_compound()
        .build();

    let v = from_bytes(&payload).unwrap();
    let list = v.as_list().unwrap();
    assert_eq!(list[0], nbt!({"x": 1}));
    assert_eq!(list[1], Value::Byte(5));
}
