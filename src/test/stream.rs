use super::builder::Builder;
use crate::stream::{visit, Control, Scalar, Visitor};
use crate::{DecodeOpts, ErrorKind, Tag};

/// Records every callback, steering via a closure over the entry name.
struct Recorder<F> {
    steer: F,
    entries: Vec<(Option<String>, Tag)>,
    scalars: Vec<Scalar>,
    ends: Vec<Tag>,
}

impl<F: FnMut(Option<&str>, Tag) -> Control> Recorder<F> {
    fn new(steer: F) -> Self {
        Recorder {
            steer,
            entries: Vec::new(),
            scalars: Vec::new(),
            ends: Vec::new(),
        }
    }
}

impl<F: FnMut(Option<&str>, Tag) -> Control> Visitor for Recorder<F> {
    fn entry(&mut self, name: Option<&str>, tag: Tag) -> Control {
        self.entries.push((name.map(str::to_owned), tag));
        (self.steer)(name, tag)
    }

    fn scalar(&mut self, value: Scalar) -> Control {
        self.scalars.push(value);
        Control::Continue
    }

    fn container_end(&mut self, tag: Tag) -> Control {
        self.ends.push(tag);
        Control::Continue
    }
}

fn sample() -> Vec<u8> {
    Builder::new()
        .start_compound("root")
        .int("DataVersion", 3465)
        .start_list("sections", Tag::Compound, 2)
        .start_anon_compound()
        .byte("y", 0)
        .end_compound()
        .start_anon_compound()
        .byte("y", 1)
        .end_compound()
        .start_list("", Tag::End, 0)
        .long_array("blocks", &[1, 2, 3])
        .string("status", "full")
        .end_compound()
        .build()
}

#[test]
fn full_walk() {
    let mut v = Recorder::new(|_, _| Control::Continue);
    visit(sample().as_slice(), DecodeOpts::new(), &mut v).unwrap();

    let names: Vec<Option<&str>> = v.entries.iter().map(|(n, _)| n.as_deref()).collect();
    assert_eq!(
        names,
        [
            Some("root"),
            Some("DataVersion"),
            Some("sections"),
            None,
            Some("y"),
            None,
            Some("y"),
            Some(""),
            Some("blocks"),
            Some("status"),
        ]
    );
    assert_eq!(
        v.scalars,
        [
            Scalar::Int(3465),
            Scalar::Byte(0),
            Scalar::Byte(1),
            Scalar::LongArray(vec![1, 2, 3]),
            Scalar::String("full".to_owned()),
        ]
    );
    // Two list-element compounds, the section list, the empty list, and the
    // root compound.
    assert_eq!(
        v.ends,
        [
            Tag::Compound,
            Tag::Compound,
            Tag::List,
            Tag::List,
            Tag::Compound
        ]
    );
}

#[test]
fn skip_avoids_payloads() {
    // Skip everything but the version; the array is never materialised.
    let mut v = Recorder::new(|name, tag| match (name, tag) {
        (_, Tag::Compound) => Control::Continue,
        (Some("DataVersion"), _) => Control::Continue,
        _ => Control::Skip,
    });
    visit(sample().as_slice(), DecodeOpts::new(), &mut v).unwrap();

    assert_eq!(v.scalars, [Scalar::Int(3465)]);
}

#[test]
fn skipped_payloads_still_charge_the_budget() {
    let mut v = Recorder::new(|name, tag| match (name, tag) {
        (Some("root"), _) => Control::Continue,
        (_, Tag::Compound) => Control::Skip,
        _ => Control::Skip,
    });
    // Small enough that the skipped payloads exhaust it.
    let err = visit(sample().as_slice(), DecodeOpts::budgeted(150), &mut v).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetBytes);
}

#[test]
fn break_abandons_the_container() {
    // Break out of the sections list on its first element.
    let mut v = Recorder::new(|name, tag| match (name, tag) {
        (None, Tag::Compound) => Control::Break,
        _ => Control::Continue,
    });
    visit(sample().as_slice(), DecodeOpts::new(), &mut v).unwrap();

    // The second section's entry callback never fires, but entries after
    // the list do.
    let names: Vec<Option<&str>> = v.entries.iter().map(|(n, _)| n.as_deref()).collect();
    assert_eq!(
        names,
        [
            Some("root"),
            Some("DataVersion"),
            Some("sections"),
            None,
            Some(""),
            Some("blocks"),
            Some("status"),
        ]
    );
}

#[test]
fn halt_stops_everything() {
    let mut v = Recorder::new(|name, _| {
        if name == Some("sections") {
            Control::Halt
        } else {
            Control::Continue
        }
    });
    visit(sample().as_slice(), DecodeOpts::new(), &mut v).unwrap();

    assert_eq!(v.scalars, [Scalar::Int(3465)]);
    let last = v.entries.last().unwrap();
    assert_eq!(last.0.as_deref(), Some("sections"));
}

#[test]
fn halting_on_a_scalar() {
    struct FindVersion(Option<i32>);

    impl Visitor for FindVersion {
        fn entry(&mut self, name: Option<&str>, tag: Tag) -> Control {
            match (name, tag) {
                (Some("DataVersion"), Tag::Int) => Control::Continue,
                (_, Tag::Compound) => Control::Continue,
                _ => Control::Skip,
            }
        }

        fn scalar(&mut self, value: Scalar) -> Control {
            if let Scalar::Int(v) = value {
                self.0 = Some(v);
                return Control::Halt;
            }
            Control::Continue
        }
    }

    let mut finder = FindVersion(None);
    visit(sample().as_slice(), DecodeOpts::new(), &mut finder).unwrap();
    assert_eq!(finder.0, Some(3465));
}

#[test]
fn depth_budget_applies() {
    let payload = Builder::new()
        .start_compound("")
        .start_compound("a")
        .start_compound("b")
        .end_compound()
        .end_compound()
        .end_compound()
        .build();

    let mut v = Recorder::new(|_, _| Control::Continue);
    let err = visit(
        payload.as_slice(),
        DecodeOpts::new().max_depth(2),
        &mut v,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetDepth);
}
