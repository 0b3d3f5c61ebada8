//! Streaming NBT decoding without materialising the tree.
//!
//! [`visit`] walks binary NBT and hands each entry to a [`Visitor`] before
//! its payload is read. The visitor steers the walk: it can descend, skip a
//! value, abandon the rest of a container, or halt outright. Skipped
//! payloads still advance the input and still count against the decode
//! budget, but allocate nothing, so a multi-megabyte region can be scanned
//! for one field at a fraction of a full decode.
//!
//! ```no_run
//! use nbtkit::stream::{visit, Control, Scalar, Visitor};
//! use nbtkit::{DecodeOpts, Tag};
//!
//! /// Finds the root DataVersion without decoding anything else.
//! struct FindVersion {
//!     version: Option<i32>,
//!     want_next: bool,
//! }
//!
//! impl Visitor for FindVersion {
//!     fn entry(&mut self, name: Option<&str>, tag: Tag) -> Control {
//!         match (name, tag) {
//!             (Some("DataVersion"), Tag::Int) => {
//!                 self.want_next = true;
//!                 Control::Continue
//!             }
//!             (_, Tag::Compound) => Control::Continue, // enter the root
//!             _ => Control::Skip,
//!         }
//!     }
//!
//!     fn scalar(&mut self, value: Scalar) -> Control {
//!         if let (true, Scalar::Int(v)) = (self.want_next, value) {
//!             self.version = Some(v);
//!             return Control::Halt;
//!         }
//!         Control::Continue
//!     }
//! }
//!
//! # let data: Vec<u8> = vec![];
//! let mut finder = FindVersion { version: None, want_next: false };
//! visit(data.as_slice(), DecodeOpts::new(), &mut finder).unwrap();
//! ```

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::de::{read_len, read_string, read_tag, Budget};
use crate::error::{Error, Result};
use crate::value::cost;
use crate::{DecodeOpts, Tag};

/// What the walk should do next, chosen by the visitor at each callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Read this value; descend into it if it is a container.
    Continue,
    /// Advance past this value's payload without materialising it.
    Skip,
    /// Abandon the rest of the innermost open container.
    Break,
    /// Stop the walk entirely. `visit` returns `Ok`.
    Halt,
}

/// A leaf value delivered to [`Visitor::scalar`]. Strings and arrays are
/// only materialised when the visitor chose [`Control::Continue`] for their
/// entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// Callbacks driving a streaming decode.
pub trait Visitor {
    /// Called for every named compound entry and (unnamed) list element
    /// before its payload is read.
    fn entry(&mut self, name: Option<&str>, tag: Tag) -> Control;

    /// Called with the payload of a leaf value that `entry` continued into.
    fn scalar(&mut self, value: Scalar) -> Control {
        let _ = value;
        Control::Continue
    }

    /// Called when a compound or list the walk descended into is complete.
    fn container_end(&mut self, tag: Tag) -> Control {
        let _ = tag;
        Control::Continue
    }
}

enum Layer<'a> {
    Compound,
    List { element_tag: Tag, remaining: usize },
    // Keeps the depth decrement on drop, so errors and Halt unwind cleanly.
    #[allow(dead_code)]
    Guard(crate::de::DepthGuard<'a>),
}

/// Walk one root value from `reader`, driving `visitor`. The same budget
/// rules as [`crate::from_reader_with_opts`] apply; skipped values charge
/// the budget exactly as decoding them would.
pub fn visit<R: Read, V: Visitor>(
    mut reader: R,
    opts: DecodeOpts,
    visitor: &mut V,
) -> Result<()> {
    let budget = Budget::new(&opts);
    let reader = &mut reader;

    let tag = read_tag(reader)?;
    if tag == Tag::End {
        return Err(Error::format("unexpected end tag at root"));
    }
    let name = read_string(reader, &budget, cost::STRING)?;

    let mut layers: Vec<Layer> = Vec::new();
    match visitor.entry(Some(&name), tag) {
        Control::Continue => {
            if open_value(reader, &budget, tag, visitor, &mut layers)? == Control::Halt {
                return Ok(());
            }
        }
        Control::Skip => return skip_payload(reader, &budget, tag),
        Control::Break | Control::Halt => return Ok(()),
    }

    loop {
        // The real layers are interleaved with depth guards; find the
        // innermost container, if any remain.
        let layer = match layers.last_mut() {
            None => return Ok(()),
            Some(Layer::Guard(_)) => {
                layers.pop();
                continue;
            }
            Some(layer) => layer,
        };

        let (name, tag) = match layer {
            Layer::List {
                element_tag,
                remaining,
            } => {
                if *remaining == 0 {
                    close_container(&mut layers);
                    if visitor.container_end(Tag::List) == Control::Halt {
                        return Ok(());
                    }
                    continue;
                }
                *remaining -= 1;
                (None, *element_tag)
            }
            Layer::Compound => {
                let tag = read_tag(reader)?;
                if tag == Tag::End {
                    close_container(&mut layers);
                    if visitor.container_end(Tag::Compound) == Control::Halt {
                        return Ok(());
                    }
                    continue;
                }
                let name = read_string(reader, &budget, cost::COMPOUND_ENTRY)?;
                (Some(name), tag)
            }
            Layer::Guard(_) => unreachable!("guards popped above"),
        };

        match visitor.entry(name.as_deref(), tag) {
            Control::Continue => {
                if open_value(reader, &budget, tag, visitor, &mut layers)? == Control::Halt {
                    return Ok(());
                }
            }
            Control::Skip => skip_payload(reader, &budget, tag)?,
            Control::Break => {
                skip_payload(reader, &budget, tag)?;
                let ended = skip_rest_of_container(reader, &budget, &mut layers)?;
                if visitor.container_end(ended) == Control::Halt {
                    return Ok(());
                }
            }
            Control::Halt => return Ok(()),
        }
    }
}

/// Read the payload of a value the visitor continued into. Containers push a
/// layer; leaves are delivered to [`Visitor::scalar`]. Returns the control
/// decision that should propagate (Halt, or a Break already applied).
fn open_value<'a, R: Read, V: Visitor>(
    reader: &mut R,
    budget: &'a Budget,
    tag: Tag,
    visitor: &mut V,
    layers: &mut Vec<Layer<'a>>,
) -> Result<Control> {
    match tag {
        Tag::End => return Err(Error::format("unexpected end tag")),
        Tag::Compound => {
            budget.charge(cost::COMPOUND)?;
            layers.push(Layer::Guard(budget.enter()?));
            layers.push(Layer::Compound);
            return Ok(Control::Continue);
        }
        Tag::List => {
            let element_tag = read_tag(reader)?;
            let len = read_len(reader)?;
            if element_tag == Tag::End && len != 0 {
                return Err(Error::format(
                    "unexpected list of type 'end', which is not supported",
                ));
            }
            budget.charge(cost::LIST + cost::LIST_SLOT * len as u64)?;
            layers.push(Layer::Guard(budget.enter()?));
            layers.push(Layer::List {
                element_tag,
                remaining: len,
            });
            return Ok(Control::Continue);
        }
        _ => {}
    }

    let scalar = match tag {
        Tag::Byte => {
            budget.charge(cost::BYTE)?;
            Scalar::Byte(reader.read_i8()?)
        }
        Tag::Short => {
            budget.charge(cost::SHORT)?;
            Scalar::Short(reader.read_i16::<BigEndian>()?)
        }
        Tag::Int => {
            budget.charge(cost::INT)?;
            Scalar::Int(reader.read_i32::<BigEndian>()?)
        }
        Tag::Long => {
            budget.charge(cost::LONG)?;
            Scalar::Long(reader.read_i64::<BigEndian>()?)
        }
        Tag::Float => {
            budget.charge(cost::FLOAT)?;
            Scalar::Float(reader.read_f32::<BigEndian>()?)
        }
        Tag::Double => {
            budget.charge(cost::DOUBLE)?;
            Scalar::Double(reader.read_f64::<BigEndian>()?)
        }
        Tag::String => Scalar::String(read_string(reader, budget, cost::STRING)?),
        Tag::ByteArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + len as u64)?;
            let mut buf = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                buf.push(reader.read_i8()?);
            }
            Scalar::ByteArray(buf)
        }
        Tag::IntArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + 4 * len as u64)?;
            let mut buf = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                buf.push(reader.read_i32::<BigEndian>()?);
            }
            Scalar::IntArray(buf)
        }
        Tag::LongArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + 8 * len as u64)?;
            let mut buf = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                buf.push(reader.read_i64::<BigEndian>()?);
            }
            Scalar::LongArray(buf)
        }
        Tag::End | Tag::List | Tag::Compound => unreachable!("containers handled above"),
    };

    match visitor.scalar(scalar) {
        Control::Halt => Ok(Control::Halt),
        Control::Break => {
            let ended = skip_rest_of_container(reader, budget, layers)?;
            if visitor.container_end(ended) == Control::Halt {
                return Ok(Control::Halt);
            }
            Ok(Control::Continue)
        }
        Control::Continue | Control::Skip => Ok(Control::Continue),
    }
}

fn close_container(layers: &mut Vec<Layer>) {
    layers.pop();
    // and its depth guard
    if matches!(layers.last(), Some(Layer::Guard(_))) {
        layers.pop();
    }
}

/// Consume the unread remainder of the innermost container and pop it.
/// Returns which kind of container ended. With no container open (Break on
/// a scalar root) this is a no-op reported as `Tag::End`.
fn skip_rest_of_container<R: Read>(
    reader: &mut R,
    budget: &Budget,
    layers: &mut Vec<Layer>,
) -> Result<Tag> {
    let layer = match layers.last_mut() {
        None => return Ok(Tag::End),
        Some(Layer::Guard(_)) => {
            layers.pop();
            return Ok(Tag::End);
        }
        Some(layer) => layer,
    };

    let ended = match layer {
        Layer::List {
            element_tag,
            remaining,
        } => {
            let element_tag = *element_tag;
            for _ in 0..*remaining {
                skip_payload(reader, budget, element_tag)?;
            }
            Tag::List
        }
        Layer::Compound => {
            skip_compound_body(reader, budget)?;
            Tag::Compound
        }
        Layer::Guard(_) => unreachable!("guards popped above"),
    };
    close_container(layers);
    Ok(ended)
}

/// Advance past one payload, charging the budget exactly as decoding it
/// would, without allocating the value.
pub(crate) fn skip_payload<R: Read>(reader: &mut R, budget: &Budget, tag: Tag) -> Result<()> {
    match tag {
        Tag::End => return Err(Error::format("unexpected end tag")),
        Tag::Byte => {
            budget.charge(cost::BYTE)?;
            skip_bytes(reader, 1)?;
        }
        Tag::Short => {
            budget.charge(cost::SHORT)?;
            skip_bytes(reader, 2)?;
        }
        Tag::Int => {
            budget.charge(cost::INT)?;
            skip_bytes(reader, 4)?;
        }
        Tag::Long => {
            budget.charge(cost::LONG)?;
            skip_bytes(reader, 8)?;
        }
        Tag::Float => {
            budget.charge(cost::FLOAT)?;
            skip_bytes(reader, 4)?;
        }
        Tag::Double => {
            budget.charge(cost::DOUBLE)?;
            skip_bytes(reader, 8)?;
        }
        Tag::String => {
            let len = reader.read_u16::<BigEndian>()? as u64;
            budget.charge(cost::STRING + cost::STRING_CHAR * len)?;
            skip_bytes(reader, len)?;
        }
        Tag::ByteArray => {
            let len = read_len(reader)? as u64;
            budget.charge(cost::ARRAY + len)?;
            skip_bytes(reader, len)?;
        }
        Tag::IntArray => {
            let len = read_len(reader)? as u64;
            budget.charge(cost::ARRAY + 4 * len)?;
            skip_bytes(reader, 4 * len)?;
        }
        Tag::LongArray => {
            let len = read_len(reader)? as u64;
            budget.charge(cost::ARRAY + 8 * len)?;
            skip_bytes(reader, 8 * len)?;
        }
        Tag::List => {
            let element_tag = read_tag(reader)?;
            let len = read_len(reader)?;
            if element_tag == Tag::End && len != 0 {
                return Err(Error::format(
                    "unexpected list of type 'end', which is not supported",
                ));
            }
            budget.charge(cost::LIST + cost::LIST_SLOT * len as u64)?;
            let _depth = budget.enter()?;
            for _ in 0..len {
                skip_payload(reader, budget, element_tag)?;
            }
        }
        Tag::Compound => {
            budget.charge(cost::COMPOUND)?;
            let _depth = budget.enter()?;
            skip_compound_body(reader, budget)?;
        }
    }
    Ok(())
}

fn skip_compound_body<R: Read>(reader: &mut R, budget: &Budget) -> Result<()> {
    loop {
        let tag = read_tag(reader)?;
        if tag == Tag::End {
            return Ok(());
        }
        let len = reader.read_u16::<BigEndian>()? as u64;
        budget.charge(cost::COMPOUND_ENTRY + cost::STRING_CHAR * len)?;
        skip_bytes(reader, len)?;
        skip_payload(reader, budget, tag)?;
    }
}

fn skip_bytes<R: Read>(reader: &mut R, n: u64) -> Result<()> {
    let copied = std::io::copy(&mut reader.take(n), &mut std::io::sink())?;
    if copied != n {
        return Err(Error::unexpected_eof());
    }
    Ok(())
}
