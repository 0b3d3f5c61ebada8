//! Binary NBT decoding: bytes to [`Value`] trees, bounded by a caller
//! supplied budget.

use std::cell::Cell;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::value::cost;
use crate::{Compound, List, Tag, Value};

/// Limits applied while decoding binary NBT.
///
/// Binary NBT can declare deeply nested or enormous structures in a handful
/// of bytes, so decoding untrusted input without limits risks
/// attacker-controlled work. The byte quota is charged the accounting cost
/// of every allocated value ([`Value::size_in_bytes`]); the depth quota
/// bounds compound/list nesting. Exceeding either aborts the decode with a
/// budget error, distinct from format errors, so callers can classify
/// hostile input separately from corrupt input.
#[derive(Debug, Clone)]
pub struct DecodeOpts {
    max_bytes: u64,
    max_depth: usize,
}

impl DecodeOpts {
    /// No byte quota, nesting bounded at 512.
    pub fn new() -> Self {
        Self {
            max_bytes: u64::MAX,
            max_depth: 512,
        }
    }

    /// A byte quota for untrusted input, nesting bounded at 512.
    pub fn budgeted(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            max_depth: 512,
        }
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize NBT from a slice of data, using default [`DecodeOpts`].
/// Trailing bytes after the root value are an error.
pub fn from_bytes(input: &[u8]) -> Result<Value> {
    from_bytes_with_opts(input, DecodeOpts::new())
}

/// Deserialize NBT from a slice of data with the given options.
pub fn from_bytes_with_opts(input: &[u8], opts: DecodeOpts) -> Result<Value> {
    let mut input = input;
    let value = from_reader_with_opts(&mut input, opts)?;
    if !input.is_empty() {
        return Err(Error::format(format!(
            "trailing input: {} bytes after root value",
            input.len()
        )));
    }
    Ok(value)
}

/// Like [`from_bytes`], but also returns the name of the root tag.
pub fn from_bytes_named(input: &[u8]) -> Result<(String, Value)> {
    from_bytes_named_with_opts(input, DecodeOpts::new())
}

/// Like [`from_bytes_with_opts`], but also returns the name of the root tag.
pub fn from_bytes_named_with_opts(input: &[u8], opts: DecodeOpts) -> Result<(String, Value)> {
    let mut input = input;
    let root = read_root(&mut input, opts)?;
    if !input.is_empty() {
        return Err(Error::format(format!(
            "trailing input: {} bytes after root value",
            input.len()
        )));
    }
    Ok(root)
}

/// Deserialize NBT from a reader, using default [`DecodeOpts`]. Reads
/// exactly one root value and leaves the reader positioned after it.
pub fn from_reader<R: Read>(reader: R) -> Result<Value> {
    from_reader_with_opts(reader, DecodeOpts::new())
}

/// Deserialize NBT from a reader with the given options.
pub fn from_reader_with_opts<R: Read>(mut reader: R, opts: DecodeOpts) -> Result<Value> {
    read_root(&mut reader, opts).map(|(_, value)| value)
}

/// Like [`from_reader`], but also returns the name of the root tag.
pub fn from_reader_named<R: Read>(reader: R) -> Result<(String, Value)> {
    from_reader_named_with_opts(reader, DecodeOpts::new())
}

/// Like [`from_reader_with_opts`], but also returns the name of the root
/// tag.
pub fn from_reader_named_with_opts<R: Read>(
    mut reader: R,
    opts: DecodeOpts,
) -> Result<(String, Value)> {
    read_root(&mut reader, opts)
}

fn read_root<R: Read>(reader: &mut R, opts: DecodeOpts) -> Result<(String, Value)> {
    let budget = Budget::new(&opts);
    let tag = read_tag(reader)?;
    if tag == Tag::End {
        return Err(Error::format("unexpected end tag at root"));
    }
    let name = read_string(reader, &budget, cost::STRING)?;
    let value = read_payload(reader, &budget, tag)?;
    Ok((name, value))
}

/// Tracks the remaining byte quota and the current nesting depth for one
/// decode call. Interior mutability lets [`DepthGuard`] decrement on every
/// exit path while the reader is borrowed mutably elsewhere.
pub(crate) struct Budget {
    remaining: Cell<u64>,
    depth: Cell<usize>,
    max_depth: usize,
}

impl Budget {
    pub(crate) fn new(opts: &DecodeOpts) -> Self {
        Self {
            remaining: Cell::new(opts.max_bytes),
            depth: Cell::new(0),
            max_depth: opts.max_depth,
        }
    }

    /// Charge `n` accounting bytes, failing when the quota runs out. Always
    /// called before the corresponding allocation.
    pub(crate) fn charge(&self, n: u64) -> Result<()> {
        let remaining = self.remaining.get();
        if n > remaining {
            return Err(Error::budget_bytes(n - remaining));
        }
        self.remaining.set(remaining - n);
        Ok(())
    }

    /// Enter one nesting level. The returned guard leaves the level when
    /// dropped, including on the error path out of a nested decode.
    pub(crate) fn enter(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(Error::budget_depth(self.max_depth));
        }
        self.depth.set(depth);
        Ok(DepthGuard(&self.depth))
    }
}

pub(crate) struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

pub(crate) fn read_tag<R: Read>(reader: &mut R) -> Result<Tag> {
    let tag = reader.read_u8()?;
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}

/// Read a 2-byte-length-prefixed modified-UTF-8 string, charging `shell`
/// plus the per-character cost. Compound keys charge the entry shell,
/// string values the string shell.
pub(crate) fn read_string<R: Read>(reader: &mut R, budget: &Budget, shell: u64) -> Result<String> {
    let len = reader.read_u16::<BigEndian>()? as usize;
    budget.charge(shell + cost::STRING_CHAR * len as u64)?;

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;

    Ok(cesu8::from_java_cesu8(&buf)
        .map_err(|_| Error::nonunicode(&buf))?
        .into_owned())
}

/// Read a payload length prefix, rejecting negative values.
pub(crate) fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    let len = reader.read_i32::<BigEndian>()?;
    usize::try_from(len).map_err(|_| Error::format(format!("negative length: {}", len)))
}

// Don't trust a declared length further than the bytes backing it could
// reach; large honest payloads grow past this naturally.
const MAX_PREALLOC: usize = 4096;

pub(crate) fn read_payload<R: Read>(reader: &mut R, budget: &Budget, tag: Tag) -> Result<Value> {
    match tag {
        Tag::End => Err(Error::format("unexpected end tag")),
        Tag::Byte => {
            budget.charge(cost::BYTE)?;
            Ok(Value::Byte(reader.read_i8()?))
        }
        Tag::Short => {
            budget.charge(cost::SHORT)?;
            Ok(Value::Short(reader.read_i16::<BigEndian>()?))
        }
        Tag::Int => {
            budget.charge(cost::INT)?;
            Ok(Value::Int(reader.read_i32::<BigEndian>()?))
        }
        Tag::Long => {
            budget.charge(cost::LONG)?;
            Ok(Value::Long(reader.read_i64::<BigEndian>()?))
        }
        Tag::Float => {
            budget.charge(cost::FLOAT)?;
            Ok(Value::Float(reader.read_f32::<BigEndian>()?))
        }
        Tag::Double => {
            budget.charge(cost::DOUBLE)?;
            Ok(Value::Double(reader.read_f64::<BigEndian>()?))
        }
        Tag::String => Ok(Value::String(read_string(reader, budget, cost::STRING)?)),
        Tag::ByteArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + len as u64)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buf.push(reader.read_i8()?);
            }
            Ok(Value::ByteArray(buf))
        }
        Tag::IntArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + 4 * len as u64)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buf.push(reader.read_i32::<BigEndian>()?);
            }
            Ok(Value::IntArray(buf))
        }
        Tag::LongArray => {
            let len = read_len(reader)?;
            budget.charge(cost::ARRAY + 8 * len as u64)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buf.push(reader.read_i64::<BigEndian>()?);
            }
            Ok(Value::LongArray(buf))
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
            let mut list = List::new();
            for _ in 0..len {
                let element = read_payload(reader, budget, element_tag)?;
                if element_tag == Tag::Compound {
                    // Compound-element lists may carry wrapped non-compound
                    // values; add() strips the wrapper.
                    list.add(element);
                } else {
                    list.push(element);
                }
            }
            Ok(Value::List(list))
        }
        Tag::Compound => {
            budget.charge(cost::COMPOUND)?;

            let _depth = budget.enter()?;
            let mut compound = Compound::new();
            loop {
                let tag = read_tag(reader)?;
                if tag == Tag::End {
                    break;
                }
                let key = read_string(reader, budget, cost::COMPOUND_ENTRY)?;
                let value = read_payload(reader, budget, tag)?;
                compound.insert(key, value);
            }
            Ok(Value::Compound(compound))
        }
    }
}
