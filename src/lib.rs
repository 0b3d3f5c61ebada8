//! nbtkit is a library for NBT: the named binary tag format, and SNBT, its
//! human-editable text form.
//!
//! * For the owned tree type see [`Value`], [`Compound`] and [`List`].
//! * For the binary format see [`from_bytes`], [`to_bytes`] and [`DecodeOpts`]
//!   for bounding decode work on untrusted input.
//! * For scanning large NBT without materialising it, see [`stream`].
//! * For the text format see [`snbt`].
//! * For moving typed Rust values through the tree see [`to_value`] and
//!   [`from_value`].
//!
//! # Quick example
//!
//! Reading a world's data version and spawn point out of a `level.dat`-style
//! root compound, then bumping the spawn:
//!
//! ```no_run
//! use nbtkit::{from_bytes, to_bytes, Value};
//!
//! # fn main() -> nbtkit::Result<()> {
//! let data = std::fs::read("level.dat").unwrap();
//! let mut root = from_bytes(&data)?;
//!
//! if let Value::Compound(level) = &mut root {
//!     println!("data version: {}", level.data_version(0));
//!     println!("spawn x: {}", level.int_or("SpawnX", 0));
//!     level.insert("SpawnX", Value::Int(100));
//! }
//!
//! let out = to_bytes(&root)?;
//! # let _ = out;
//! # Ok(())
//! # }
//! ```
//!
//! # Untrusted input
//!
//! Binary NBT can declare enormous or deeply nested structures in very few
//! bytes. Decoding with [`DecodeOpts::budgeted`] bounds both the cumulative
//! decoded size and the nesting depth, failing with a budget error rather
//! than attempting attacker-controlled allocation:
//!
//! ```no_run
//! use nbtkit::{from_bytes_with_opts, DecodeOpts};
//!
//! # let data: Vec<u8> = vec![];
//! let value = from_bytes_with_opts(&data, DecodeOpts::budgeted(1 << 20));
//! ```

pub mod error;
pub mod snbt;
pub mod stream;

mod compound;
mod de;
mod list;
mod macros;
mod ser;
mod value;

#[cfg(test)]
mod test;

pub use compound::Compound;
pub use de::{
    from_bytes, from_bytes_named, from_bytes_named_with_opts, from_bytes_with_opts, from_reader,
    from_reader_named, from_reader_named_with_opts, from_reader_with_opts, DecodeOpts,
};
pub use error::{Error, ErrorKind, Result};
pub use list::List;
pub use ser::{to_bytes, to_bytes_named, to_writer, to_writer_named};
pub use value::{matches, to_value, Serializer, Value};

#[doc(inline)]
pub use value::from_value;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other values.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents an array of Int (i32).
    IntArray = 11,
    /// Represents an array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually, the tags will very rarely
// change so isn't a massive burden, but saves a significant amount of
// compile time.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

/// The compound key reserved for schema version stamping at the root of
/// persisted data.
pub const DATA_VERSION_KEY: &str = "DataVersion";
