//! SNBT, the human-editable text form of NBT.
//!
//! Values print and parse the way they look in commands and data packs:
//! compounds as `{key:value,...}`, lists as `[...]`, typed arrays as
//! `[B;...]`/`[I;...]`/`[L;...]`, and numbers with their width suffix
//! (`1b`, `2s`, `3`, `4L`, `5.0f`, `6.0d`).
//!
//! ```
//! use nbtkit::{nbt, snbt};
//!
//! let v = snbt::from_str(r#"{name: "Iron Sword", Count: 1b}"#).unwrap();
//! assert_eq!(v, nbt!({"name": "Iron Sword", "Count": 1i8}));
//!
//! assert_eq!(snbt::to_string(&v), r#"{Count:1b,name:"Iron Sword"}"#);
//! ```
//!
//! [`to_string`] is canonical: compound keys are sorted, strings are quoted
//! only when a bare token would misparse, and its output always parses back
//! to an equal tree.

mod parser;
mod printer;

pub use self::printer::to_string;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::Value;

/// Parse SNBT text into a [`Value`].
///
/// Failures carry the one-based line and column of the offending input in
/// [`ErrorKind::Syntax`][`crate::ErrorKind::Syntax`].
pub fn from_str(input: &str) -> Result<Value> {
    parser::parse(input)
}

/// Parse SNBT text straight into any deserializable type.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Item {
///     id: String,
///     #[serde(rename = "Count")]
///     count: i8,
/// }
///
/// let item: Item = nbtkit::snbt::from_str_typed(r#"{id: stone, Count: 3b}"#).unwrap();
/// assert_eq!(item.id, "stone");
/// assert_eq!(item.count, 3);
/// ```
pub fn from_str_typed<T: DeserializeOwned>(input: &str) -> Result<T> {
    let value = parser::parse(input)?;
    crate::from_value(&value)
}
