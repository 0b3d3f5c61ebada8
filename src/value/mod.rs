mod de;
mod ser;

pub use self::de::from_value;
pub use self::ser::{to_value, Serializer};

use crate::{Compound, List, Tag};

/// Value is a complete NBT value. It owns its data. Compounds and Lists are
/// recursively owned. This type takes care to preserve all the information
/// from the original NBT, with the exception of the name of the root tag
/// (which is usually the empty string).
///
/// Cloning a value is a deep copy. Trees own all of their data and contain no
/// cycles, so `clone()` is the way to fork a subtree before mutating it or
/// handing it to another thread.
///
/// ```
/// use nbtkit::{nbt, Value};
///
/// let v = nbt!({"DataVersion": 3465, "pos": [1, 2, 3]});
/// if let Value::Compound(c) = &v {
///     assert_eq!(c.int_or("DataVersion", 0), 3465);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
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
    List(List),
    Compound(Compound),
}

/// Accounting costs charged against the decode budget. A constant "shell"
/// per value plus a per-element cost for the variable-size kinds. These are
/// a convention shared between [`Value::size_in_bytes`] and the decoder, not
/// a true measure of memory use.
pub(crate) mod cost {
    pub const BYTE: u64 = 9;
    pub const SHORT: u64 = 10;
    pub const INT: u64 = 12;
    pub const LONG: u64 = 16;
    pub const FLOAT: u64 = 12;
    pub const DOUBLE: u64 = 16;
    pub const STRING: u64 = 36;
    pub const STRING_CHAR: u64 = 2;
    pub const ARRAY: u64 = 24;
    pub const LIST: u64 = 36;
    pub const LIST_SLOT: u64 = 4;
    pub const COMPOUND: u64 = 48;
    pub const COMPOUND_ENTRY: u64 = 32;
}

impl Value {
    /// The wire tag for this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
        }
    }

    /// The accounting size of this value: what decoding it charges against a
    /// byte budget. See [`crate::DecodeOpts`].
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            Value::Byte(_) => cost::BYTE,
            Value::Short(_) => cost::SHORT,
            Value::Int(_) => cost::INT,
            Value::Long(_) => cost::LONG,
            Value::Float(_) => cost::FLOAT,
            Value::Double(_) => cost::DOUBLE,
            Value::String(s) => cost::STRING + cost::STRING_CHAR * s.len() as u64,
            Value::ByteArray(a) => cost::ARRAY + a.len() as u64,
            Value::IntArray(a) => cost::ARRAY + 4 * a.len() as u64,
            Value::LongArray(a) => cost::ARRAY + 8 * a.len() as u64,
            Value::List(l) => {
                cost::LIST
                    + l.iter()
                        .map(|el| cost::LIST_SLOT + el.size_in_bytes())
                        .sum::<u64>()
            }
            Value::Compound(c) => {
                cost::COMPOUND
                    + c.iter()
                        .map(|(k, v)| {
                            cost::COMPOUND_ENTRY
                                + cost::STRING_CHAR * k.len() as u64
                                + v.size_in_bytes()
                        })
                        .sum::<u64>()
            }
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Byte(v) => Some(v as u64),
            Value::Short(v) => Some(v as u64),
            Value::Int(v) => Some(v as u64),
            Value::Long(v) => Some(v as u64),
            Value::Float(v) => Some(v as u64),
            Value::Double(v) => Some(v as u64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Deep partial-match comparison, used for predicate logic over trees.
///
/// For compounds this is intentionally asymmetric: every key of `pattern`
/// must be present in `candidate` and match recursively, but `candidate` may
/// carry extra keys. With `lists_as_sets` set, a pattern list matches if each
/// of its elements matches *some* candidate element (duplicates not
/// counted); otherwise lists compare by strict equality. Everything else
/// compares by structural equality.
///
/// ```
/// use nbtkit::{matches, nbt};
///
/// let pattern = nbt!({"a": {"b": 1}});
/// let candidate = nbt!({"a": {"b": 1, "c": 2}, "d": 3});
/// assert!(matches(&pattern, &candidate, false));
/// assert!(!matches(&candidate, &pattern, false));
/// ```
pub fn matches(pattern: &Value, candidate: &Value, lists_as_sets: bool) -> bool {
    match (pattern, candidate) {
        (Value::Compound(p), Value::Compound(c)) => p.iter().all(|(key, pv)| {
            c.get(key)
                .map_or(false, |cv| matches(pv, cv, lists_as_sets))
        }),
        (Value::List(p), Value::List(c)) if lists_as_sets => p
            .iter()
            .all(|pv| c.iter().any(|cv| matches(pv, cv, lists_as_sets))),
        _ => pattern == candidate,
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
        impl From<&$type> for Value {
            fn from(val: &$type) -> Self {
                Self::$variant(val.to_owned()$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<i8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
impl From<&bool> for Value {
    fn from(val: &bool) -> Self {
        Self::Byte(i8::from(*val))
    }
}

impl From<Vec<Value>> for Value {
    fn from(val: Vec<Value>) -> Self {
        Self::List(List::from(val))
    }
}
