use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{List, Value, DATA_VERSION_KEY};

/// A keyed NBT container. Keys are unique; insertion order is not
/// semantically significant but is preserved for display, which is why this
/// is backed by an [`IndexMap`].
///
/// The typed getters (`int_or`, `string_or`, ...) never fail: an absent key
/// or a value of the wrong kind produces the caller-supplied default. The
/// numeric getters coerce between numeric variants only, so a `Byte` is
/// retrievable as an int but a `String` never is. Sparse, optional-field
/// data relies on this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Compound {
    entries: IndexMap<String, Value>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.entries.iter_mut()
    }

    pub fn byte_or(&self, key: &str, default: i8) -> i8 {
        self.num_or(key, default, |v| v as i8)
    }

    pub fn short_or(&self, key: &str, default: i16) -> i16 {
        self.num_or(key, default, |v| v as i16)
    }

    pub fn int_or(&self, key: &str, default: i32) -> i32 {
        self.num_or(key, default, |v| v as i32)
    }

    pub fn long_or(&self, key: &str, default: i64) -> i64 {
        self.num_or(key, default, |v| v)
    }

    pub fn float_or(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(Value::as_f64)
            .map_or(default, |v| v as f32)
    }

    pub fn double_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Bytes double as booleans; any nonzero numeric value is true.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(Value::as_i64)
            .map_or(default, |v| v != 0)
    }

    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(Value::as_compound)
    }

    pub fn list(&self, key: &str) -> Option<&List> {
        self.get(key).and_then(Value::as_list)
    }

    fn num_or<T>(&self, key: &str, default: T, narrow: impl FnOnce(i64) -> T) -> T {
        self.get(key).and_then(Value::as_i64).map_or(default, narrow)
    }

    /// Deep-merge `other` into `self`. Where both sides hold a compound under
    /// the same key the merge recurses; otherwise the incoming value's deep
    /// copy replaces the existing one.
    pub fn merge(&mut self, other: &Compound) {
        for (key, incoming) in other.iter() {
            match (self.entries.get_mut(key), incoming) {
                (Some(Value::Compound(existing)), Value::Compound(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.entries.insert(key.clone(), incoming.clone());
                }
            }
        }
    }

    /// Read the schema version stamped at this compound, or `default` when
    /// absent.
    pub fn data_version(&self, default: i32) -> i32 {
        self.int_or(DATA_VERSION_KEY, default)
    }

    /// Stamp the schema version on this compound.
    pub fn set_data_version(&mut self, version: i32) {
        self.insert(DATA_VERSION_KEY, Value::Int(version));
    }
}

impl From<IndexMap<String, Value>> for Compound {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
