use serde::{Deserialize, Serialize};

use crate::{Tag, Value};

/// An ordered NBT container. On the wire a list is homogeneous; in memory it
/// may hold mixed kinds, in which case its effective element type degrades
/// to `Compound` and non-compound elements are wrapped on encode. See
/// [`List::element_tag`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List {
    elements: Vec<Value>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.elements.get_mut(index)
    }

    /// Replace the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) {
        self.elements[index] = value.into();
    }

    /// Insert an element at `index`, shifting later elements.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        self.elements.insert(index, value.into());
    }

    /// Remove and return the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Value {
        self.elements.remove(index)
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.elements.push(value.into());
    }

    /// Append an element, transparently removing the 1-entry wrapper
    /// compound that the codec uses to smuggle non-compound values into a
    /// heterogeneous list. `add`ing every element of a decoded
    /// compound-element list therefore reproduces the original values.
    pub fn add(&mut self, value: impl Into<Value>) {
        let value = value.into();
        match unwrap_wrapper(value) {
            Ok(inner) => self.elements.push(inner),
            Err(value) => self.elements.push(value),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.elements.iter_mut()
    }

    /// The effective element type: `End` when empty, the common tag when all
    /// elements agree, and `Compound` otherwise. The `Compound` fallback is
    /// defined behaviour, not an error; encode wraps the stray elements.
    pub fn element_tag(&self) -> Tag {
        let mut tags = self.elements.iter().map(Value::tag);
        match tags.next() {
            None => Tag::End,
            Some(first) => {
                if tags.all(|t| t == first) {
                    first
                } else {
                    Tag::Compound
                }
            }
        }
    }
}

/// A compound whose sole key is the empty string gives back its inner value.
/// Anything else is returned unchanged in the `Err` arm.
pub(crate) fn unwrap_wrapper(value: Value) -> Result<Value, Value> {
    match value {
        Value::Compound(mut c) if c.len() == 1 => match c.remove("") {
            Some(inner) => Ok(inner),
            None => Err(Value::Compound(c)),
        },
        other => Err(other),
    }
}

impl From<Vec<Value>> for List {
    fn from(elements: Vec<Value>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl std::ops::Index<usize> for List {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.elements[index]
    }
}
