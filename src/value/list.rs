use std::slice;

use crate::error::{Error, Result};
use crate::{Tag, Value};

/// An NBT list. Every element has the same tag, fixed when the list is
/// created. A list with element tag [`Tag::End`] is the canonical empty
/// list and cannot hold elements.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: Tag,
    items: Vec<Value>,
}

impl List {
    /// An empty list whose elements will be `element`.
    pub fn new(element: Tag) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// The canonical empty list, with element tag End.
    pub fn empty() -> Self {
        Self::new(Tag::End)
    }

    pub(crate) fn with_capacity(element: Tag, capacity: usize) -> Self {
        Self {
            element,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Build a list from values that must all have the tag `element`.
    pub fn from_values(element: Tag, values: Vec<Value>) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| v.tag() != element || element == Tag::End) {
            return Err(Error::wrong_type(element, bad.tag()));
        }
        Ok(Self {
            element,
            items: values,
        })
    }

    /// Append a value, rejecting it if its tag differs from the element tag.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.element == Tag::End || value.tag() != self.element {
            return Err(Error::wrong_type(self.element, value.tag()));
        }
        self.items.push(value);
        Ok(())
    }

    /// Convert every element to `element`, or `None` if any of them would
    /// lose its value.
    pub fn cast(&self, element: Tag) -> Option<List> {
        let items = self
            .items
            .iter()
            .map(|v| v.cast(element))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { element, items })
    }

    pub fn element_tag(&self) -> Tag {
        self.element
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
