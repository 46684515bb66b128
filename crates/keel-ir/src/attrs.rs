//! Per-operation attribute storage.
//!
//! Operations carry relatively few attributes (a dozen or so, not hundreds),
//! so every lookup is a linear scan over an unsorted list. The list keeps
//! insertion order, and replacing a value keeps the entry where it was.
//! Names are unique within one store.

use smallvec::SmallVec;

use crate::attribute::Attribute;
use crate::context::Context;
use crate::identifier::{Identifier, IntoIdentifier};

/// An attribute attached to an operation under a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedAttribute {
    pub name: Identifier,
    pub value: Attribute,
}

impl NamedAttribute {
    pub fn new(name: Identifier, value: Attribute) -> Self {
        Self { name, value }
    }
}

/// Outcome of [`AttributeStore::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveResult {
    Removed,
    NotFound,
}

/// Anything an attribute can be looked up by.
///
/// `Identifier` keys compare by interned key; `&str` keys compare their text
/// against each entry's name.
pub trait AttrName: IntoIdentifier {
    fn position_in(self, ctx: &Context, attrs: &[NamedAttribute]) -> Option<usize>;
}

impl AttrName for Identifier {
    fn position_in(self, _ctx: &Context, attrs: &[NamedAttribute]) -> Option<usize> {
        attrs.iter().position(|a| a.name == self)
    }
}

impl AttrName for &str {
    fn position_in(self, ctx: &Context, attrs: &[NamedAttribute]) -> Option<usize> {
        attrs.iter().position(|a| a.name.is(ctx, self))
    }
}

/// Ordered, name-unique attribute list owned by one operation.
///
/// Up to four entries live inline; an empty store never holds a heap
/// allocation, so "no attributes" costs nothing beyond the inline buffer.
#[derive(Clone, Debug, Default)]
pub struct AttributeStore {
    entries: SmallVec<[NamedAttribute; 4]>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from possibly repeated names. A repeated name keeps the
    /// position of its first occurrence and the value of its last.
    pub(crate) fn from_named(ctx: &Context, attrs: impl IntoIterator<Item = NamedAttribute>) -> Self {
        let mut store = Self::new();
        for attr in attrs {
            store.set(ctx, attr.name, attr.value);
        }
        store
    }

    pub fn as_slice(&self) -> &[NamedAttribute] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the entries have spilled into a heap buffer.
    pub fn is_heap_allocated(&self) -> bool {
        self.entries.spilled()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedAttribute> {
        self.entries.iter()
    }

    pub fn get(&self, ctx: &Context, name: impl AttrName) -> Option<&Attribute> {
        name.position_in(ctx, &self.entries)
            .map(|idx| &self.entries[idx].value)
    }

    /// Replace the value of an existing entry in place, or append a new one.
    pub fn set(&mut self, ctx: &Context, name: impl AttrName, value: Attribute) {
        match name.position_in(ctx, &self.entries) {
            Some(idx) => self.entries[idx].value = value,
            None => self
                .entries
                .push(NamedAttribute::new(name.into_identifier(ctx), value)),
        }
    }

    /// Remove the entry with `name`, keeping the relative order of the rest.
    /// The store is untouched when the name is absent.
    pub fn remove(&mut self, ctx: &Context, name: impl AttrName) -> RemoveResult {
        let Some(idx) = name.position_in(ctx, &self.entries) else {
            return RemoveResult::NotFound;
        };
        self.entries.remove(idx);
        if self.entries.is_empty() {
            self.entries = SmallVec::new();
        }
        RemoveResult::Removed
    }
}

impl<'a> IntoIterator for &'a AttributeStore {
    type Item = &'a NamedAttribute;
    type IntoIter = std::slice::Iter<'a, NamedAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
