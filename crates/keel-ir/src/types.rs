//! Types and the context's deduplicating tables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use cranelift_entity::{EntityRef, PrimaryMap};
use smallvec::SmallVec;

use crate::identifier::Identifier;
use crate::refs::{PathRef, TypeRef};

/// A type such as `core.i32` or `core.tensor<core.f32>`.
///
/// Types are interned in the `Context`; operations and values refer to them
/// by [`TypeRef`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeData {
    pub dialect: Identifier,
    pub name: Identifier,
    pub params: SmallVec<[TypeRef; 4]>,
}

impl TypeData {
    pub fn new(dialect: Identifier, name: Identifier) -> Self {
        Self {
            dialect,
            name,
            params: SmallVec::new(),
        }
    }

    pub fn with_param(mut self, ty: TypeRef) -> Self {
        self.params.push(ty);
        self
    }

    pub fn with_params(mut self, tys: impl IntoIterator<Item = TypeRef>) -> Self {
        self.params.extend(tys);
        self
    }
}

/// Append-only table handing out one key per distinct value.
pub(crate) struct Interner<K: EntityRef, V> {
    values: PrimaryMap<K, V>,
    keys: HashMap<V, K>,
}

impl<K: EntityRef, V: Clone + Eq + Hash> Interner<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            values: PrimaryMap::new(),
            keys: HashMap::new(),
        }
    }

    pub(crate) fn intern(&mut self, value: V) -> K {
        match self.keys.entry(value) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let key = self.values.push(entry.key().clone());
                *entry.insert(key)
            }
        }
    }

    pub(crate) fn get(&self, key: K) -> &V {
        &self.values[key]
    }
}

pub(crate) type TypeInterner = Interner<TypeRef, TypeData>;
pub(crate) type PathInterner = Interner<PathRef, Box<str>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn equal_types_share_a_ref() {
        let ctx = Context::new();
        let mut types = TypeInterner::new();
        let core = ctx.intern("core");
        let i32_ty = types.intern(TypeData::new(core, ctx.intern("i32")));
        let i64_ty = types.intern(TypeData::new(core, ctx.intern("i64")));
        assert_ne!(i32_ty, i64_ty);
        assert_eq!(types.intern(TypeData::new(core, ctx.intern("i32"))), i32_ty);

        let pair = TypeData::new(core, ctx.intern("tuple")).with_params([i32_ty, i64_ty]);
        let a = types.intern(pair.clone());
        let b = types.intern(pair);
        assert_eq!(a, b);
        assert_eq!(types.get(a).params.as_slice(), [i32_ty, i64_ty]);

        let tensor = types.intern(TypeData::new(core, ctx.intern("tensor")).with_param(i32_ty));
        assert_ne!(tensor, a);
        assert_eq!(types.get(tensor).params.as_slice(), [i32_ty]);
    }

    #[test]
    fn paths_are_deduplicated() {
        let mut paths = PathInterner::new();
        let a = paths.intern("file:///a.kl".into());
        assert_eq!(paths.intern("file:///a.kl".into()), a);
        let b = paths.intern("file:///b.kl".into());
        assert_ne!(a, b);
        assert_eq!(&**paths.get(b), "file:///b.kl");
    }
}
