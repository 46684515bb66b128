//! Entity references.
//!
//! Each ref type is a thin `u32` wrapper providing type-safe indexing
//! into `PrimaryMap` storage owned by a `Module`, a `Function` or the
//! `Context` interners.

use cranelift_entity::entity_impl;
use std::fmt;

/// Reference to a function in a module.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncRef(u32);
entity_impl!(FuncRef, "fn");

/// Reference to an SSA value owned by a function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRef(u32);
entity_impl!(ValueRef, "v");

/// Reference to an instruction in a CFG function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(u32);
entity_impl!(InstRef, "inst");

/// Reference to a statement in an ML function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtRef(u32);
entity_impl!(StmtRef, "stmt");

/// Reference to a basic block in a CFG function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockRef(u32);
entity_impl!(BlockRef, "bb");

/// Reference to an interned type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(u32);
entity_impl!(TypeRef, "ty");

/// Reference to an interned path string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathRef(u32);
entity_impl!(PathRef, "path");

/// Where a value is defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueDef {
    /// Function argument at the given index.
    Argument(u32),
    /// Result of an instruction at the given index.
    InstResult(InstRef, u32),
    /// Result of a statement at the given index.
    StmtResult(StmtRef, u32),
}

impl fmt::Display for ValueDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDef::Argument(idx) => write!(f, "arg#{}", idx),
            ValueDef::InstResult(inst, idx) => write!(f, "{}#{}", inst, idx),
            ValueDef::StmtResult(stmt, idx) => write!(f, "{}#{}", stmt, idx),
        }
    }
}
