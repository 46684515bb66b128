//! keel IR: the generic operation core.
//!
//! Every instruction or statement in a keel program graph is an operation.
//! Operations share one base representation ([`OperationCore`]) holding the
//! name, kind, location and an ordered attribute list, while operand and
//! result storage belongs to the concrete family that embeds the core
//! ([`OperationInst`] inside CFG functions, [`OperationStmt`] inside ML
//! functions). The [`Operation`] trait is the uniform contract over both.

// === Context services ===
pub mod attribute;
pub mod context;
pub mod diagnostic;
pub mod identifier;
pub mod location;
pub mod registry;
pub mod types;

// === Operation core ===
pub mod attrs;
pub mod iter;
pub mod operation;
pub mod ops;
pub mod state;

// === Containing structure ===
pub mod function;
pub mod inst;
pub mod refs;
pub mod stmt;

// === Dialects & validation ===
pub mod dialect;
pub mod error;
pub mod validation;

pub use attribute::{AttrClass, AttrData, Attribute};
pub use attrs::{AttrName, AttributeStore, NamedAttribute, RemoveResult};
pub use context::{Context, ContextOptions, ErrorPolicy};
pub use diagnostic::{Diagnostic, DiagnosticHandler, Severity};
pub use error::{IrError, Result};
pub use function::{Function, FunctionKind, Module};
pub use identifier::{Identifier, IntoIdentifier};
pub use inst::OperationInst;
pub use iter::{IndexedAccessor, IndexedAccessorIter, OperandIter, ResultIter};
pub use location::{Location, Span};
pub use operation::{Operation, OperationCore, OperationKind};
pub use ops::{OpClass, OpPointer};
pub use refs::{BlockRef, FuncRef, InstRef, PathRef, StmtRef, TypeRef, ValueDef, ValueRef};
pub use registry::{AbstractOperation, Arity, OpProperties};
pub use state::OperationState;
pub use stmt::OperationStmt;
pub use types::TypeData;
