//! The operation core and the uniform operation contract.
//!
//! [`OperationCore`] is the part every operation shares: its name, kind,
//! location and attributes. It never appears on its own. Each concrete
//! family ([`OperationInst`](crate::OperationInst),
//! [`OperationStmt`](crate::OperationStmt)) embeds one by value and supplies
//! operand and result storage, and only those families can construct a core.
//!
//! [`Operation`] is the contract over both families. It is sealed and used
//! through generics, so every call is statically dispatched.

use std::fmt;

use crate::attribute::{AttrClass, Attribute};
use crate::attrs::{AttrName, AttributeStore, NamedAttribute, RemoveResult};
use crate::context::Context;
use crate::diagnostic::{Diagnostic, Severity};
use crate::identifier::Identifier;
use crate::iter::{OperandIter, ResultIter};
use crate::location::Location;
use crate::ops::{OpClass, OpPointer};
use crate::refs::{FuncRef, ValueRef};
use crate::registry::AbstractOperation;

/// Which family embeds an operation core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// An [`OperationInst`](crate::OperationInst) inside a CFG function.
    Instruction,
    /// An [`OperationStmt`](crate::OperationStmt) inside an ML function.
    Statement,
}

/// State shared by every operation, independent of its family.
pub struct OperationCore<'ctx> {
    ctx: &'ctx Context,
    name: Identifier,
    kind: OperationKind,
    location: Option<Location>,
    attrs: AttributeStore,
}

impl<'ctx> OperationCore<'ctx> {
    pub(crate) fn new(
        ctx: &'ctx Context,
        kind: OperationKind,
        name: Identifier,
        location: Option<Location>,
        attrs: impl IntoIterator<Item = NamedAttribute>,
    ) -> Self {
        Self {
            ctx,
            name,
            kind,
            location,
            attrs: AttributeStore::from_named(ctx, attrs),
        }
    }

    pub fn name(&self) -> Identifier {
        self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn loc(&self) -> Option<Location> {
        self.location
    }

    pub fn attr_store(&self) -> &AttributeStore {
        &self.attrs
    }

    pub fn attrs(&self) -> &[NamedAttribute] {
        self.attrs.as_slice()
    }

    pub fn get_attr(&self, name: impl AttrName) -> Option<&Attribute> {
        self.attrs.get(self.ctx, name)
    }

    pub fn get_attr_of_type<'a, T: AttrClass<'a>>(&'a self, name: impl AttrName) -> Option<T> {
        self.get_attr(name).and_then(T::from_attr)
    }

    pub fn set_attr(&mut self, name: impl AttrName, value: Attribute) {
        self.attrs.set(self.ctx, name, value)
    }

    pub fn remove_attr(&mut self, name: impl AttrName) -> RemoveResult {
        self.attrs.remove(self.ctx, name)
    }

    pub fn emit(&self, severity: Severity, message: impl fmt::Display) {
        self.ctx.emit_diagnostic(Diagnostic {
            severity,
            location: self.location,
            message: message.to_string(),
        });
    }

    pub fn abstract_operation(&self) -> Option<AbstractOperation> {
        self.ctx.abstract_operation(self.name)
    }
}

impl fmt::Debug for OperationCore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationCore")
            .field("name", &self.name.display(self.ctx).to_string())
            .field("kind", &self.kind)
            .field("location", &self.location)
            .field("attrs", &self.attrs)
            .finish()
    }
}

pub(crate) mod sealed {
    use super::OperationCore;

    /// Mutable access to the core stays inside the crate, so an operation's
    /// name and kind cannot change after construction.
    pub trait Sealed<'ctx> {
        fn core_mut(&mut self) -> &mut OperationCore<'ctx>;
    }
}

/// The uniform contract of every operation.
///
/// The required methods are the family's half: operand and result storage
/// and the containing function. Everything else is provided on top of the
/// embedded [`OperationCore`].
///
/// Indices must satisfy `idx < num_operands()` (resp. `num_results()`).
/// An out-of-range index fails a debug assertion; release builds still
/// panic on the slice bounds check.
///
/// Attributes are the only part of the core that can be changed from
/// outside the crate. The core itself cannot be borrowed mutably:
///
/// ```compile_fail
/// use keel_ir::{Context, FunctionKind, Module, OperationState};
///
/// let ctx = Context::new();
/// let mut module = Module::new(&ctx);
/// let f = module.create_function("f", FunctionKind::Ml, &[]);
/// let func = module.function_mut(f).unwrap();
/// let s = func.create_stmt(&OperationState::new(&ctx, None, "a.op")).unwrap();
/// let _ = func.stmt_mut(s).core_mut();
/// ```
pub trait Operation<'ctx>: sealed::Sealed<'ctx> {
    fn core(&self) -> &OperationCore<'ctx>;

    fn num_operands(&self) -> usize;
    fn operand(&self, idx: usize) -> ValueRef;
    /// Replace the value referenced by operand slot `idx`. The number of
    /// operands never changes.
    fn set_operand(&mut self, idx: usize, value: ValueRef);

    fn num_results(&self) -> usize;
    fn result(&self, idx: usize) -> ValueRef;

    /// The function this operation is defined in.
    fn operation_function(&self) -> FuncRef;

    /// The name of an operation is the key identifier for it.
    fn name(&self) -> Identifier {
        self.core().name()
    }

    fn context(&self) -> &'ctx Context {
        self.core().context()
    }

    /// The source location, if any.
    fn loc(&self) -> Option<Location> {
        self.core().loc()
    }

    fn operation_kind(&self) -> OperationKind {
        self.core().kind()
    }

    // ------------------------------------------------------------------
    // Operands & results
    // ------------------------------------------------------------------

    fn operand_begin(&self) -> OperandIter<'_, Self> {
        OperandIter::begin(self)
    }

    fn operand_end(&self) -> OperandIter<'_, Self> {
        OperandIter::end(self)
    }

    fn operands(&self) -> OperandIter<'_, Self> {
        self.operand_begin()
    }

    fn result_begin(&self) -> ResultIter<'_, Self> {
        ResultIter::begin(self)
    }

    fn result_end(&self) -> ResultIter<'_, Self> {
        ResultIter::end(self)
    }

    fn results(&self) -> ResultIter<'_, Self> {
        self.result_begin()
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn attrs<'a>(&'a self) -> &'a [NamedAttribute]
    where
        'ctx: 'a,
    {
        self.core().attrs()
    }

    fn get_attr<'a>(&'a self, name: impl AttrName) -> Option<&'a Attribute>
    where
        'ctx: 'a,
    {
        self.core().get_attr(name)
    }

    fn get_attr_of_type<'a, T: AttrClass<'a>>(&'a self, name: impl AttrName) -> Option<T>
    where
        'ctx: 'a,
    {
        self.core().get_attr_of_type(name)
    }

    /// Change an existing attribute in place, or append a new one.
    fn set_attr(&mut self, name: impl AttrName, value: Attribute) {
        sealed::Sealed::core_mut(self).set_attr(name, value)
    }

    fn remove_attr(&mut self, name: impl AttrName) -> RemoveResult {
        sealed::Sealed::core_mut(self).remove_attr(name)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Report a fatal condition with this operation.
    ///
    /// Under `ErrorPolicy::Abort` this does not return. Otherwise the caller
    /// must still treat this operation and the IR around it as suspect.
    fn emit_error(&self, message: impl fmt::Display) {
        self.core().emit(Severity::Error, message)
    }

    fn emit_warning(&self, message: impl fmt::Display) {
        self.core().emit(Severity::Warning, message)
    }

    fn emit_note(&self, message: impl fmt::Display) {
        self.core().emit(Severity::Note, message)
    }

    // ------------------------------------------------------------------
    // Descriptors & typed views
    // ------------------------------------------------------------------

    fn abstract_operation(&self) -> Option<AbstractOperation> {
        self.core().abstract_operation()
    }

    /// Narrow to a typed view; the view is invalid when the kind doesn't match.
    fn get_as<'a, Op: OpClass<'a, 'ctx, Self>>(&'a self) -> OpPointer<Op> {
        if Op::is_class_for(self) {
            OpPointer::new(Op::from_operation_unchecked(self))
        } else {
            OpPointer::null()
        }
    }

    fn is<'a, Op: OpClass<'a, 'ctx, Self>>(&'a self) -> bool {
        Op::is_class_for(self)
    }
}
