//! Modules and functions: the structure operations live in.
//!
//! A [`Module`] owns its functions. A [`Function`] owns every value defined
//! in it (arguments and operation results) and every operation, stored in
//! `PrimaryMap`s and addressed by entity refs.
//!
//! Functions come in two kinds. A CFG function groups [`OperationInst`]s into
//! basic blocks; an ML function holds a flat list of [`OperationStmt`]s.

use cranelift_entity::PrimaryMap;
use smallvec::SmallVec;

use crate::context::Context;
use crate::error::{IrError, Result};
use crate::identifier::{Identifier, IntoIdentifier};
use crate::inst::OperationInst;
use crate::refs::{BlockRef, FuncRef, InstRef, StmtRef, TypeRef, ValueDef, ValueRef};
use crate::state::OperationState;
use crate::stmt::OperationStmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Basic blocks of instructions.
    Cfg,
    /// A structured list of statements.
    Ml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueData {
    pub def: ValueDef,
    pub ty: TypeRef,
}

#[derive(Clone, Debug, Default)]
pub struct BasicBlock {
    pub insts: Vec<InstRef>,
}

pub struct Function<'ctx> {
    ctx: &'ctx Context,
    func_ref: FuncRef,
    name: Identifier,
    kind: FunctionKind,
    values: PrimaryMap<ValueRef, ValueData>,
    args: SmallVec<[ValueRef; 4]>,
    blocks: PrimaryMap<BlockRef, BasicBlock>,
    insts: PrimaryMap<InstRef, OperationInst<'ctx>>,
    stmts: PrimaryMap<StmtRef, OperationStmt<'ctx>>,
    body: Vec<StmtRef>,
}

impl<'ctx> Function<'ctx> {
    fn new(
        ctx: &'ctx Context,
        func_ref: FuncRef,
        name: Identifier,
        kind: FunctionKind,
        arg_types: &[TypeRef],
    ) -> Self {
        let mut values = PrimaryMap::new();
        let args = arg_types
            .iter()
            .enumerate()
            .map(|(idx, &ty)| {
                values.push(ValueData {
                    def: ValueDef::Argument(idx as u32),
                    ty,
                })
            })
            .collect();
        Self {
            ctx,
            func_ref,
            name,
            kind,
            values,
            args,
            blocks: PrimaryMap::new(),
            insts: PrimaryMap::new(),
            stmts: PrimaryMap::new(),
            body: Vec::new(),
        }
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn func_ref(&self) -> FuncRef {
        self.func_ref
    }

    pub fn name(&self) -> Identifier {
        self.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn args(&self) -> &[ValueRef] {
        &self.args
    }

    // ========================================================================
    // Values
    // ========================================================================

    pub fn contains_value(&self, value: ValueRef) -> bool {
        self.values.is_valid(value)
    }

    pub fn value(&self, value: ValueRef) -> Result<&ValueData> {
        self.values.get(value).ok_or(IrError::UnknownValue(value))
    }

    pub fn value_ty(&self, value: ValueRef) -> Result<TypeRef> {
        self.value(value).map(|data| data.ty)
    }

    pub fn value_def(&self, value: ValueRef) -> Result<ValueDef> {
        self.value(value).map(|data| data.def)
    }

    // ========================================================================
    // Operation creation
    // ========================================================================

    fn check_state(&self, expected: FunctionKind, state: &OperationState<'ctx>) -> Result<()> {
        if !std::ptr::eq(self.ctx, state.context) {
            return Err(IrError::ForeignContext);
        }
        if self.kind != expected {
            return Err(IrError::WrongFunctionKind {
                expected,
                actual: self.kind,
            });
        }
        if let Some(&missing) = state.operands.iter().find(|&&v| !self.contains_value(v)) {
            return Err(IrError::UnknownValue(missing));
        }
        Ok(())
    }

    /// Append an empty basic block. CFG functions only.
    pub fn create_block(&mut self) -> Result<BlockRef> {
        if self.kind != FunctionKind::Cfg {
            return Err(IrError::WrongFunctionKind {
                expected: FunctionKind::Cfg,
                actual: self.kind,
            });
        }
        Ok(self.blocks.push(BasicBlock::default()))
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockRef> + '_ {
        self.blocks.keys()
    }

    pub fn block_insts(&self, block: BlockRef) -> Result<&[InstRef]> {
        self.blocks
            .get(block)
            .map(|b| b.insts.as_slice())
            .ok_or(IrError::UnknownBlock(block))
    }

    /// Create an instruction from `state` and append it to `block`.
    ///
    /// One result value is allocated per entry of `state.types`. The state
    /// is only read; it can be dropped as soon as this returns.
    pub fn create_inst(&mut self, block: BlockRef, state: &OperationState<'ctx>) -> Result<InstRef> {
        self.check_state(FunctionKind::Cfg, state)?;
        if !self.blocks.is_valid(block) {
            return Err(IrError::UnknownBlock(block));
        }

        let inst = self.insts.next_key();
        let results: SmallVec<[ValueRef; 4]> = state
            .types
            .iter()
            .enumerate()
            .map(|(idx, &ty)| {
                self.values.push(ValueData {
                    def: ValueDef::InstResult(inst, idx as u32),
                    ty,
                })
            })
            .collect();
        self.insts
            .push(OperationInst::new(state, self.func_ref, block, results));
        self.blocks[block].insts.push(inst);

        tracing::trace!(
            name = %state.name.display(self.ctx),
            %inst,
            %block,
            "created instruction"
        );
        Ok(inst)
    }

    /// Create a statement from `state` and append it to the function body.
    pub fn create_stmt(&mut self, state: &OperationState<'ctx>) -> Result<StmtRef> {
        self.check_state(FunctionKind::Ml, state)?;

        let stmt = self.stmts.next_key();
        let results: SmallVec<[ValueRef; 4]> = state
            .types
            .iter()
            .enumerate()
            .map(|(idx, &ty)| {
                self.values.push(ValueData {
                    def: ValueDef::StmtResult(stmt, idx as u32),
                    ty,
                })
            })
            .collect();
        self.stmts
            .push(OperationStmt::new(state, self.func_ref, results));
        self.body.push(stmt);

        tracing::trace!(name = %state.name.display(self.ctx), %stmt, "created statement");
        Ok(stmt)
    }

    // ========================================================================
    // Operation access
    // ========================================================================

    /// # Panics
    ///
    /// Panics if `inst` was not created by this function.
    pub fn inst(&self, inst: InstRef) -> &OperationInst<'ctx> {
        &self.insts[inst]
    }

    /// # Panics
    ///
    /// Panics if `inst` was not created by this function.
    pub fn inst_mut(&mut self, inst: InstRef) -> &mut OperationInst<'ctx> {
        &mut self.insts[inst]
    }

    pub fn insts(&self) -> impl Iterator<Item = (InstRef, &OperationInst<'ctx>)> + '_ {
        self.insts.iter()
    }

    /// # Panics
    ///
    /// Panics if `stmt` was not created by this function.
    pub fn stmt(&self, stmt: StmtRef) -> &OperationStmt<'ctx> {
        &self.stmts[stmt]
    }

    /// # Panics
    ///
    /// Panics if `stmt` was not created by this function.
    pub fn stmt_mut(&mut self, stmt: StmtRef) -> &mut OperationStmt<'ctx> {
        &mut self.stmts[stmt]
    }

    pub fn stmts(&self) -> impl Iterator<Item = (StmtRef, &OperationStmt<'ctx>)> + '_ {
        self.stmts.iter()
    }

    /// Statements of an ML function in program order.
    pub fn body(&self) -> &[StmtRef] {
        &self.body
    }
}

/// A collection of functions sharing one [`Context`].
pub struct Module<'ctx> {
    ctx: &'ctx Context,
    functions: PrimaryMap<FuncRef, Function<'ctx>>,
}

impl<'ctx> Module<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            functions: PrimaryMap::new(),
        }
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    /// Add a function with one argument value per entry of `arg_types`.
    pub fn create_function(
        &mut self,
        name: impl IntoIdentifier,
        kind: FunctionKind,
        arg_types: &[TypeRef],
    ) -> FuncRef {
        let func = self.functions.next_key();
        let name = name.into_identifier(self.ctx);
        self.functions
            .push(Function::new(self.ctx, func, name, kind, arg_types));
        tracing::debug!(name = %name.display(self.ctx), %func, ?kind, "created function");
        func
    }

    pub fn function(&self, func: FuncRef) -> Result<&Function<'ctx>> {
        self.functions
            .get(func)
            .ok_or(IrError::UnknownFunction(func))
    }

    pub fn function_mut(&mut self, func: FuncRef) -> Result<&mut Function<'ctx>> {
        self.functions
            .get_mut(func)
            .ok_or(IrError::UnknownFunction(func))
    }

    pub fn functions(&self) -> impl Iterator<Item = (FuncRef, &Function<'ctx>)> + '_ {
        self.functions.iter()
    }

    pub fn lookup_function(&self, name: &str) -> Option<FuncRef> {
        let name = self.ctx.lookup(name)?;
        self.functions
            .iter()
            .find(|(_, f)| f.name == name)
            .map(|(func, _)| func)
    }
}
