//! Statements: operations inside ML functions.

use std::fmt;

use smallvec::SmallVec;

use crate::operation::{Operation, OperationCore, OperationKind, sealed};
use crate::refs::{FuncRef, ValueRef};
use crate::state::OperationState;

/// An operation that lives in the statement list of an ML function.
pub struct OperationStmt<'ctx> {
    core: OperationCore<'ctx>,
    func: FuncRef,
    operands: SmallVec<[ValueRef; 4]>,
    results: SmallVec<[ValueRef; 2]>,
}

impl<'ctx> OperationStmt<'ctx> {
    pub(crate) fn new(
        state: &OperationState<'ctx>,
        func: FuncRef,
        results: impl IntoIterator<Item = ValueRef>,
    ) -> Self {
        Self {
            core: OperationCore::new(
                state.context,
                OperationKind::Statement,
                state.name,
                state.location,
                state.attributes.iter().cloned(),
            ),
            func,
            operands: state.operands.clone(),
            results: results.into_iter().collect(),
        }
    }

    pub fn operand_values(&self) -> &[ValueRef] {
        &self.operands
    }

    pub fn result_values(&self) -> &[ValueRef] {
        &self.results
    }
}

impl<'ctx> sealed::Sealed<'ctx> for OperationStmt<'ctx> {
    fn core_mut(&mut self) -> &mut OperationCore<'ctx> {
        &mut self.core
    }
}

impl<'ctx> Operation<'ctx> for OperationStmt<'ctx> {
    fn core(&self) -> &OperationCore<'ctx> {
        &self.core
    }

    fn num_operands(&self) -> usize {
        self.operands.len()
    }

    fn operand(&self, idx: usize) -> ValueRef {
        debug_assert!(idx < self.operands.len(), "operand index {idx} out of range");
        self.operands[idx]
    }

    fn set_operand(&mut self, idx: usize, value: ValueRef) {
        debug_assert!(idx < self.operands.len(), "operand index {idx} out of range");
        self.operands[idx] = value;
    }

    fn num_results(&self) -> usize {
        self.results.len()
    }

    fn result(&self, idx: usize) -> ValueRef {
        debug_assert!(idx < self.results.len(), "result index {idx} out of range");
        self.results[idx]
    }

    fn operation_function(&self) -> FuncRef {
        self.func
    }
}

impl fmt::Debug for OperationStmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationStmt")
            .field("core", &self.core)
            .field("operands", &self.operands)
            .field("results", &self.results)
            .finish()
    }
}
