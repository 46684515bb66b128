//! Instructions: operations inside CFG functions.

use std::fmt;

use crate::operation::{Operation, OperationCore, OperationKind, sealed};
use crate::refs::{BlockRef, FuncRef, ValueRef};
use crate::state::OperationState;

/// An operation that lives in a basic block of a CFG function.
///
/// Operands and results share one allocation made at creation: the operands
/// first, then the results. Its size never changes afterwards.
pub struct OperationInst<'ctx> {
    core: OperationCore<'ctx>,
    func: FuncRef,
    block: BlockRef,
    num_operands: u32,
    storage: Box<[ValueRef]>,
}

impl<'ctx> OperationInst<'ctx> {
    pub(crate) fn new(
        state: &OperationState<'ctx>,
        func: FuncRef,
        block: BlockRef,
        results: impl IntoIterator<Item = ValueRef>,
    ) -> Self {
        let storage: Box<[ValueRef]> = state.operands.iter().copied().chain(results).collect();
        Self {
            core: OperationCore::new(
                state.context,
                OperationKind::Instruction,
                state.name,
                state.location,
                state.attributes.iter().cloned(),
            ),
            func,
            block,
            num_operands: state.operands.len() as u32,
            storage,
        }
    }

    /// The basic block this instruction belongs to.
    pub fn block(&self) -> BlockRef {
        self.block
    }

    pub fn operand_values(&self) -> &[ValueRef] {
        &self.storage[..self.num_operands as usize]
    }

    pub fn result_values(&self) -> &[ValueRef] {
        &self.storage[self.num_operands as usize..]
    }
}

impl<'ctx> sealed::Sealed<'ctx> for OperationInst<'ctx> {
    fn core_mut(&mut self) -> &mut OperationCore<'ctx> {
        &mut self.core
    }
}

impl<'ctx> Operation<'ctx> for OperationInst<'ctx> {
    fn core(&self) -> &OperationCore<'ctx> {
        &self.core
    }

    fn num_operands(&self) -> usize {
        self.num_operands as usize
    }

    fn operand(&self, idx: usize) -> ValueRef {
        debug_assert!(idx < self.num_operands(), "operand index {idx} out of range");
        self.operand_values()[idx]
    }

    fn set_operand(&mut self, idx: usize, value: ValueRef) {
        debug_assert!(idx < self.num_operands(), "operand index {idx} out of range");
        let n = self.num_operands as usize;
        self.storage[..n][idx] = value;
    }

    fn num_results(&self) -> usize {
        self.storage.len() - self.num_operands as usize
    }

    fn result(&self, idx: usize) -> ValueRef {
        debug_assert!(idx < self.num_results(), "result index {idx} out of range");
        self.result_values()[idx]
    }

    fn operation_function(&self) -> FuncRef {
        self.func
    }
}

impl fmt::Debug for OperationInst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationInst")
            .field("core", &self.core)
            .field("block", &self.block)
            .field("operands", &self.operand_values())
            .field("results", &self.result_values())
            .finish()
    }
}
