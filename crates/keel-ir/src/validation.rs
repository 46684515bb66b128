//! Structural verification of operations and functions.
//!
//! Verification checks operations against their registered
//! [`AbstractOperation`](crate::AbstractOperation) descriptor and checks that
//! a function is well formed:
//!
//! 1. **Arity**: operand and result counts are accepted by the descriptor.
//!    Unregistered operations are not checked.
//! 2. **Scope**: every operand names a value owned by the function.
//! 3. **Terminators**: a terminator is the last operation of its block (CFG)
//!    or of the body (ML).
//!
//! Each failure is also reported as an error diagnostic on the offending
//! operation. Verification stops at the first failure.

use derive_more::{Display, Error};

use crate::error::Result;
use crate::function::{Function, FunctionKind};
use crate::operation::Operation;
use crate::refs::ValueRef;
use crate::registry::Arity;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[display("'{name}' expects {expected} operands, found {found}")]
    OperandCount {
        name: String,
        expected: Arity,
        found: usize,
    },

    #[display("'{name}' expects {expected} results, found {found}")]
    ResultCount {
        name: String,
        expected: Arity,
        found: usize,
    },

    #[display("operand #{index} of '{name}' references {value}, which is not defined in this function")]
    UnknownOperand {
        name: String,
        index: usize,
        value: ValueRef,
    },

    #[display("terminator '{name}' must be the last operation")]
    MisplacedTerminator { name: String },
}

fn op_name<'ctx, O: Operation<'ctx> + ?Sized>(op: &O) -> String {
    op.name().display(op.context()).to_string()
}

fn report<'ctx, O: Operation<'ctx> + ?Sized>(op: &O, err: VerifyError) -> VerifyError {
    op.emit_error(&err);
    err
}

/// Check `op` against its registered descriptor.
pub fn verify_operation<'ctx, O: Operation<'ctx> + ?Sized>(op: &O) -> Result<()> {
    let Some(desc) = op.abstract_operation() else {
        return Ok(());
    };

    if !desc.operands.accepts(op.num_operands()) {
        let err = VerifyError::OperandCount {
            name: op_name(op),
            expected: desc.operands,
            found: op.num_operands(),
        };
        return Err(report(op, err).into());
    }
    if !desc.results.accepts(op.num_results()) {
        let err = VerifyError::ResultCount {
            name: op_name(op),
            expected: desc.results,
            found: op.num_results(),
        };
        return Err(report(op, err).into());
    }
    Ok(())
}

fn verify_sequence<'a, 'ctx: 'a, O>(
    func: &Function<'ctx>,
    ops: impl ExactSizeIterator<Item = &'a O>,
) -> Result<()>
where
    O: Operation<'ctx> + 'a,
{
    let len = ops.len();
    for (pos, op) in ops.enumerate() {
        verify_operation(op)?;

        if let Some((index, value)) = op
            .operands()
            .enumerate()
            .find(|&(_, v)| !func.contains_value(v))
        {
            let err = VerifyError::UnknownOperand {
                name: op_name(op),
                index,
                value,
            };
            return Err(report(op, err).into());
        }

        let is_terminator = op.abstract_operation().is_some_and(|d| d.is_terminator());
        if is_terminator && pos + 1 != len {
            let err = VerifyError::MisplacedTerminator { name: op_name(op) };
            return Err(report(op, err).into());
        }
    }
    Ok(())
}

/// Verify every operation of `func` in program order.
pub fn verify_function(func: &Function<'_>) -> Result<()> {
    match func.kind() {
        FunctionKind::Cfg => {
            for block in func.blocks() {
                let insts = func.block_insts(block)?;
                verify_sequence(func, insts.iter().map(|&inst| func.inst(inst)))?;
            }
        }
        FunctionKind::Ml => {
            verify_sequence(func, func.body().iter().map(|&stmt| func.stmt(stmt)))?;
        }
    }
    tracing::trace!(name = %func.name().display(func.context()), "verified function");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::context::Context;
    use crate::diagnostic::{Diagnostic, Severity};
    use crate::error::IrError;
    use crate::function::Module;
    use crate::registry::{AbstractOperation, OpProperties};
    use crate::state::OperationState;

    fn register(ctx: &Context) {
        ctx.register_operation(
            AbstractOperation::new(ctx.intern("test.binary"))
                .operands(Arity::Exact(2))
                .results(Arity::Exact(1)),
        );
        ctx.register_operation(
            AbstractOperation::new(ctx.intern("test.ret")).properties(OpProperties {
                terminator: true,
                ..Default::default()
            }),
        );
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let ctx = Context::new();
        register(&ctx);
        let seen = Arc::new(Mutex::new(Vec::<Diagnostic>::new()));
        let sink = Arc::clone(&seen);
        ctx.set_diagnostic_handler(move |d: &Diagnostic| sink.lock().unwrap().push(d.clone()));

        let i32_ty = ctx.simple_type("core", "i32");
        let mut module = Module::new(&ctx);
        let f = module.create_function("f", FunctionKind::Cfg, &[i32_ty]);
        let func = module.function_mut(f).unwrap();
        let bb = func.create_block().unwrap();
        let arg = func.args()[0];

        let mut state = OperationState::new(&ctx, None, "test.binary");
        state.add_operands(&[arg]).add_types(&[i32_ty]);
        let inst = func.create_inst(bb, &state).unwrap();

        let err = verify_operation(func.inst(inst)).unwrap_err();
        insta::assert_snapshot!(err, @"verification failed: 'test.binary' expects exactly 2 operands, found 1");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Error);
    }

    #[test]
    fn terminator_must_be_last() {
        let ctx = Context::new();
        register(&ctx);
        let mut module = Module::new(&ctx);
        let f = module.create_function("f", FunctionKind::Ml, &[]);
        let func = module.function_mut(f).unwrap();

        func.create_stmt(&OperationState::new(&ctx, None, "test.ret")).unwrap();
        func.create_stmt(&OperationState::new(&ctx, None, "test.other")).unwrap();

        assert_eq!(
            verify_function(func),
            Err(IrError::Verify(VerifyError::MisplacedTerminator {
                name: "test.ret".into()
            }))
        );
    }

    #[test]
    fn well_formed_function_passes() {
        let ctx = Context::new();
        register(&ctx);
        let i32_ty = ctx.simple_type("core", "i32");
        let mut module = Module::new(&ctx);
        let f = module.create_function("f", FunctionKind::Cfg, &[i32_ty, i32_ty]);
        let func = module.function_mut(f).unwrap();
        let bb = func.create_block().unwrap();
        let args = func.args().to_vec();

        let mut add = OperationState::new(&ctx, None, "test.binary");
        add.add_operands(&args).add_types(&[i32_ty]);
        let inst = func.create_inst(bb, &add).unwrap();
        let sum = func.inst(inst).result(0);

        let mut ret = OperationState::new(&ctx, None, "test.ret");
        ret.add_operands(&[sum]);
        func.create_inst(bb, &ret).unwrap();

        assert_eq!(verify_function(func), Ok(()));
    }
}
