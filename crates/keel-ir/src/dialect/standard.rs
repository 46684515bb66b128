//! The standard dialect: integer arithmetic, constants, `dim` and `return`.

use crate::attribute::{Attribute, IntegerAttr};
use crate::context::Context;
use crate::iter::OperandIter;
use crate::location::Location;
use crate::op_class;
use crate::operation::Operation;
use crate::ops::OpClass;
use crate::refs::{TypeRef, ValueRef};
use crate::registry::{AbstractOperation, Arity, OpProperties};
use crate::state::OperationState;

op_class! {
    /// `std.add lhs, rhs -> result`
    pub struct AddOp = "std.add" {
        operands: [lhs, rhs],
        results: [result],
    }
}

op_class! {
    /// `std.sub lhs, rhs -> result`
    pub struct SubOp = "std.sub" {
        operands: [lhs, rhs],
        results: [result],
    }
}

op_class! {
    /// `std.mul lhs, rhs -> result`
    pub struct MulOp = "std.mul" {
        operands: [lhs, rhs],
        results: [result],
    }
}

/// `std.constant {value} -> result`
pub struct ConstantOp<'a, O: ?Sized> {
    op: &'a O,
}

impl<O: ?Sized> Clone for ConstantOp<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized> Copy for ConstantOp<'_, O> {}

impl<'a, 'ctx, O: Operation<'ctx> + ?Sized> OpClass<'a, 'ctx, O> for ConstantOp<'a, O> {
    const OPERATION_NAME: &'static str = "std.constant";

    fn is_class_for(op: &O) -> bool {
        op.name().is(op.context(), Self::OPERATION_NAME)
            && op.num_operands() == 0
            && op.num_results() == 1
            && op.get_attr("value").is_some()
    }

    fn from_operation_unchecked(op: &'a O) -> Self {
        Self { op }
    }

    fn operation(&self) -> &'a O {
        self.op
    }
}

impl<'a, 'ctx: 'a, O: Operation<'ctx> + ?Sized> ConstantOp<'a, O> {
    pub fn value(&self) -> &'a Attribute {
        match self.op.get_attr("value") {
            Some(value) => value,
            None => unreachable!("std.constant without a value attribute"),
        }
    }

    pub fn result(&self) -> ValueRef {
        self.op.result(0)
    }
}

/// `std.dim memref {index} -> result`
pub struct DimOp<'a, O: ?Sized> {
    op: &'a O,
}

impl<O: ?Sized> Clone for DimOp<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized> Copy for DimOp<'_, O> {}

impl<'a, 'ctx, O: Operation<'ctx> + ?Sized> OpClass<'a, 'ctx, O> for DimOp<'a, O> {
    const OPERATION_NAME: &'static str = "std.dim";

    fn is_class_for(op: &O) -> bool {
        op.name().is(op.context(), Self::OPERATION_NAME)
            && op.num_operands() == 1
            && op.num_results() == 1
            && op.get_attr_of_type::<IntegerAttr>("index").is_some()
    }

    fn from_operation_unchecked(op: &'a O) -> Self {
        Self { op }
    }

    fn operation(&self) -> &'a O {
        self.op
    }
}

impl<'a, 'ctx: 'a, O: Operation<'ctx> + ?Sized> DimOp<'a, O> {
    pub fn memref(&self) -> ValueRef {
        self.op.operand(0)
    }

    /// The queried dimension.
    pub fn index(&self) -> i64 {
        match self.op.get_attr_of_type::<IntegerAttr>("index") {
            Some(index) => index.value(),
            None => unreachable!("std.dim without an integer index attribute"),
        }
    }

    pub fn result(&self) -> ValueRef {
        self.op.result(0)
    }
}

/// `std.return operands...`, terminating its block or body.
pub struct ReturnOp<'a, O: ?Sized> {
    op: &'a O,
}

impl<O: ?Sized> Clone for ReturnOp<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized> Copy for ReturnOp<'_, O> {}

impl<'a, 'ctx, O: Operation<'ctx> + ?Sized> OpClass<'a, 'ctx, O> for ReturnOp<'a, O> {
    const OPERATION_NAME: &'static str = "std.return";

    fn is_class_for(op: &O) -> bool {
        op.name().is(op.context(), Self::OPERATION_NAME) && op.num_results() == 0
    }

    fn from_operation_unchecked(op: &'a O) -> Self {
        Self { op }
    }

    fn operation(&self) -> &'a O {
        self.op
    }
}

impl<'a, 'ctx: 'a, O: Operation<'ctx> + ?Sized> ReturnOp<'a, O> {
    pub fn num_operands(&self) -> usize {
        self.op.num_operands()
    }

    /// The returned values.
    pub fn operands(&self) -> OperandIter<'a, O> {
        self.op.operands()
    }
}

// ============================================================================
// Builders
// ============================================================================

fn binary<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    name: &str,
    lhs: ValueRef,
    rhs: ValueRef,
    ty: TypeRef,
) -> OperationState<'ctx> {
    let mut state = OperationState::new(ctx, location, name);
    state.add_operands(&[lhs, rhs]).add_types(&[ty]);
    state
}

pub fn add<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    lhs: ValueRef,
    rhs: ValueRef,
    ty: TypeRef,
) -> OperationState<'ctx> {
    binary(ctx, location, "std.add", lhs, rhs, ty)
}

pub fn sub<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    lhs: ValueRef,
    rhs: ValueRef,
    ty: TypeRef,
) -> OperationState<'ctx> {
    binary(ctx, location, "std.sub", lhs, rhs, ty)
}

pub fn mul<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    lhs: ValueRef,
    rhs: ValueRef,
    ty: TypeRef,
) -> OperationState<'ctx> {
    binary(ctx, location, "std.mul", lhs, rhs, ty)
}

pub fn constant<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    value: Attribute,
    ty: TypeRef,
) -> OperationState<'ctx> {
    let mut state = OperationState::new(ctx, location, "std.constant");
    state.add_types(&[ty]).add_attribute("value", value);
    state
}

pub fn dim<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    memref: ValueRef,
    index: i64,
    ty: TypeRef,
) -> OperationState<'ctx> {
    let mut state = OperationState::new(ctx, location, "std.dim");
    state
        .add_operands(&[memref])
        .add_types(&[ty])
        .add_attribute("index", ctx.integer_attr(index));
    state
}

pub fn ret<'ctx>(
    ctx: &'ctx Context,
    location: Option<Location>,
    operands: &[ValueRef],
) -> OperationState<'ctx> {
    let mut state = OperationState::new(ctx, location, "std.return");
    state.add_operands(operands);
    state
}

/// Register descriptors for every standard op.
pub fn register(ctx: &Context) {
    let pure = OpProperties {
        pure: true,
        ..Default::default()
    };
    let commutative = OpProperties {
        commutative: true,
        ..pure
    };
    let terminator = OpProperties {
        terminator: true,
        ..Default::default()
    };

    let arith = |name: &str, properties| {
        AbstractOperation::new(ctx.intern(name))
            .operands(Arity::Exact(2))
            .results(Arity::Exact(1))
            .properties(properties)
    };
    ctx.register_operation(arith("std.add", commutative));
    ctx.register_operation(arith("std.sub", pure));
    ctx.register_operation(arith("std.mul", commutative));

    ctx.register_operation(
        AbstractOperation::new(ctx.intern("std.constant"))
            .operands(Arity::Exact(0))
            .results(Arity::Exact(1))
            .properties(pure),
    );
    ctx.register_operation(
        AbstractOperation::new(ctx.intern("std.dim"))
            .operands(Arity::Exact(1))
            .results(Arity::Exact(1))
            .properties(pure),
    );
    ctx.register_operation(
        AbstractOperation::new(ctx.intern("std.return"))
            .operands(Arity::Any)
            .results(Arity::Exact(0))
            .properties(terminator),
    );
}
