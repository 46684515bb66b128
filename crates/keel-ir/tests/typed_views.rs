//! Narrowing generic operations to standard dialect views.

use keel_ir::dialect::standard::{self, AddOp, ConstantOp, DimOp, MulOp, ReturnOp, SubOp};
use keel_ir::validation::verify_function;
use keel_ir::{Context, FunctionKind, Module, OpClass, OpPointer, Operation, OperationState};

/// A function `f(a, b)` computing `(a + b) * 2` and returning it.
fn build_cfg(ctx: &Context) -> (Module<'_>, keel_ir::FuncRef, Vec<keel_ir::InstRef>) {
    standard::register(ctx);
    let i32_ty = ctx.simple_type("core", "i32");
    let mut module = Module::new(ctx);
    let f = module.create_function("f", FunctionKind::Cfg, &[i32_ty, i32_ty]);
    let func = module.function_mut(f).unwrap();
    let bb = func.create_block().unwrap();
    let (a, b) = (func.args()[0], func.args()[1]);

    let sum = func
        .create_inst(bb, &standard::add(ctx, None, a, b, i32_ty))
        .unwrap();
    let two = func
        .create_inst(bb, &standard::constant(ctx, None, ctx.integer_attr(2), i32_ty))
        .unwrap();
    let (sum_v, two_v) = (func.inst(sum).result(0), func.inst(two).result(0));
    let prod = func
        .create_inst(bb, &standard::mul(ctx, None, sum_v, two_v, i32_ty))
        .unwrap();
    let prod_v = func.inst(prod).result(0);
    let ret = func
        .create_inst(bb, &standard::ret(ctx, None, &[prod_v]))
        .unwrap();

    (module, f, vec![sum, two, prod, ret])
}

#[test]
fn get_as_narrows_to_matching_kind() {
    let ctx = Context::new();
    let (module, f, insts) = build_cfg(&ctx);
    let func = module.function(f).unwrap();
    let add = func.inst(insts[0]);

    let view = add.get_as::<AddOp<_>>();
    assert!(view.is_valid());
    let view = view.get().unwrap();
    assert_eq!(view.lhs(), func.args()[0]);
    assert_eq!(view.rhs(), func.args()[1]);
    assert_eq!(view.result(), add.result(0));
    assert!(std::ptr::eq(view.operation(), add));

    let constant = func.inst(insts[1]).get_as::<ConstantOp<_>>().get().unwrap();
    assert_eq!(constant.value(), &ctx.integer_attr(2));
}

#[test]
fn mismatched_kind_yields_invalid_view() {
    let ctx = Context::new();
    let (module, f, insts) = build_cfg(&ctx);
    let func = module.function(f).unwrap();
    let add = func.inst(insts[0]);

    let view: OpPointer<SubOp<_>> = add.get_as();
    assert!(!view.is_valid());
    assert!(view.get().is_none());
    assert!(view.into_inner().is_none());
    assert!(!add.is::<ConstantOp<_>>());
}

#[test]
fn is_agrees_with_get_as_for_every_kind() {
    let ctx = Context::new();
    let (module, f, insts) = build_cfg(&ctx);
    let func = module.function(f).unwrap();

    for &inst in &insts {
        let op = func.inst(inst);
        assert_eq!(op.is::<AddOp<_>>(), op.get_as::<AddOp<_>>().is_valid());
        assert_eq!(op.is::<SubOp<_>>(), op.get_as::<SubOp<_>>().is_valid());
        assert_eq!(op.is::<MulOp<_>>(), op.get_as::<MulOp<_>>().is_valid());
        assert_eq!(op.is::<ConstantOp<_>>(), op.get_as::<ConstantOp<_>>().is_valid());
        assert_eq!(op.is::<DimOp<_>>(), op.get_as::<DimOp<_>>().is_valid());
        assert_eq!(op.is::<ReturnOp<_>>(), op.get_as::<ReturnOp<_>>().is_valid());
    }

    let matches: Vec<_> = insts
        .iter()
        .map(|&inst| {
            let op = func.inst(inst);
            [
                op.is::<AddOp<_>>(),
                op.is::<ConstantOp<_>>(),
                op.is::<MulOp<_>>(),
                op.is::<ReturnOp<_>>(),
            ]
        })
        .collect();
    assert_eq!(
        matches,
        [
            [true, false, false, false],
            [false, true, false, false],
            [false, false, true, false],
            [false, false, false, true],
        ]
    );
}

#[test]
fn predicate_checks_shape_not_just_name() {
    let ctx = Context::new();
    let mut module = Module::new(&ctx);
    let i32_ty = ctx.simple_type("core", "i32");
    let f = module.create_function("f", FunctionKind::Ml, &[i32_ty]);
    let func = module.function_mut(f).unwrap();
    let a = func.args()[0];

    // Right name, wrong arity.
    let mut state = OperationState::new(&ctx, None, "std.add");
    state.add_operands(&[a]).add_types(&[i32_ty]);
    let short_add = func.create_stmt(&state).unwrap();

    // Right name, index of the wrong payload type.
    let mut state = OperationState::new(&ctx, None, "std.dim");
    state
        .add_operands(&[a])
        .add_types(&[i32_ty])
        .add_attribute("index", ctx.string_attr("0"));
    let bad_dim = func.create_stmt(&state).unwrap();

    let good_dim = func
        .create_stmt(&standard::dim(&ctx, None, a, 1, i32_ty))
        .unwrap();

    assert!(!func.stmt(short_add).is::<AddOp<_>>());
    assert!(!func.stmt(bad_dim).is::<DimOp<_>>());
    let dim = func.stmt(good_dim).get_as::<DimOp<_>>().get().unwrap();
    assert_eq!(dim.memref(), a);
    assert_eq!(dim.index(), 1);
}

#[test]
fn views_over_statements() {
    let ctx = Context::new();
    standard::register(&ctx);
    let i32_ty = ctx.simple_type("core", "i32");
    let mut module = Module::new(&ctx);
    let f = module.create_function("g", FunctionKind::Ml, &[i32_ty, i32_ty]);
    let func = module.function_mut(f).unwrap();
    let (a, b) = (func.args()[0], func.args()[1]);

    let diff = func
        .create_stmt(&standard::sub(&ctx, None, a, b, i32_ty))
        .unwrap();
    let diff_v = func.stmt(diff).result(0);
    let ret = func
        .create_stmt(&standard::ret(&ctx, None, &[diff_v, a]))
        .unwrap();

    let sub = func.stmt(diff).get_as::<SubOp<_>>().get().unwrap();
    assert_eq!((sub.lhs(), sub.rhs()), (a, b));

    let ret = func.stmt(ret).get_as::<ReturnOp<_>>().get().unwrap();
    assert_eq!(ret.num_operands(), 2);
    assert_eq!(ret.operands().collect::<Vec<_>>(), [diff_v, a]);
    assert_eq!(verify_function(func), Ok(()));
}

#[test]
fn registered_descriptors() {
    let ctx = Context::new();
    let (module, f, insts) = build_cfg(&ctx);
    let func = module.function(f).unwrap();

    let add = func.inst(insts[0]).abstract_operation().unwrap();
    assert!(add.is_commutative() && add.is_pure());
    let ret = func.inst(insts[3]).abstract_operation().unwrap();
    assert!(ret.is_terminator());
    assert!(ctx.is_registered(ctx.intern("std.dim")));

    assert_eq!(verify_function(func), Ok(()));
}
