//! Typed operation views.
//!
//! A typed op (e.g. `AddOp`) is a thin wrapper around a borrowed operation
//! that gives its operands and attributes meaningful names. Each typed op
//! decides whether it applies to a given operation through a pure predicate,
//! [`OpClass::is_class_for`]. New typed ops are defined anywhere, without
//! touching the core, by implementing [`OpClass`] (usually through
//! [`op_class!`](crate::op_class)).

use crate::operation::Operation;

/// A typed view over an operation of family `O`.
pub trait OpClass<'a, 'ctx, O: Operation<'ctx> + ?Sized>: Copy {
    /// Full operation name, e.g. `"arith.add"`.
    const OPERATION_NAME: &'static str;

    /// Whether `op` is of this class. Pure: no side effects, no allocation.
    fn is_class_for(op: &O) -> bool {
        op.name().is(op.context(), Self::OPERATION_NAME)
    }

    /// Wrap `op` without checking; callers must have checked
    /// [`is_class_for`](Self::is_class_for).
    fn from_operation_unchecked(op: &'a O) -> Self;

    fn operation(&self) -> &'a O;
}

/// Result of a checked downcast.
///
/// An `OpPointer` is always valid to hold and to query. When the downcast
/// failed it is *invalid* and [`get`](Self::get) returns `None`, so the typed
/// accessors can only be reached after a validity check.
#[derive(Clone, Copy, Debug)]
pub struct OpPointer<Op>(Option<Op>);

impl<Op> OpPointer<Op> {
    pub fn new(op: Op) -> Self {
        OpPointer(Some(op))
    }

    pub fn null() -> Self {
        OpPointer(None)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn into_inner(self) -> Option<Op> {
        self.0
    }
}

impl<Op: Copy> OpPointer<Op> {
    pub fn get(&self) -> Option<Op> {
        self.0
    }
}

impl<Op> From<Option<Op>> for OpPointer<Op> {
    fn from(op: Option<Op>) -> Self {
        OpPointer(op)
    }
}

impl<Op> Default for OpPointer<Op> {
    fn default() -> Self {
        Self::null()
    }
}

/// Define a typed op with a fixed number of operands and results.
///
/// The generated predicate checks the operation name and both counts. Each
/// listed operand and result becomes an accessor returning its `ValueRef`.
///
/// ```
/// keel_ir::op_class! {
///     /// Bitwise and.
///     pub struct AndOp = "arith.and" {
///         operands: [lhs, rhs],
///         results: [result],
///     }
/// }
/// ```
#[macro_export]
macro_rules! op_class {
    (@count) => { 0usize };
    (@count $head:ident $(, $tail:ident)*) => {
        1usize + $crate::op_class!(@count $($tail),*)
    };

    (@accessors $method:ident, $idx:expr;) => {};
    (@accessors $method:ident, $idx:expr; $head:ident $(, $tail:ident)*) => {
        pub fn $head(&self) -> $crate::ValueRef {
            $crate::Operation::$method(self.op, $idx)
        }
        $crate::op_class!(@accessors $method, $idx + 1; $($tail),*);
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $ty:ident = $name:literal {
            operands: [$($operand:ident),* $(,)?],
            results: [$($result:ident),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $ty<'a, O: ?Sized> {
            op: &'a O,
        }

        impl<O: ?Sized> Clone for $ty<'_, O> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<O: ?Sized> Copy for $ty<'_, O> {}

        impl<'a, 'ctx, O: $crate::Operation<'ctx> + ?Sized> $crate::OpClass<'a, 'ctx, O>
            for $ty<'a, O>
        {
            const OPERATION_NAME: &'static str = $name;

            fn is_class_for(op: &O) -> bool {
                $crate::Operation::name(op).is($crate::Operation::context(op), $name)
                    && $crate::Operation::num_operands(op) == $crate::op_class!(@count $($operand),*)
                    && $crate::Operation::num_results(op) == $crate::op_class!(@count $($result),*)
            }

            fn from_operation_unchecked(op: &'a O) -> Self {
                Self { op }
            }

            fn operation(&self) -> &'a O {
                self.op
            }
        }

        impl<'a, 'ctx, O: $crate::Operation<'ctx> + ?Sized> $ty<'a, O> {
            $crate::op_class!(@accessors operand, 0usize; $($operand),*);
            $crate::op_class!(@accessors result, 0usize; $($result),*);
        }
    };
}
