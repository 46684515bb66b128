//! Operation construction.

use smallvec::SmallVec;

use crate::attribute::Attribute;
use crate::attrs::NamedAttribute;
use crate::context::Context;
use crate::identifier::{Identifier, IntoIdentifier};
use crate::location::Location;
use crate::refs::{TypeRef, ValueRef};

/// Everything needed to create one operation, accumulated piece by piece.
///
/// A state is short-lived: build it on the stack, hand it to
/// [`Function::create_inst`](crate::Function::create_inst) or
/// [`Function::create_stmt`](crate::Function::create_stmt), and drop it. It
/// is not `Clone`. The created operation copies what it needs, so the state
/// may be dropped right after creation.
///
/// `types` lists the result types; one result is created per entry.
#[must_use]
pub struct OperationState<'ctx> {
    pub context: &'ctx Context,
    pub location: Option<Location>,
    pub name: Identifier,
    pub operands: SmallVec<[ValueRef; 4]>,
    pub types: SmallVec<[TypeRef; 4]>,
    pub attributes: SmallVec<[NamedAttribute; 4]>,
}

impl<'ctx> OperationState<'ctx> {
    /// An empty state for an operation called `name`.
    pub fn new(context: &'ctx Context, location: Option<Location>, name: impl IntoIdentifier) -> Self {
        Self {
            context,
            location,
            name: name.into_identifier(context),
            operands: SmallVec::new(),
            types: SmallVec::new(),
            attributes: SmallVec::new(),
        }
    }

    /// A state populated in one step.
    pub fn with_parts(
        context: &'ctx Context,
        location: Option<Location>,
        name: impl IntoIdentifier,
        operands: &[ValueRef],
        types: &[TypeRef],
        attributes: impl IntoIterator<Item = NamedAttribute>,
    ) -> Self {
        let mut state = Self::new(context, location, name);
        state.add_operands(operands);
        state.add_types(types);
        state.attributes.extend(attributes);
        state
    }

    pub fn add_operands(&mut self, operands: &[ValueRef]) -> &mut Self {
        self.operands.extend_from_slice(operands);
        self
    }

    pub fn add_types(&mut self, types: &[TypeRef]) -> &mut Self {
        self.types.extend_from_slice(types);
        self
    }

    /// Append an attribute. A repeated name keeps its first position and
    /// takes the last value once the operation is created.
    pub fn add_attribute(&mut self, name: impl IntoIdentifier, value: Attribute) -> &mut Self {
        self.attributes
            .push(NamedAttribute::new(name.into_identifier(self.context), value));
        self
    }
}
