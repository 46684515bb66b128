//! Attribute values.
//!
//! An [`Attribute`] is an opaque, reference-counted handle to an immutable
//! [`AttrData`] payload. Handles are uniqued by the owning `Context`, so two
//! handles are equal exactly when they point at the same payload.
//!
//! Checked downcasts go through [`AttrClass`]: each typed view (e.g.
//! [`BoolAttr`]) borrows the handle and exposes the payload without copying
//! it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::location::Location;
use crate::refs::TypeRef;

/// Payload of an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrData {
    /// Unit/nil value, used for presence-only flags.
    Unit,
    Bool(bool),
    Integer(i64),
    /// Float constant stored as raw bits.
    FloatBits(u64),
    String(String),
    Type(TypeRef),
    /// List of (already uniqued) attributes.
    Array(Vec<Attribute>),
    Location(Location),
}

/// Uniqued, shared handle to an [`AttrData`].
///
/// Obtain one from `Context::attr` or one of its convenience constructors.
#[derive(Clone)]
pub struct Attribute(Arc<AttrData>);

impl Attribute {
    pub(crate) fn new(data: AttrData) -> Self {
        Attribute(Arc::new(data))
    }

    pub fn data(&self) -> &AttrData {
        &self.0
    }

    /// Checked downcast to a typed attribute view.
    pub fn dyn_cast<'a, T: AttrClass<'a>>(&'a self) -> Option<T> {
        T::from_attr(self)
    }

    pub fn isa<'a, T: AttrClass<'a>>(&'a self) -> bool {
        T::from_attr(self).is_some()
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.data(), f)
    }
}

// ============================================================================
// Typed attribute views
// ============================================================================

/// A typed view over an [`Attribute`] with a checked constructor.
pub trait AttrClass<'a>: Sized {
    /// Returns the view if `attr`'s payload is of this class.
    fn from_attr(attr: &'a Attribute) -> Option<Self>;
}

/// View over [`AttrData::Unit`].
#[derive(Clone, Copy, Debug)]
pub struct UnitAttr<'a> {
    attr: &'a Attribute,
}

impl<'a> UnitAttr<'a> {
    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for UnitAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match attr.data() {
            AttrData::Unit => Some(Self { attr }),
            _ => None,
        }
    }
}

/// View over [`AttrData::Bool`].
#[derive(Clone, Copy, Debug)]
pub struct BoolAttr<'a> {
    attr: &'a Attribute,
    value: bool,
}

impl<'a> BoolAttr<'a> {
    pub fn value(&self) -> bool {
        self.value
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for BoolAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match *attr.data() {
            AttrData::Bool(value) => Some(Self { attr, value }),
            _ => None,
        }
    }
}

/// View over [`AttrData::Integer`].
#[derive(Clone, Copy, Debug)]
pub struct IntegerAttr<'a> {
    attr: &'a Attribute,
    value: i64,
}

impl<'a> IntegerAttr<'a> {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for IntegerAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match *attr.data() {
            AttrData::Integer(value) => Some(Self { attr, value }),
            _ => None,
        }
    }
}

/// View over [`AttrData::FloatBits`].
#[derive(Clone, Copy, Debug)]
pub struct FloatAttr<'a> {
    attr: &'a Attribute,
    bits: u64,
}

impl<'a> FloatAttr<'a> {
    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits)
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for FloatAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match *attr.data() {
            AttrData::FloatBits(bits) => Some(Self { attr, bits }),
            _ => None,
        }
    }
}

/// View over [`AttrData::String`].
#[derive(Clone, Copy, Debug)]
pub struct StringAttr<'a> {
    attr: &'a Attribute,
    value: &'a str,
}

impl<'a> StringAttr<'a> {
    pub fn value(&self) -> &'a str {
        self.value
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for StringAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match attr.data() {
            AttrData::String(value) => Some(Self { attr, value }),
            _ => None,
        }
    }
}

/// View over [`AttrData::Type`].
#[derive(Clone, Copy, Debug)]
pub struct TypeAttr<'a> {
    attr: &'a Attribute,
    value: TypeRef,
}

impl<'a> TypeAttr<'a> {
    pub fn value(&self) -> TypeRef {
        self.value
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for TypeAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match *attr.data() {
            AttrData::Type(value) => Some(Self { attr, value }),
            _ => None,
        }
    }
}

/// View over [`AttrData::Array`].
#[derive(Clone, Copy, Debug)]
pub struct ArrayAttr<'a> {
    attr: &'a Attribute,
    elements: &'a [Attribute],
}

impl<'a> ArrayAttr<'a> {
    pub fn elements(&self) -> &'a [Attribute] {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for ArrayAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match attr.data() {
            AttrData::Array(elements) => Some(Self { attr, elements }),
            _ => None,
        }
    }
}

/// View over [`AttrData::Location`].
#[derive(Clone, Copy, Debug)]
pub struct LocationAttr<'a> {
    attr: &'a Attribute,
    value: Location,
}

impl<'a> LocationAttr<'a> {
    pub fn value(&self) -> Location {
        self.value
    }

    pub fn attr(&self) -> &'a Attribute {
        self.attr
    }
}

impl<'a> AttrClass<'a> for LocationAttr<'a> {
    fn from_attr(attr: &'a Attribute) -> Option<Self> {
        match *attr.data() {
            AttrData::Location(value) => Some(Self { attr, value }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::location::Span;

    #[test]
    fn uniqued_handles_compare_by_identity() {
        let ctx = Context::new();
        let a = ctx.bool_attr(true);
        let b = ctx.bool_attr(true);
        let c = ctx.bool_attr(false);
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_ne!(a, c);
    }

    #[test]
    fn dyn_cast_checks_payload_class() {
        let ctx = Context::new();
        let flag = ctx.bool_attr(true);
        let count = ctx.integer_attr(-3);
        let label = ctx.string_attr("lhs");

        assert!(flag.dyn_cast::<BoolAttr>().is_some_and(|b| b.value()));
        assert!(flag.dyn_cast::<IntegerAttr>().is_none());
        assert_eq!(count.dyn_cast::<IntegerAttr>().map(|i| i.value()), Some(-3));
        assert_eq!(label.dyn_cast::<StringAttr>().map(|s| s.value()), Some("lhs"));
        assert!(label.isa::<StringAttr>());
        assert!(!label.isa::<UnitAttr>());
    }

    #[test]
    fn array_elements_keep_identity() {
        let ctx = Context::new();
        let one = ctx.integer_attr(1);
        let two = ctx.integer_attr(2);
        let list = ctx.array_attr(vec![one.clone(), two.clone()]);
        let again = ctx.array_attr(vec![one.clone(), two.clone()]);
        assert_eq!(list, again);

        let view = list.dyn_cast::<ArrayAttr>().expect("array attribute");
        assert_eq!(view.len(), 2);
        assert_eq!(view.elements()[0], one);
        assert_eq!(view.elements()[1], two);
    }

    #[test]
    fn float_attr_round_trips_bits() {
        let ctx = Context::new();
        let half = ctx.float_attr(0.5);
        let view = half.dyn_cast::<FloatAttr>().expect("float attribute");
        assert_eq!(view.value(), 0.5);
        assert_eq!(view.bits(), 0.5f64.to_bits());
    }

    #[test]
    fn location_attr_carries_its_span() {
        let ctx = Context::new();
        let loc = ctx.location("file:///a.kl", Span::new(3, 9));
        let attr = ctx.location_attr(loc);
        assert_eq!(attr, ctx.location_attr(loc));
        assert_ne!(attr, ctx.location_attr(ctx.location("file:///a.kl", Span::new(3, 10))));

        let view = attr.dyn_cast::<LocationAttr>().expect("location attribute");
        assert_eq!(view.value(), loc);
        assert!(std::ptr::eq(view.attr(), &attr));
        assert!(!attr.isa::<IntegerAttr>());
    }
}
