//! Interned identifiers.

use std::fmt;

use lasso::Spur;

use crate::context::Context;

/// An interned name.
///
/// Identifiers compare by key, never by text: interning the same string in
/// one `Context` always yields the same key. Keys from different contexts
/// are unrelated and must not be mixed.
///
/// The text lives in the context; use [`Context::with_identifier`] or
/// [`Identifier::display`] to reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(pub(crate) Spur);

impl Identifier {
    /// Whether this identifier's text is exactly `text`.
    pub fn is(self, ctx: &Context, text: &str) -> bool {
        ctx.with_identifier(self, |s| s == text)
    }

    /// Adapter implementing `Display` by resolving through `ctx`.
    pub fn display(self, ctx: &Context) -> DisplayIdentifier<'_> {
        DisplayIdentifier { id: self, ctx }
    }
}

/// Anything that names an identifier in a given context.
pub trait IntoIdentifier: Copy {
    fn into_identifier(self, ctx: &Context) -> Identifier;
}

impl IntoIdentifier for Identifier {
    fn into_identifier(self, _ctx: &Context) -> Identifier {
        self
    }
}

impl IntoIdentifier for &str {
    fn into_identifier(self, ctx: &Context) -> Identifier {
        ctx.intern(self)
    }
}

/// See [`Identifier::display`].
pub struct DisplayIdentifier<'a> {
    id: Identifier,
    ctx: &'a Context,
}

impl fmt::Display for DisplayIdentifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ctx.with_identifier(self.id, |s| f.write_str(s))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;

    #[test]
    fn same_text_same_identifier() {
        let ctx = Context::new();
        let a = ctx.intern("overflow");
        let b = ctx.intern(&String::from("overflow"));
        assert_eq!(a, b);
        assert_ne!(a, ctx.intern("nsw"));
    }

    #[test]
    fn is_compares_text() {
        let ctx = Context::new();
        let id = ctx.intern("arith.add");
        assert!(id.is(&ctx, "arith.add"));
        assert!(!id.is(&ctx, "arith.sub"));
        assert_eq!(id.display(&ctx).to_string(), "arith.add");
    }

    #[test]
    fn lookup_does_not_intern() {
        let ctx = Context::new();
        assert_eq!(ctx.lookup("missing"), None);
        let id = ctx.intern("present");
        assert_eq!(ctx.lookup("present"), Some(id));
        assert_eq!(ctx.lookup("missing"), None);
    }
}
