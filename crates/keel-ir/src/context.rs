//! Context: shared state for one compilation.
//!
//! The context interns identifiers, types, paths and attributes, owns the
//! diagnostic handler and the registry of operation descriptors. It is
//! read-mostly and shared by reference: every operation borrows it for its
//! whole lifetime, so a context always outlives the IR built in it.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use lasso::{Rodeo, Spur};
use parking_lot::RwLock;

use crate::attribute::{AttrData, Attribute};
use crate::diagnostic::{Diagnostic, DiagnosticHandler, Severity};
use crate::identifier::Identifier;
use crate::location::{Location, Span};
use crate::refs::{PathRef, TypeRef};
use crate::registry::AbstractOperation;
use crate::types::{PathInterner, TypeData, TypeInterner};

/// What happens after an error diagnostic has been delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Report the error and return to the caller.
    #[default]
    Continue,
    /// Report the error, then abort the process.
    Abort,
}

/// Construction options for a [`Context`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextOptions {
    pub error_policy: ErrorPolicy,
}

pub struct Context {
    options: ContextOptions,
    identifiers: RwLock<Rodeo>,
    types: RwLock<TypeInterner>,
    paths: RwLock<PathInterner>,
    attrs: RwLock<HashMap<AttrData, Attribute>>,
    operations: DashMap<Identifier, AbstractOperation>,
    handler: RwLock<Option<Arc<dyn DiagnosticHandler>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Self {
        Self {
            options,
            identifiers: RwLock::new(Rodeo::default()),
            types: RwLock::new(TypeInterner::new()),
            paths: RwLock::new(PathInterner::new()),
            attrs: RwLock::new(HashMap::new()),
            operations: DashMap::new(),
            handler: RwLock::new(None),
        }
    }

    pub fn options(&self) -> ContextOptions {
        self.options
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Intern `text`, returning the same identifier for equal strings.
    pub fn intern(&self, text: &str) -> Identifier {
        let mut lock = self.identifiers.upgradable_read();
        Identifier(if let Some(spur) = lock.get(text) {
            spur
        } else {
            lock.with_upgraded(|rodeo: &mut Rodeo| -> Spur { rodeo.get_or_intern(text) })
        })
    }

    /// Find the identifier for `text` without interning it.
    pub fn lookup(&self, text: &str) -> Option<Identifier> {
        self.identifiers.read().get(text).map(Identifier)
    }

    /// Access an identifier's text with zero-copy.
    ///
    /// Uses a recursive read lock so `f` may itself resolve identifiers.
    pub fn with_identifier<R>(&self, id: Identifier, f: impl FnOnce(&str) -> R) -> R {
        let rodeo = self.identifiers.read_recursive();
        f(rodeo.resolve(&id.0))
    }

    // ========================================================================
    // Types & paths
    // ========================================================================

    pub fn intern_type(&self, data: TypeData) -> TypeRef {
        self.types.write().intern(data)
    }

    pub fn type_data(&self, ty: TypeRef) -> TypeData {
        self.types.read().get(ty).clone()
    }

    /// Shorthand for a parameterless type `dialect.name`.
    pub fn simple_type(&self, dialect: &str, name: &str) -> TypeRef {
        self.intern_type(TypeData::new(self.intern(dialect), self.intern(name)))
    }

    pub fn intern_path(&self, path: &str) -> PathRef {
        self.paths.write().intern(path.into())
    }

    pub fn path(&self, path: PathRef) -> String {
        self.paths.read().get(path).to_string()
    }

    pub fn location(&self, path: &str, span: Span) -> Location {
        Location::new(self.intern_path(path), span)
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Unique `data`, returning the shared handle for equal payloads.
    pub fn attr(&self, data: AttrData) -> Attribute {
        let mut lock = self.attrs.upgradable_read();
        if let Some(existing) = lock.get(&data) {
            return existing.clone();
        }
        lock.with_upgraded(|attrs| {
            attrs
                .entry(data.clone())
                .or_insert_with(|| Attribute::new(data))
                .clone()
        })
    }

    pub fn unit_attr(&self) -> Attribute {
        self.attr(AttrData::Unit)
    }

    pub fn bool_attr(&self, value: bool) -> Attribute {
        self.attr(AttrData::Bool(value))
    }

    pub fn integer_attr(&self, value: i64) -> Attribute {
        self.attr(AttrData::Integer(value))
    }

    pub fn float_attr(&self, value: f64) -> Attribute {
        self.attr(AttrData::FloatBits(value.to_bits()))
    }

    pub fn string_attr(&self, value: impl Into<String>) -> Attribute {
        self.attr(AttrData::String(value.into()))
    }

    pub fn type_attr(&self, ty: TypeRef) -> Attribute {
        self.attr(AttrData::Type(ty))
    }

    pub fn array_attr(&self, elements: Vec<Attribute>) -> Attribute {
        self.attr(AttrData::Array(elements))
    }

    /// A source location as an attribute value, e.g. for fused or callee
    /// locations.
    pub fn location_attr(&self, loc: Location) -> Attribute {
        self.attr(AttrData::Location(loc))
    }

    // ========================================================================
    // Operation registry
    // ========================================================================

    /// Register a descriptor, replacing (and returning) any previous one with
    /// the same name.
    pub fn register_operation(&self, op: AbstractOperation) -> Option<AbstractOperation> {
        tracing::debug!(name = %op.name.display(self), "registering operation");
        self.operations.insert(op.name, op)
    }

    pub fn abstract_operation(&self, name: Identifier) -> Option<AbstractOperation> {
        self.operations.get(&name).map(|entry| *entry.value())
    }

    pub fn is_registered(&self, name: Identifier) -> bool {
        self.operations.contains_key(&name)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Install the handler that receives every diagnostic, replacing any
    /// previous one.
    pub fn set_diagnostic_handler(&self, handler: impl DiagnosticHandler + 'static) {
        *self.handler.write() = Some(Arc::new(handler));
    }

    /// Remove the handler; diagnostics fall back to `tracing` events.
    pub fn clear_diagnostic_handler(&self) {
        *self.handler.write() = None;
    }

    /// Deliver a diagnostic to the registered handler.
    ///
    /// The handler runs without any context lock held, so it may replace or
    /// clear itself. Under [`ErrorPolicy::Abort`] an error diagnostic
    /// terminates the process after delivery.
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler.handle(&diagnostic),
            None => self.log_diagnostic(&diagnostic),
        }

        if diagnostic.severity == Severity::Error && self.options.error_policy == ErrorPolicy::Abort
        {
            tracing::error!("aborting on error diagnostic");
            std::process::abort();
        }
    }

    fn log_diagnostic(&self, diagnostic: &Diagnostic) {
        let location = diagnostic
            .location
            .map(|loc| self.format_location(loc))
            .unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => tracing::error!(%location, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(%location, "{}", diagnostic.message),
            Severity::Note => tracing::info!(%location, "{}", diagnostic.message),
        }
    }

    fn format_location(&self, loc: Location) -> String {
        let paths = self.paths.read();
        format!("{}:{}..{}", paths.get(loc.path), loc.span.start, loc.span.end)
    }

    /// Render a diagnostic with its location resolved, e.g.
    /// `file:///a.kl:4..9: ERROR: message`.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        match diagnostic.location {
            Some(loc) => format!("{}: {}", self.format_location(loc), diagnostic),
            None => diagnostic.to_string(),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::registry::Arity;

    #[test]
    fn diagnostics_reach_handler_in_order() {
        let ctx = Context::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ctx.set_diagnostic_handler(move |d: &Diagnostic| sink.lock().unwrap().push(d.clone()));

        let loc = ctx.location("file:///main.kl", Span::new(4, 9));
        ctx.emit_diagnostic(Diagnostic {
            severity: Severity::Warning,
            location: Some(loc),
            message: "unused result".into(),
        });
        ctx.emit_diagnostic(Diagnostic {
            severity: Severity::Error,
            location: None,
            message: "broken".into(),
        });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].severity, Severity::Warning);
        assert_eq!(seen[1].severity, Severity::Error);
        insta::assert_snapshot!(ctx.format_diagnostic(&seen[0]), @"file:///main.kl:4..9: WARNING: unused result");
        insta::assert_snapshot!(ctx.format_diagnostic(&seen[1]), @"ERROR: broken");
    }

    #[test]
    fn handler_may_clear_itself() {
        let ctx = Arc::new(Context::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let weak = Arc::downgrade(&ctx);
        ctx.set_diagnostic_handler(move |d: &Diagnostic| {
            sink.lock().unwrap().push(d.message.clone());
            if let Some(ctx) = weak.upgrade() {
                ctx.clear_diagnostic_handler();
            }
        });

        for message in ["first", "second"] {
            ctx.emit_diagnostic(Diagnostic {
                severity: Severity::Note,
                location: None,
                message: message.into(),
            });
        }
        assert_eq!(*seen.lock().unwrap(), ["first"]);
    }

    #[test]
    fn errors_without_handler_continue_by_default() {
        let ctx = Context::new();
        assert_eq!(ctx.options().error_policy, ErrorPolicy::Continue);
        ctx.emit_diagnostic(Diagnostic {
            severity: Severity::Error,
            location: None,
            message: "logged only".into(),
        });
    }

    #[test]
    fn registry_lookup_and_replace() {
        let ctx = Context::new();
        let name = ctx.intern("test.op");
        assert!(ctx.abstract_operation(name).is_none());

        let first = AbstractOperation::new(name).operands(Arity::Exact(1));
        assert!(ctx.register_operation(first).is_none());
        assert!(ctx.is_registered(name));

        let second = AbstractOperation::new(name).operands(Arity::Exact(2));
        assert_eq!(ctx.register_operation(second), Some(first));
        assert_eq!(ctx.abstract_operation(name), Some(second));
    }

    #[test]
    fn simple_types_are_interned() {
        let ctx = Context::new();
        let a = ctx.simple_type("core", "i32");
        let b = ctx.simple_type("core", "i32");
        assert_eq!(a, b);
        let data = ctx.type_data(a);
        assert!(data.name.is(&ctx, "i32"));
        assert!(data.dialect.is(&ctx, "core"));
    }
}
