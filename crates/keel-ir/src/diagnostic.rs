//! Diagnostic messages emitted against operations.

use std::fmt;

use crate::location::Location;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Note => write!(f, "NOTE"),
        }
    }
}

/// A diagnostic message with an optional source location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Option<Location>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver for every diagnostic emitted within one `Context`.
pub trait DiagnosticHandler: Send + Sync {
    fn handle(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticHandler for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn handle(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}
