//! Operation descriptors.
//!
//! An [`AbstractOperation`] records what the context knows about an
//! operation name: how many operands and results it takes, and a few
//! structural properties. Descriptors are registered in the `Context`;
//! operations with unregistered names are legal and simply have none.

use std::fmt;

use crate::identifier::Identifier;

/// Accepted number of operands or results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(u32),
    AtLeast(u32),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n as usize,
            Arity::AtLeast(n) => count >= n as usize,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpProperties {
    /// Ends a block or statement list.
    pub terminator: bool,
    /// Operand order does not affect the result.
    pub commutative: bool,
    /// No side effects; removable when its results are unused.
    pub pure: bool,
}

/// Descriptor for a registered operation name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbstractOperation {
    pub name: Identifier,
    pub operands: Arity,
    pub results: Arity,
    pub properties: OpProperties,
}

impl AbstractOperation {
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            operands: Arity::Any,
            results: Arity::Any,
            properties: OpProperties::default(),
        }
    }

    pub fn operands(mut self, arity: Arity) -> Self {
        self.operands = arity;
        self
    }

    pub fn results(mut self, arity: Arity) -> Self {
        self.results = arity;
        self
    }

    pub fn properties(mut self, properties: OpProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn is_terminator(&self) -> bool {
        self.properties.terminator
    }

    pub fn is_commutative(&self) -> bool {
        self.properties.commutative
    }

    pub fn is_pure(&self) -> bool {
        self.properties.pure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(4));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert!(Arity::Any.accepts(0));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }
}
