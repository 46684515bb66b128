//! Error types for building and checking IR.

use derive_more::{Display, Error, From};

use crate::function::FunctionKind;
use crate::refs::{BlockRef, FuncRef, ValueRef};
use crate::validation::VerifyError;

pub type Result<T> = std::result::Result<T, IrError>;

#[derive(Clone, Debug, Display, Error, From, PartialEq)]
pub enum IrError {
    #[display("{expected:?} operation requested in a {actual:?} function")]
    WrongFunctionKind {
        expected: FunctionKind,
        actual: FunctionKind,
    },

    #[display("operand references {_0}, which is not defined in this function")]
    UnknownValue(#[error(not(source))] ValueRef),

    #[display("no such block: {_0}")]
    UnknownBlock(#[error(not(source))] BlockRef),

    #[display("no such function: {_0}")]
    UnknownFunction(#[error(not(source))] FuncRef),

    #[display("operation state belongs to a different context")]
    ForeignContext,

    #[display("verification failed: {_0}")]
    #[from]
    Verify(VerifyError),
}
