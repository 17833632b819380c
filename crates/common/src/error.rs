//! The error taxonomy shared by program loading and execution.
//!
//! Every error is fatal to the current run: the first one raised anywhere
//! in the load phase or the main loop terminates execution. The CLI maps
//! each kind to its own process exit status.

use thiserror::Error;

/// Errors raised while loading or executing a Rill program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Malformed instruction stream: bad or duplicate order numbers,
    /// unknown opcode, wrong argument count or shape.
    #[error("invalid source structure: {0}")]
    InvalidSourceStructure(String),

    /// Duplicate label, redeclared variable, or undefined label target.
    #[error("semantic error: {0}")]
    Semantic(String),

    /// An operand's runtime type does not match the required type, or an
    /// operation was given a type it does not support.
    #[error("operand type error: {0}")]
    OperandType(String),

    /// A value outside the legal domain of an operation (division by zero,
    /// out-of-range exit code).
    #[error("operand value error: {0}")]
    OperandValue(String),

    /// String index out of bounds or escape code out of range.
    #[error("string operation error: {0}")]
    StringOperation(String),

    /// Reference to an undeclared variable.
    #[error("variable access error: {0}")]
    VariableAccess(String),

    /// Reference to an undefined temporary frame or an empty local-frame
    /// stack.
    #[error("frame access error: {0}")]
    FrameAccess(String),

    /// Read of an uninitialized variable, or pop of an empty data or call
    /// stack.
    #[error("missing value: {0}")]
    Value(String),

    /// An engine invariant was violated. Never caused by user input.
    #[error("internal error: {0}")]
    Internal(String),
}
