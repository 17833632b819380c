//! Error types for the Rill source reader.
//!
//! These cover document well-formedness only. Order validation, opcode
//! resolution, and argument semantics belong to the engine's load phase.

use thiserror::Error;

/// Errors produced while reading source text into instruction records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// An argument token carried no kind prefix.
    #[error("line {line}: malformed argument '{token}' (expected kind@value)")]
    MalformedArgument { line: usize, token: String },

    /// A line had an order prefix but no opcode after it.
    #[error("line {line}: missing opcode")]
    MissingOpcode { line: usize },
}
