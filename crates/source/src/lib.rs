//! Rill source reader — turns `.rill` text into instruction records.
//!
//! The reader is the instruction-source collaborator: it delivers an
//! ordered enumeration of [`SourceInstruction`] records and nothing more.
//! All semantic validation (order numbers, opcodes, arities, literal
//! values) happens in the engine's load phase.
//!
//! # Format
//!
//! One instruction per line. `#` starts a comment. A line is an optional
//! `ORDER:` prefix, an opcode word, and whitespace-separated `kind@value`
//! argument tokens:
//!
//! ```text
//! # greet whoever is on stdin
//! DEFVAR GF@name
//! READ GF@name type@string
//! WRITE string@hello\032
//! WRITE GF@name
//! ```
//!
//! Lines without an order prefix are numbered sequentially; an explicit
//! prefix re-anchors the numbering and is passed through verbatim, so the
//! engine still sees and validates the raw order text.

pub mod error;
mod reader;

pub use error::SourceError;

use rill_common::SourceInstruction;

/// Read source text into instruction records.
///
/// Fails only on document well-formedness: argument tokens without a
/// `kind@` prefix and order prefixes with no opcode after them.
pub fn parse_source(text: &str) -> Result<Vec<SourceInstruction>, SourceError> {
    let mut orders = reader::OrderCounter::new();
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if let Some(record) = reader::parse_line(line, index + 1, &mut orders)? {
            records.push(record);
        }
    }

    Ok(records)
}
