//! Rill common types and program loading.
//!
//! This crate provides the foundational data structures for the Rill
//! instruction language:
//!
//! - [`Value`] — runtime value representation, including the
//!   uninitialized state
//! - [`TypeTag`] — the four scalar types
//! - [`Opcode`] — the closed instruction set with per-opcode arity
//! - [`Symbol`] / [`FrameSelector`] — parsed instruction operands
//! - [`SourceInstruction`] — raw records from the instruction source
//! - [`Program`] — the validated, ordered instruction index and label table
//! - [`RunError`] — the error taxonomy shared by loading and execution
//! - [`strings`] — escape-sequence and codepoint helpers
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod source;
pub mod strings;
pub mod symbol;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::RunError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use source::{SourceArg, SourceInstruction};
pub use symbol::{FrameSelector, Symbol};
pub use type_tag::TypeTag;
pub use value::Value;

#[cfg(test)]
mod proptests {
    use super::strings::decode_escapes;
    use proptest::prelude::*;

    proptest! {
        /// Decoding never panics, whatever the input.
        #[test]
        fn decode_never_panics(s in ".*") {
            let _ = decode_escapes(&s);
        }

        /// On input without backslashes, decoding is the identity.
        #[test]
        fn decode_is_identity_without_backslashes(s in "[^\\\\]*") {
            prop_assert_eq!(decode_escapes(&s).unwrap(), s);
        }

        /// Every in-range three-digit escape decodes to its character.
        #[test]
        fn decode_single_escape(code in 0u32..=255) {
            let input = format!("\\{code:03}");
            let decoded = decode_escapes(&input).unwrap();
            let expected: String = char::from_u32(code).unwrap().to_string();
            prop_assert_eq!(decoded, expected);
        }

        /// Decoding successful output a second time is a no-op whenever the
        /// first pass consumed every backslash-digit run.
        #[test]
        fn decode_idempotent_when_output_is_escape_free(s in "([a-z]|\\\\[0-1][0-9][0-9])*") {
            let once = decode_escapes(&s).unwrap();
            if !once.contains('\\') {
                prop_assert_eq!(decode_escapes(&once).unwrap(), once);
            }
        }
    }
}
