//! Opcode definitions for the Rill instruction set.
//!
//! The instruction set is closed: every opcode is a variant here, carrying
//! its fixed argument arity. Opcode names are resolved once, when the
//! program is loaded, never re-derived from a string during execution.

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Data movement
    /// Copy a symbol's value into a variable.
    Move,

    // Frame management
    /// Replace the temporary frame with a new empty frame.
    CreateFrame,
    /// Move the temporary frame onto the local-frame stack.
    PushFrame,
    /// Move the top local frame back into the temporary slot.
    PopFrame,

    // Declaration
    /// Declare a new, uninitialized variable.
    DefVar,

    // Call & return
    /// Save the current order on the call stack and jump to a label.
    Call,
    /// Pop the call stack and resume after the saved order.
    Return,

    // Data stack
    /// Push a symbol's value onto the data stack.
    Pushs,
    /// Pop the data stack into a variable.
    Pops,

    // Arithmetic
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Integer multiplication.
    Mul,
    /// Integer division, truncating toward zero. Division by zero is a
    /// runtime error.
    Idiv,

    // Relational
    /// Less-than comparison into a boolean variable.
    Lt,
    /// Greater-than comparison into a boolean variable.
    Gt,
    /// Equality comparison into a boolean variable.
    Eq,

    // Boolean
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Logical negation.
    Not,

    // Conversion
    /// Character from an integer codepoint.
    Int2Char,
    /// Integer codepoint of a character at an index.
    Stri2Int,

    // Input & output
    /// Read a value of a named type from the input source.
    Read,
    /// Write a symbol's value to the output channel.
    Write,

    // Strings
    /// String concatenation.
    Concat,
    /// String length.
    StrLen,
    /// Single character at an index.
    GetChar,
    /// Replace the character at an index.
    SetChar,

    // Typing
    /// Store a symbol's type name as a string.
    Type,

    // Control flow
    /// Define a program point. No-op at execution time.
    Label,
    /// Unconditional jump to a label.
    Jump,
    /// Jump to a label if two symbols compare equal.
    JumpIfEq,
    /// Jump to a label if two symbols compare unequal.
    JumpIfNeq,
    /// Terminate the run with an exit code in 0-9.
    Exit,

    // Debugging
    /// Write a symbol's value to the diagnostic channel.
    Dprint,
    /// Write interpreter state to the diagnostic channel.
    Break,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::StrLen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::StrLen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Returns the fixed argument arity of this opcode.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => 0,

            Opcode::DefVar
            | Opcode::Call
            | Opcode::Pushs
            | Opcode::Pops
            | Opcode::Write
            | Opcode::Label
            | Opcode::Jump
            | Opcode::Exit
            | Opcode::Dprint => 1,

            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::Read
            | Opcode::StrLen
            | Opcode::Type => 2,

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar
            | Opcode::JumpIfEq
            | Opcode::JumpIfNeq => 3,
        }
    }

    /// Looks up an opcode by mnemonic, case-insensitively.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        let upper = name.to_ascii_uppercase();
        ALL_OPCODES.iter().find(|op| op.mnemonic() == upper).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 35);
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &op in &ALL_OPCODES {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Opcode::from_mnemonic("move"), Some(Opcode::Move));
        assert_eq!(Opcode::from_mnemonic("Defvar"), Some(Opcode::DefVar));
        assert_eq!(Opcode::from_mnemonic("jumpifeq"), Some(Opcode::JumpIfEq));
    }

    #[test]
    fn unknown_mnemonic_rejected() {
        assert_eq!(Opcode::from_mnemonic("FROBNICATE"), None);
        assert_eq!(Opcode::from_mnemonic(""), None);
    }

    #[test]
    fn arities() {
        assert_eq!(Opcode::CreateFrame.arity(), 0);
        assert_eq!(Opcode::Write.arity(), 1);
        assert_eq!(Opcode::Move.arity(), 2);
        assert_eq!(Opcode::JumpIfNeq.arity(), 3);
        for &op in &ALL_OPCODES {
            assert!(op.arity() <= 3, "unexpected arity for {op:?}");
        }
    }

    #[test]
    fn mnemonics_are_uppercase() {
        for &op in &ALL_OPCODES {
            let m = op.mnemonic();
            assert!(!m.is_empty());
            assert_eq!(m, m.to_uppercase());
        }
    }
}
