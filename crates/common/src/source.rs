//! Instruction records as delivered by the instruction-source collaborator.
//!
//! The engine consumes an ordered enumeration of these records and never
//! parses the underlying document format itself. Order and argument values
//! arrive as raw text; the load phase validates them.

/// One argument node of a source instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArg {
    /// The argument kind: `var`, `int`, `bool`, `string`, `nil`, `label`,
    /// or `type`.
    pub kind: String,
    /// The raw argument text.
    pub value: String,
}

impl SourceArg {
    /// Create an argument node.
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// One instruction record from the instruction source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInstruction {
    /// The raw order text, validated as a positive decimal at load time.
    pub order: String,
    /// The raw opcode name, resolved at load time.
    pub opcode: String,
    /// The ordered argument nodes.
    pub args: Vec<SourceArg>,
}

impl SourceInstruction {
    /// Create an instruction record.
    pub fn new(
        order: impl Into<String>,
        opcode: impl Into<String>,
        args: Vec<SourceArg>,
    ) -> Self {
        Self {
            order: order.into(),
            opcode: opcode.into(),
            args,
        }
    }
}
