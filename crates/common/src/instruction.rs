//! The loaded instruction form executed by the engine.

use crate::opcode::Opcode;
use crate::source::SourceArg;

/// One loaded instruction: a validated order, a resolved opcode, and its
/// raw argument nodes.
///
/// Arguments stay in source form here; the engine extracts and validates
/// them against the opcode's arity when the instruction executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The unique positive order of this instruction.
    pub order: u32,
    /// The operation to perform.
    pub opcode: Opcode,
    /// The ordered argument nodes.
    pub args: Vec<SourceArg>,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(order: u32, opcode: Opcode, args: Vec<SourceArg>) -> Self {
        Self {
            order,
            opcode,
            args,
        }
    }
}
