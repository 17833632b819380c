//! Engine state and operand resolution.
//!
//! The machine owns all mutable run state: the frame set, the data stack,
//! the call stack, and the instruction pointer. It is constructed fresh
//! per run and touched by nothing else while the run lasts.

use rill_common::strings::decode_escapes;
use rill_common::{
    FrameSelector, Instruction, Program, RunError, SourceArg, Symbol, TypeTag, Value,
};

use crate::frame::FrameSet;
use crate::io::{InputSource, OutputSink};
use crate::stack::{CallStack, DataStack};

/// Comparison operators understood by [`Machine::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Neq,
    Lt,
    Gt,
}

/// The Rill execution engine for one program run.
pub struct Machine<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// The global, temporary, and local frames.
    pub(crate) frames: FrameSet,
    /// Operand stack for the stack-oriented instructions.
    pub(crate) stack: DataStack,
    /// Saved orders for call/return.
    pub(crate) calls: CallStack,
    /// Current instruction pointer (an order value).
    pub(crate) pc: u32,
    /// The input collaborator.
    pub(crate) input: &'a mut dyn InputSource,
    /// The normal output channel.
    pub(crate) stdout: &'a mut dyn OutputSink,
    /// The diagnostic output channel.
    pub(crate) stderr: &'a mut dyn OutputSink,
}

impl<'a> Machine<'a> {
    /// Create a machine for the given program and collaborators.
    pub fn new(
        program: &'a Program,
        input: &'a mut dyn InputSource,
        stdout: &'a mut dyn OutputSink,
        stderr: &'a mut dyn OutputSink,
    ) -> Self {
        Self {
            program,
            frames: FrameSet::new(),
            stack: DataStack::new(),
            calls: CallStack::new(),
            pc: 0,
            input,
            stdout,
            stderr,
        }
    }

    /// Read access to the frame set, for inspection after a run.
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Read access to the data stack, for inspection after a run.
    pub fn stack(&self) -> &DataStack {
        &self.stack
    }

    // ---- Operand extraction ----

    /// The argument at `index`, parsed as a symbol.
    pub(crate) fn symbol(&self, instr: &Instruction, index: usize) -> Result<Symbol, RunError> {
        Symbol::from_arg(self.arg(instr, index)?)
    }

    /// The argument at `index`, required to be a variable reference.
    pub(crate) fn variable(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<(FrameSelector, String), RunError> {
        match self.symbol(instr, index)? {
            Symbol::Var { frame, name } => Ok((frame, name)),
            Symbol::Const(_) => Err(RunError::InvalidSourceStructure(format!(
                "{} expects a variable as argument {}",
                instr.opcode.mnemonic(),
                index + 1
            ))),
        }
    }

    /// The argument at `index`, required to be a label name.
    pub(crate) fn label<'i>(
        &self,
        instr: &'i Instruction,
        index: usize,
    ) -> Result<&'i str, RunError> {
        let arg = self.arg(instr, index)?;
        if arg.kind != "label" {
            return Err(RunError::InvalidSourceStructure(format!(
                "{} expects a label as argument {}",
                instr.opcode.mnemonic(),
                index + 1
            )));
        }
        Ok(arg.value.trim())
    }

    /// The argument at `index`, required to be a scalar type name.
    pub(crate) fn type_name(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<TypeTag, RunError> {
        let arg = self.arg(instr, index)?;
        if arg.kind != "type" {
            return Err(RunError::InvalidSourceStructure(format!(
                "{} expects a type as argument {}",
                instr.opcode.mnemonic(),
                index + 1
            )));
        }
        TypeTag::from_name(arg.value.trim()).ok_or_else(|| {
            RunError::InvalidSourceStructure(format!("unknown type name '{}'", arg.value))
        })
    }

    fn arg<'i>(&self, instr: &'i Instruction, index: usize) -> Result<&'i SourceArg, RunError> {
        instr.args.get(index).ok_or_else(|| {
            RunError::InvalidSourceStructure(format!(
                "{} is missing argument {}",
                instr.opcode.mnemonic(),
                index + 1
            ))
        })
    }

    // ---- Value resolution ----

    /// Resolve a symbol to its runtime value.
    ///
    /// Variables resolve through the frame set; literals carry their own
    /// value. When `required` is given and the resolved type differs, the
    /// result is an operand-type error. String results are escape-decoded
    /// on every resolution.
    pub(crate) fn resolve(
        &self,
        sym: &Symbol,
        required: Option<TypeTag>,
    ) -> Result<Value, RunError> {
        let value = match sym {
            Symbol::Var { frame, name } => self.frames.get_value(*frame, name)?,
            Symbol::Const(value) => value.clone(),
        };

        if let Some(required) = required {
            if value.type_tag() != Some(required) {
                return Err(RunError::OperandType(format!(
                    "expected {} operand",
                    required.name()
                )));
            }
        }

        match value {
            Value::Str(raw) => Ok(Value::Str(decode_escapes(&raw)?)),
            other => Ok(other),
        }
    }

    pub(crate) fn resolve_int(&self, sym: &Symbol) -> Result<i64, RunError> {
        match self.resolve(sym, Some(TypeTag::Int))? {
            Value::Int(v) => Ok(v),
            _ => Err(RunError::Internal("int resolution produced a non-int".into())),
        }
    }

    pub(crate) fn resolve_bool(&self, sym: &Symbol) -> Result<bool, RunError> {
        match self.resolve(sym, Some(TypeTag::Bool))? {
            Value::Bool(v) => Ok(v),
            _ => Err(RunError::Internal(
                "bool resolution produced a non-bool".into(),
            )),
        }
    }

    pub(crate) fn resolve_str(&self, sym: &Symbol) -> Result<String, RunError> {
        match self.resolve(sym, Some(TypeTag::Str))? {
            Value::Str(v) => Ok(v),
            _ => Err(RunError::Internal(
                "string resolution produced a non-string".into(),
            )),
        }
    }

    /// Resolve a symbol's type without forcing a value-initialization
    /// check. A declared-but-unassigned variable yields `None`.
    pub(crate) fn symbol_type(&self, sym: &Symbol) -> Result<Option<TypeTag>, RunError> {
        match sym {
            Symbol::Var { frame, name } => self.frames.get_type(*frame, name),
            Symbol::Const(value) => Ok(value.type_tag()),
        }
    }

    // ---- Comparison ----

    /// Compare two symbols.
    ///
    /// Types resolve first. When either side is nil, only equality tests
    /// are legal and the result is type equality; values are never read.
    /// Otherwise the second operand's type must match the first's, and
    /// ordering is numeric for int, `false < true` for bool, and
    /// lexicographic for strings.
    pub(crate) fn compare(&self, a: &Symbol, b: &Symbol, op: CmpOp) -> Result<bool, RunError> {
        let type_a = self.symbol_type(a)?;
        let type_b = self.symbol_type(b)?;

        if type_a == Some(TypeTag::Nil) || type_b == Some(TypeTag::Nil) {
            return match op {
                CmpOp::Eq => Ok(type_a == type_b),
                CmpOp::Neq => Ok(type_a != type_b),
                CmpOp::Lt | CmpOp::Gt => Err(RunError::OperandType(
                    "nil supports only equality tests".into(),
                )),
            };
        }

        let lhs = self.resolve(a, None)?;
        let rhs = self.resolve(b, lhs.type_tag())?;

        match op {
            CmpOp::Eq => Ok(lhs == rhs),
            CmpOp::Neq => Ok(lhs != rhs),
            CmpOp::Lt | CmpOp::Gt => {
                let ordering = match (&lhs, &rhs) {
                    (Value::Int(x), Value::Int(y)) => x.cmp(y),
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Str(x), Value::Str(y)) => x.cmp(y),
                    _ => {
                        return Err(RunError::Internal(
                            "comparison operands lost type agreement".into(),
                        ))
                    }
                };
                Ok(if op == CmpOp::Lt {
                    ordering == std::cmp::Ordering::Less
                } else {
                    ordering == std::cmp::Ordering::Greater
                })
            }
        }
    }

    /// The defining order of a label, or a semantic error for an
    /// undefined target.
    pub(crate) fn label_target(&self, name: &str) -> Result<u32, RunError> {
        self.program
            .label_target(name)
            .ok_or_else(|| RunError::Semantic(format!("label '{name}' is not defined")))
    }
}
