//! Instruction operands: frame selectors and symbols.
//!
//! A symbol is either a variable reference (`GF@x`, `TF@x`, `LF@x`) or a
//! typed literal. Label and type arguments are not symbols; the engine
//! reads those argument kinds directly.

use crate::error::RunError;
use crate::source::SourceArg;
use crate::value::Value;

/// Selects one of the three variable frames.
///
/// `Local` always means the top of the local-frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSelector {
    /// The global frame. Exists for the whole run.
    Global,
    /// The temporary frame. May be undefined.
    Temporary,
    /// The top of the local-frame stack.
    Local,
}

impl FrameSelector {
    /// Returns the source-level frame prefix.
    pub fn name(&self) -> &'static str {
        match self {
            FrameSelector::Global => "GF",
            FrameSelector::Temporary => "TF",
            FrameSelector::Local => "LF",
        }
    }

    /// Looks up a selector by its source-level prefix.
    pub fn from_prefix(prefix: &str) -> Option<FrameSelector> {
        match prefix {
            "GF" => Some(FrameSelector::Global),
            "TF" => Some(FrameSelector::Temporary),
            "LF" => Some(FrameSelector::Local),
            _ => None,
        }
    }
}

/// A resolved instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A variable reference.
    Var {
        /// The frame holding the variable.
        frame: FrameSelector,
        /// The variable name within that frame.
        name: String,
    },
    /// A literal constant. String literals keep their raw escape text;
    /// decoding happens at resolution time.
    Const(Value),
}

impl Symbol {
    /// Parses an argument node into a symbol.
    ///
    /// Fails with an invalid-source-structure error for malformed variable
    /// references, malformed integer literals, and argument kinds that are
    /// not symbols (`label`, `type`, anything unknown).
    pub fn from_arg(arg: &SourceArg) -> Result<Symbol, RunError> {
        match arg.kind.as_str() {
            "var" => {
                let (prefix, name) = arg.value.split_once('@').ok_or_else(|| {
                    RunError::InvalidSourceStructure(format!(
                        "malformed variable reference '{}'",
                        arg.value
                    ))
                })?;
                let frame = FrameSelector::from_prefix(prefix).ok_or_else(|| {
                    RunError::InvalidSourceStructure(format!("unknown frame prefix '{prefix}'"))
                })?;
                Ok(Symbol::Var {
                    frame,
                    name: name.to_string(),
                })
            }
            "int" => {
                let value: i64 = arg.value.parse().map_err(|_| {
                    RunError::InvalidSourceStructure(format!(
                        "malformed integer literal '{}'",
                        arg.value
                    ))
                })?;
                Ok(Symbol::Const(Value::Int(value)))
            }
            "bool" => Ok(Symbol::Const(Value::Bool(arg.value == "true"))),
            "string" => Ok(Symbol::Const(Value::Str(arg.value.clone()))),
            "nil" => Ok(Symbol::Const(Value::Nil)),
            other => Err(RunError::InvalidSourceStructure(format!(
                "expected a symbol argument, found kind '{other}'"
            ))),
        }
    }
}
