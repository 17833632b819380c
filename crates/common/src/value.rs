//! Runtime value representation for the Rill engine.
//!
//! Values are what live in variable slots and on the data stack during
//! execution.

use std::fmt;

use crate::type_tag::TypeTag;

/// Runtime value representation.
///
/// `Uninit` is distinct from `Nil`: a declared-but-unassigned variable
/// holds `Uninit`, and reading its value (not its type) is an error. `Nil`
/// is an ordinary value a program can move, compare, and push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Sequence of Unicode scalar values.
    Str(String),
    /// The nil value.
    Nil,
    /// A declared variable before any assignment.
    Uninit,
}

impl Value {
    /// Returns the type tag of this value, or `None` for `Uninit`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Int(_) => Some(TypeTag::Int),
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Str(_) => Some(TypeTag::Str),
            Value::Nil => Some(TypeTag::Nil),
            Value::Uninit => None,
        }
    }
}

/// Source-level rendering: integers in decimal, booleans as `true`/`false`,
/// nil as `nil`, uninitialized as the empty string. Used by diagnostics.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(true) => write!(f, "true"),
            Value::Bool(false) => write!(f, "false"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Nil => write!(f, "nil"),
            Value::Uninit => Ok(()),
        }
    }
}
