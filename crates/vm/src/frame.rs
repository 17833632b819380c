//! Variable frames and the frame set.
//!
//! A frame is one namespace of declared variables. The frame set owns the
//! global frame, the optional temporary frame, and the local-frame stack,
//! and is the only path through which frame identity ever changes.

use std::collections::HashMap;

use rill_common::strings::decode_escapes;
use rill_common::{FrameSelector, RunError, Symbol, TypeTag, Value};

/// A single namespace mapping variable names to their current values.
///
/// A declared-but-unassigned variable holds [`Value::Uninit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    vars: HashMap<String, Value>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a variable is declared in this frame.
    pub fn exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Declare a new variable with no type and no value.
    ///
    /// Redeclaring a name that is live in this frame is a semantic error.
    pub fn declare(&mut self, name: &str) -> Result<(), RunError> {
        if self.exists(name) {
            return Err(RunError::Semantic(format!(
                "variable '{name}' is already declared in this frame"
            )));
        }
        self.vars.insert(name.to_string(), Value::Uninit);
        Ok(())
    }

    /// Store a value, creating the slot if it does not exist yet.
    ///
    /// No redeclaration check here; that belongs to [`Frame::declare`].
    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// The declared type of a variable, or `None` before first assignment.
    pub fn get_type(&self, name: &str) -> Result<Option<TypeTag>, RunError> {
        match self.vars.get(name) {
            Some(value) => Ok(value.type_tag()),
            None => Err(RunError::VariableAccess(format!(
                "variable '{name}' is not declared"
            ))),
        }
    }

    /// The current value of a variable.
    ///
    /// Reading an uninitialized variable is a missing-value error.
    pub fn get_value(&self, name: &str) -> Result<Value, RunError> {
        match self.vars.get(name) {
            Some(Value::Uninit) => Err(RunError::Value(format!(
                "variable '{name}' exists but is not initialized"
            ))),
            Some(value) => Ok(value.clone()),
            None => Err(RunError::VariableAccess(format!(
                "variable '{name}' is not declared"
            ))),
        }
    }
}

/// The global frame, the optional temporary frame, and the local-frame
/// stack.
///
/// An absent temporary frame is distinct from a present-but-empty one:
/// resolving a selector through an absent frame is a frame-access error,
/// not a missing-variable error.
#[derive(Debug, Default)]
pub struct FrameSet {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameSet {
    /// Create a frame set holding only an empty global frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the temporary frame with a new empty frame, discarding any
    /// previous one unconditionally.
    pub fn create_temporary(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// Move the temporary frame onto the local-frame stack and clear the
    /// temporary slot.
    pub fn push_temporary(&mut self) -> Result<(), RunError> {
        let frame = self.temporary.take().ok_or_else(|| {
            RunError::FrameAccess("temporary frame is not defined, cannot push".into())
        })?;
        self.locals.push(frame);
        Ok(())
    }

    /// Move the top local frame into the temporary slot, overwriting it.
    pub fn pop_local(&mut self) -> Result<(), RunError> {
        let frame = self.locals.pop().ok_or_else(|| {
            RunError::FrameAccess("local frame stack is empty, cannot pop".into())
        })?;
        self.temporary = Some(frame);
        Ok(())
    }

    /// Depth of the local-frame stack.
    pub fn local_depth(&self) -> usize {
        self.locals.len()
    }

    fn frame(&self, selector: FrameSelector) -> Result<&Frame, RunError> {
        match selector {
            FrameSelector::Global => Ok(&self.global),
            FrameSelector::Temporary => self.temporary.as_ref().ok_or_else(|| {
                RunError::FrameAccess("temporary frame is not defined".into())
            }),
            FrameSelector::Local => self.locals.last().ok_or_else(|| {
                RunError::FrameAccess("local frame stack is empty".into())
            }),
        }
    }

    fn frame_mut(&mut self, selector: FrameSelector) -> Result<&mut Frame, RunError> {
        match selector {
            FrameSelector::Global => Ok(&mut self.global),
            FrameSelector::Temporary => self.temporary.as_mut().ok_or_else(|| {
                RunError::FrameAccess("temporary frame is not defined".into())
            }),
            FrameSelector::Local => self.locals.last_mut().ok_or_else(|| {
                RunError::FrameAccess("local frame stack is empty".into())
            }),
        }
    }

    /// Returns true if the variable is declared in the selected frame.
    pub fn exists(&self, selector: FrameSelector, name: &str) -> Result<bool, RunError> {
        Ok(self.frame(selector)?.exists(name))
    }

    /// Declare a new variable in the selected frame.
    pub fn declare(&mut self, selector: FrameSelector, name: &str) -> Result<(), RunError> {
        self.frame_mut(selector)?.declare(name)
    }

    /// The declared type of a variable in the selected frame.
    pub fn get_type(
        &self,
        selector: FrameSelector,
        name: &str,
    ) -> Result<Option<TypeTag>, RunError> {
        self.frame(selector)?.get_type(name)
    }

    /// The current value of a variable in the selected frame.
    pub fn get_value(&self, selector: FrameSelector, name: &str) -> Result<Value, RunError> {
        self.frame(selector)?.get_value(name)
    }

    /// Store a computed value into a declared variable.
    ///
    /// Assignment never implicitly declares: an undeclared destination is a
    /// variable-access error.
    pub fn assign_value(
        &mut self,
        selector: FrameSelector,
        name: &str,
        value: Value,
    ) -> Result<(), RunError> {
        if !self.exists(selector, name)? {
            return Err(RunError::VariableAccess(format!(
                "variable '{name}' is not declared"
            )));
        }
        self.frame_mut(selector)?.set(name, value);
        Ok(())
    }

    /// Store a symbol's value into a declared variable.
    ///
    /// The destination's existence is checked before the source is touched.
    /// A string literal source is escape-decoded on the way in; a variable
    /// source is read through [`FrameSet::get_value`], so an uninitialized
    /// source is a missing-value error.
    pub fn assign_from_symbol(
        &mut self,
        selector: FrameSelector,
        name: &str,
        src: &Symbol,
    ) -> Result<(), RunError> {
        if !self.exists(selector, name)? {
            return Err(RunError::VariableAccess(format!(
                "variable '{name}' is not declared"
            )));
        }

        let value = match src {
            Symbol::Var {
                frame: src_frame,
                name: src_name,
            } => self.get_value(*src_frame, src_name)?,
            Symbol::Const(Value::Str(raw)) => Value::Str(decode_escapes(raw)?),
            Symbol::Const(value) => value.clone(),
        };

        self.frame_mut(selector)?.set(name, value);
        Ok(())
    }
}
