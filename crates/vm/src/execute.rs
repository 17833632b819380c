//! Main execution loop and opcode dispatch.

use rill_common::strings::{char_from_codepoint, codepoint_at, codepoint_len};
use rill_common::{Instruction, Opcode, Program, RunError, Symbol, TypeTag, Value};

use crate::io::OutputSink;
use crate::machine::{CmpOp, Machine};

/// Writes a resolved value through the given sink with per-type dispatch.
/// Nil is written as the empty string.
fn write_value(out: &mut dyn OutputSink, value: &Value) -> Result<(), RunError> {
    let result = match value {
        Value::Int(v) => out.write_int(*v),
        Value::Bool(v) => out.write_bool(*v),
        Value::Str(s) => out.write_str(s),
        Value::Nil => out.write_str(""),
        // Resolution never yields Uninit; reaching this arm means the
        // engine broke its own contract.
        Value::Uninit => {
            return Err(RunError::Internal(
                "attempted to write an uninitialized value".into(),
            ))
        }
    };
    result.map_err(|e| RunError::Internal(format!("output sink failure: {e}")))
}

impl<'a> Machine<'a> {
    /// Execute the program until it runs off the end, an EXIT instruction
    /// fires, or an error is raised.
    ///
    /// Returns the process exit code: 0 for ordinary completion, or the
    /// code an EXIT instruction specified.
    pub fn execute(&mut self) -> Result<i32, RunError> {
        let program: &'a Program = self.program;
        let Some(last) = program.max_order() else {
            return Ok(0);
        };

        self.pc = 0;
        while self.pc <= last {
            // Gaps in the order sequence are skipped silently.
            if let Some(instr) = program.get(self.pc) {
                if let Some(code) = self.step(instr)? {
                    return Ok(code);
                }
            }
            // Unconditional, even after a jump: execution must land one
            // past the label/call order the handler installed.
            self.pc += 1;
        }

        Ok(0)
    }

    /// Execute one instruction. Returns `Some(code)` for EXIT.
    fn step(&mut self, instr: &Instruction) -> Result<Option<i32>, RunError> {
        let expected = instr.opcode.arity();
        if instr.args.len() != expected {
            return Err(RunError::InvalidSourceStructure(format!(
                "{} expects {} argument(s), found {}",
                instr.opcode.mnemonic(),
                expected,
                instr.args.len()
            )));
        }

        match instr.opcode {
            Opcode::Move => self.exec_move(instr)?,
            Opcode::CreateFrame => self.frames.create_temporary(),
            Opcode::PushFrame => self.frames.push_temporary()?,
            Opcode::PopFrame => self.frames.pop_local()?,
            Opcode::DefVar => self.exec_defvar(instr)?,

            Opcode::Call => self.exec_call(instr)?,
            Opcode::Return => self.pc = self.calls.pop()?,

            Opcode::Pushs => self.exec_pushs(instr)?,
            Opcode::Pops => self.exec_pops(instr)?,

            Opcode::Add => self.exec_arith(instr, i64::wrapping_add)?,
            Opcode::Sub => self.exec_arith(instr, i64::wrapping_sub)?,
            Opcode::Mul => self.exec_arith(instr, i64::wrapping_mul)?,
            Opcode::Idiv => self.exec_idiv(instr)?,

            Opcode::Lt => self.exec_relational(instr, CmpOp::Lt)?,
            Opcode::Gt => self.exec_relational(instr, CmpOp::Gt)?,
            Opcode::Eq => self.exec_relational(instr, CmpOp::Eq)?,

            Opcode::And => self.exec_bool_binary(instr, |a, b| a && b)?,
            Opcode::Or => self.exec_bool_binary(instr, |a, b| a || b)?,
            Opcode::Not => self.exec_not(instr)?,

            Opcode::Int2Char => self.exec_int2char(instr)?,
            Opcode::Stri2Int => self.exec_stri2int(instr)?,

            Opcode::Read => self.exec_read(instr)?,
            Opcode::Write => self.exec_write(instr, false)?,

            Opcode::Concat => self.exec_concat(instr)?,
            Opcode::StrLen => self.exec_strlen(instr)?,
            Opcode::GetChar => self.exec_getchar(instr)?,
            Opcode::SetChar => self.exec_setchar(instr)?,

            Opcode::Type => self.exec_type(instr)?,

            // Labels are fully handled during the load phase.
            Opcode::Label => {}
            Opcode::Jump => self.pc = self.label_target(self.label(instr, 0)?)?,
            Opcode::JumpIfEq => self.exec_jump_if(instr, CmpOp::Eq)?,
            Opcode::JumpIfNeq => self.exec_jump_if(instr, CmpOp::Neq)?,
            Opcode::Exit => return self.exec_exit(instr).map(Some),

            Opcode::Dprint => self.exec_write(instr, true)?,
            Opcode::Break => self.exec_break()?,
        }

        Ok(None)
    }

    // ---- Data movement & declaration ----

    fn exec_move(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let src = self.symbol(instr, 1)?;
        self.frames.assign_from_symbol(frame, &name, &src)?;

        // Re-read the destination: a defined value must now be present.
        self.frames.get_value(frame, &name)?;
        Ok(())
    }

    fn exec_defvar(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        self.frames.declare(frame, &name)
    }

    // ---- Call & return ----

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let target = self.label_target(self.label(instr, 0)?)?;
        // The post-increment in the main loop resumes one past this order.
        self.calls.push(self.pc);
        self.pc = target;
        Ok(())
    }

    // ---- Data stack ----

    fn exec_pushs(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let sym = self.symbol(instr, 0)?;
        let value = self.resolve(&sym, None)?;
        self.stack.push(value);
        Ok(())
    }

    fn exec_pops(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let value = self.stack.pop()?;
        self.frames.assign_value(frame, &name, value)
    }

    // ---- Arithmetic ----

    fn exec_arith(
        &mut self,
        instr: &Instruction,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let lhs = self.resolve_int(&self.symbol(instr, 1)?)?;
        let rhs = self.resolve_int(&self.symbol(instr, 2)?)?;
        self.frames
            .assign_value(frame, &name, Value::Int(op(lhs, rhs)))
    }

    fn exec_idiv(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let lhs = self.resolve_int(&self.symbol(instr, 1)?)?;
        let rhs = self.resolve_int(&self.symbol(instr, 2)?)?;
        if rhs == 0 {
            return Err(RunError::OperandValue("division by zero".into()));
        }
        // Truncates toward zero; wrapping guards i64::MIN / -1.
        self.frames
            .assign_value(frame, &name, Value::Int(lhs.wrapping_div(rhs)))
    }

    // ---- Relational & boolean ----

    fn exec_relational(&mut self, instr: &Instruction, op: CmpOp) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let a = self.symbol(instr, 1)?;
        let b = self.symbol(instr, 2)?;
        let result = self.compare(&a, &b, op)?;
        self.frames.assign_value(frame, &name, Value::Bool(result))
    }

    fn exec_bool_binary(
        &mut self,
        instr: &Instruction,
        op: fn(bool, bool) -> bool,
    ) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let lhs = self.resolve_bool(&self.symbol(instr, 1)?)?;
        let rhs = self.resolve_bool(&self.symbol(instr, 2)?)?;
        self.frames
            .assign_value(frame, &name, Value::Bool(op(lhs, rhs)))
    }

    fn exec_not(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let operand = self.resolve_bool(&self.symbol(instr, 1)?)?;
        self.frames.assign_value(frame, &name, Value::Bool(!operand))
    }

    // ---- Conversion ----

    fn exec_int2char(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let code = self.resolve_int(&self.symbol(instr, 1)?)?;
        let ch = char_from_codepoint(code)?;
        self.frames
            .assign_value(frame, &name, Value::Str(ch.to_string()))
    }

    fn exec_stri2int(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let string = self.resolve_str(&self.symbol(instr, 1)?)?;
        let index = self.resolve_int(&self.symbol(instr, 2)?)?;

        let ch = checked_index(&string, index)?;
        self.frames
            .assign_value(frame, &name, Value::Int(ch as u32 as i64))
    }

    // ---- Input & output ----

    fn exec_read(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let tag = self.type_name(instr, 1)?;

        let io_internal = |e: std::io::Error| RunError::Internal(format!("input failure: {e}"));
        let value = match tag {
            TypeTag::Int => self.input.read_int().map_err(io_internal)?.map(Value::Int),
            TypeTag::Str => self.input.read_str().map_err(io_internal)?.map(Value::Str),
            TypeTag::Bool => self.input.read_bool().map_err(io_internal)?.map(Value::Bool),
            // There is no nil reader; reading nil always stores nil.
            TypeTag::Nil => None,
        };

        // Absent input stores nil instead of failing.
        self.frames
            .assign_value(frame, &name, value.unwrap_or(Value::Nil))
    }

    fn exec_write(&mut self, instr: &Instruction, diagnostic: bool) -> Result<(), RunError> {
        let sym = self.symbol(instr, 0)?;
        let value = self.resolve(&sym, None)?;
        let out = if diagnostic {
            &mut *self.stderr
        } else {
            &mut *self.stdout
        };
        write_value(out, &value)
    }

    // ---- Strings ----

    fn exec_concat(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let mut lhs = self.resolve_str(&self.symbol(instr, 1)?)?;
        let rhs = self.resolve_str(&self.symbol(instr, 2)?)?;
        lhs.push_str(&rhs);
        self.frames.assign_value(frame, &name, Value::Str(lhs))
    }

    fn exec_strlen(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let string = self.resolve_str(&self.symbol(instr, 1)?)?;
        self.frames
            .assign_value(frame, &name, Value::Int(codepoint_len(&string) as i64))
    }

    fn exec_getchar(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let string = self.resolve_str(&self.symbol(instr, 1)?)?;
        let index = self.resolve_int(&self.symbol(instr, 2)?)?;

        let ch = checked_index(&string, index)?;
        self.frames
            .assign_value(frame, &name, Value::Str(ch.to_string()))
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;

        // The destination must already hold a string.
        let current = self.resolve(
            &Symbol::Var {
                frame,
                name: name.clone(),
            },
            Some(TypeTag::Str),
        )?;
        let Value::Str(current) = current else {
            return Err(RunError::Internal(
                "string resolution produced a non-string".into(),
            ));
        };

        let index = self.resolve_int(&self.symbol(instr, 1)?)?;
        let replacement = self.resolve_str(&self.symbol(instr, 2)?)?;

        checked_index(&current, index)?;
        let first = replacement.chars().next().ok_or_else(|| {
            RunError::StringOperation("replacement string is empty".into())
        })?;

        let result: String = current
            .chars()
            .enumerate()
            .map(|(i, c)| if i as i64 == index { first } else { c })
            .collect();
        self.frames.assign_value(frame, &name, Value::Str(result))
    }

    // ---- Typing ----

    fn exec_type(&mut self, instr: &Instruction) -> Result<(), RunError> {
        let (frame, name) = self.variable(instr, 0)?;
        let sym = self.symbol(instr, 1)?;
        // A declared variable with no assigned type yields the empty string.
        let tag = self.symbol_type(&sym)?;
        let text = tag.map(|t| t.name()).unwrap_or("");
        self.frames
            .assign_value(frame, &name, Value::Str(text.to_string()))
    }

    // ---- Control flow ----

    fn exec_jump_if(&mut self, instr: &Instruction, op: CmpOp) -> Result<(), RunError> {
        // The label must exist even when the jump is not taken.
        let target = self.label_target(self.label(instr, 0)?)?;
        let a = self.symbol(instr, 1)?;
        let b = self.symbol(instr, 2)?;
        if self.compare(&a, &b, op)? {
            self.pc = target;
        }
        Ok(())
    }

    fn exec_exit(&mut self, instr: &Instruction) -> Result<i32, RunError> {
        let code = self.resolve_int(&self.symbol(instr, 0)?)?;
        if !(0..=9).contains(&code) {
            return Err(RunError::OperandValue(format!(
                "exit code {code} is outside 0-9"
            )));
        }
        Ok(code as i32)
    }

    // ---- Debugging ----

    fn exec_break(&mut self) -> Result<(), RunError> {
        let top = match self.stack.peek() {
            Some(value) => value.to_string(),
            None => "<empty>".to_string(),
        };
        let message = format!(
            "break at order {}: data stack depth {}, top {}, local frames {}\n",
            self.pc,
            self.stack.len(),
            top,
            self.frames.local_depth()
        );
        self.stderr
            .write_str(&message)
            .map_err(|e| RunError::Internal(format!("output sink failure: {e}")))
    }
}

/// Bounds-checks a codepoint index and returns the character there.
fn checked_index(s: &str, index: i64) -> Result<char, RunError> {
    if index < 0 || index as usize >= codepoint_len(s) {
        return Err(RunError::StringOperation(format!(
            "index {index} is outside the string (length {})",
            codepoint_len(s)
        )));
    }
    codepoint_at(s, index as usize).ok_or_else(|| {
        RunError::Internal("in-bounds codepoint index had no character".into())
    })
}
