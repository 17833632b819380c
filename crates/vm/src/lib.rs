//! Rill execution engine — runs loaded instruction streams.
//!
//! The engine is a frame-based machine with:
//! - A frame set (global frame, optional temporary frame, local-frame stack)
//! - A data stack for the stack-oriented instructions
//! - A call stack of saved orders for call/return
//!
//! All run state is owned by one [`Machine`] value constructed fresh per
//! run. Execution is strictly synchronous and single-threaded; the only
//! blocking point is the input collaborator.
//!
//! # Usage
//!
//! ```
//! use rill_common::{Program, SourceArg, SourceInstruction};
//! use rill_vm::io::{StreamInput, StreamOutput};
//!
//! let records = vec![
//!     SourceInstruction::new("1", "DEFVAR", vec![SourceArg::new("var", "GF@x")]),
//!     SourceInstruction::new("2", "MOVE", vec![
//!         SourceArg::new("var", "GF@x"),
//!         SourceArg::new("int", "42"),
//!     ]),
//!     SourceInstruction::new("3", "WRITE", vec![SourceArg::new("var", "GF@x")]),
//! ];
//! let program = Program::load(records).unwrap();
//!
//! let mut input = StreamInput::new(std::io::empty());
//! let mut stdout = StreamOutput::new(Vec::new());
//! let mut stderr = StreamOutput::new(Vec::new());
//!
//! let code = rill_vm::run(&program, &mut input, &mut stdout, &mut stderr).unwrap();
//! assert_eq!(code, 0);
//! assert_eq!(stdout.into_inner(), b"42");
//! ```

pub mod execute;
pub mod frame;
pub mod io;
pub mod machine;
pub mod stack;

pub use frame::{Frame, FrameSet};
pub use machine::Machine;
pub use stack::{CallStack, DataStack};

use io::{InputSource, OutputSink};
use rill_common::{Program, RunError};

/// Execute a program and return its exit code.
///
/// This is the primary entry point for the engine. The exit code is 0 for
/// ordinary completion or the value an EXIT instruction specified; every
/// error is fatal to the run and surfaces as [`RunError`]. Output written
/// before an error stays written.
pub fn run(
    program: &Program,
    input: &mut dyn InputSource,
    stdout: &mut dyn OutputSink,
    stderr: &mut dyn OutputSink,
) -> Result<i32, RunError> {
    let mut machine = Machine::new(program, input, stdout, stderr);
    machine.execute()
}
