//! End-to-end tests: source text through the reader, the load phase, and
//! the engine.

use std::io::Cursor;

use rill_common::{Program, RunError};
use rill_vm::io::{StreamInput, StreamOutput};

fn run_text(text: &str, input_text: &str) -> (Result<i32, RunError>, String) {
    let records = rill_source::parse_source(text).expect("source should parse");
    let program = Program::load(records).expect("program should load");
    let mut input = StreamInput::new(Cursor::new(input_text.to_string()));
    let mut stdout = StreamOutput::new(Vec::new());
    let mut stderr = StreamOutput::new(Vec::new());
    let result = rill_vm::run(&program, &mut input, &mut stdout, &mut stderr);
    (
        result,
        String::from_utf8(stdout.into_inner()).expect("stdout is utf-8"),
    )
}

#[test]
fn countdown_program() {
    let text = "\
DEFVAR GF@n
MOVE GF@n int@3
LABEL label@loop
WRITE GF@n
SUB GF@n GF@n int@1
JUMPIFNEQ label@loop GF@n int@0
WRITE string@liftoff
";
    let (result, stdout) = run_text(text, "");
    assert_eq!(result, Ok(0));
    assert_eq!(stdout, "321liftoff");
}

#[test]
fn greeting_reads_stdin() {
    let text = "\
DEFVAR GF@name
READ GF@name type@string
WRITE string@hello\\032
WRITE GF@name
";
    let (result, stdout) = run_text(text, "world\n");
    assert_eq!(result, Ok(0));
    assert_eq!(stdout, "hello world");
}

#[test]
fn explicit_orders_drive_execution_order() {
    let text = "\
30: WRITE string@c
10: WRITE string@a
20: WRITE string@b
";
    let (result, stdout) = run_text(text, "");
    assert_eq!(result, Ok(0));
    assert_eq!(stdout, "abc");
}

#[test]
fn call_and_return_through_text_source() {
    let text = "\
10: CALL label@twice
20: EXIT int@0
100: LABEL label@twice
110: WRITE string@x
120: WRITE string@x
130: RETURN
";
    let (result, stdout) = run_text(text, "");
    assert_eq!(result, Ok(0));
    assert_eq!(stdout, "xx");
}

#[test]
fn zero_order_prefix_fails_engine_validation() {
    let records = rill_source::parse_source("0: BREAK\n").unwrap();
    let err = Program::load(records).unwrap_err();
    assert!(matches!(err, RunError::InvalidSourceStructure(_)));
}

#[test]
fn duplicate_order_prefix_fails_engine_validation() {
    let records = rill_source::parse_source("4: BREAK\n4: BREAK\n").unwrap();
    let err = Program::load(records).unwrap_err();
    assert!(matches!(err, RunError::InvalidSourceStructure(_)));
}
