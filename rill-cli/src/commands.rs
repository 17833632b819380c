//! CLI command implementations and the exit-code mapping.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};

use rill_common::{Program, RunError};
use rill_vm::io::{InputSource, StreamInput, StreamOutput};

/// Load a program and execute it against real streams.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires a program file");
        eprintln!("Usage: rill run <program.rill> [--input FILE]");
        return Err(10);
    }

    let path = &args[0];
    let input_path = parse_input_flag(&args[1..])?;
    let program = load_program(path)?;

    let mut input: Box<dyn InputSource> = match input_path {
        Some(p) => {
            let file = File::open(&p).map_err(|e| {
                eprintln!("error: cannot read '{p}': {e}");
                11
            })?;
            Box::new(StreamInput::new(BufReader::new(file)))
        }
        None => Box::new(StreamInput::new(BufReader::new(io::stdin()))),
    };
    let mut stdout = StreamOutput::new(io::stdout());
    let mut stderr = StreamOutput::new(io::stderr());

    match rill_vm::run(&program, &mut *input, &mut stdout, &mut stderr) {
        Ok(0) => Ok(()),
        Ok(code) => Err(code),
        Err(e) => {
            eprintln!("error: {e}");
            Err(exit_code(&e))
        }
    }
}

/// Load a program without executing it.
pub fn check(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: check requires a program file");
        eprintln!("Usage: rill check <program.rill>");
        return Err(10);
    }

    let path = &args[0];
    let program = load_program(path)?;
    println!("OK: {path} ({} instructions)", program.len());
    Ok(())
}

/// Read, parse, and load a program file ('-' reads standard input).
fn load_program(path: &str) -> Result<Program, i32> {
    let text = if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|e| {
            eprintln!("error: cannot read standard input: {e}");
            11
        })?;
        text
    } else {
        fs::read_to_string(path).map_err(|e| {
            eprintln!("error: cannot read '{path}': {e}");
            11
        })?
    };

    let records = rill_source::parse_source(&text).map_err(|e| {
        eprintln!("error: {e}");
        31
    })?;

    Program::load(records).map_err(|e| {
        eprintln!("error: {e}");
        exit_code(&e)
    })
}

fn parse_input_flag(args: &[String]) -> Result<Option<String>, i32> {
    match args {
        [] => Ok(None),
        [flag, value] if flag == "--input" => Ok(Some(value.clone())),
        _ => {
            eprintln!("error: unexpected arguments {args:?}");
            Err(10)
        }
    }
}

/// The host error-code taxonomy: one fixed, distinct status per kind.
fn exit_code(err: &RunError) -> i32 {
    match err {
        RunError::InvalidSourceStructure(_) => 32,
        RunError::Semantic(_) => 52,
        RunError::OperandType(_) => 53,
        RunError::VariableAccess(_) => 54,
        RunError::FrameAccess(_) => 55,
        RunError::Value(_) => 56,
        RunError::OperandValue(_) => 57,
        RunError::StringOperation(_) => 58,
        RunError::Internal(_) => 99,
    }
}
