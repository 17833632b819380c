//! Rill CLI — load, check, and run Rill programs.
//!
//! Exit codes:
//! - 0: success, or whatever an EXIT instruction specified
//! - 10: bad command-line usage
//! - 11: unreadable program or input file
//! - 31: malformed source document
//! - 32-58: load/runtime errors, one code per error kind
//! - 99: internal error

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(10);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(10);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: rill <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <program.rill> [--input FILE]   Load and execute a program");
    eprintln!("  check <program.rill>                Load a program without running it");
    eprintln!();
    eprintln!("Use '-' as the program path to read from standard input.");
}
