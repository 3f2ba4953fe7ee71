//! CLI entry point for the `bytevm` binary.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use runner::loader;
use vm_core::{run_to_completion, Machine, StdoutSink, StepOutcome};

#[cfg(test)]
use tempfile as _;

/// Exit code when execution faults on an unknown opcode.
const EXIT_FAULT: i32 = 1;
/// Exit code when the program could not be loaded.
const EXIT_LOAD_FAILURE: i32 = 2;

const USAGE_TEXT: &str = "\
Usage: bytevm <program>

Runs a byte-machine program: one base-2 instruction byte per line,
`#` starts a comment, blank lines are ignored.

Options:
  -h, --help  Show this help message

Exit codes:
  0  program halted cleanly
  1  execution faulted on an unknown opcode
  2  program could not be loaded
";

#[derive(Debug, PartialEq, Eq)]
enum ParsedArgs {
    Run(PathBuf),
    Help,
}

fn parse_args(args: impl Iterator<Item = OsString>) -> Result<ParsedArgs, String> {
    let mut program: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Ok(ParsedArgs::Help);
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParsedArgs::Run(program))
}

fn run(path: &Path) -> Result<(), i32> {
    let image = match loader::load_program(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(EXIT_LOAD_FAILURE);
        }
    };

    let mut machine = Machine::new();
    if let Err(e) = machine.load_image(&image) {
        eprintln!("error: {e}");
        return Err(EXIT_LOAD_FAILURE);
    }

    let mut output = StdoutSink;
    let outcome = run_to_completion(&mut machine, &mut output);

    match outcome.final_step {
        StepOutcome::Faulted(cause) => {
            eprintln!("error: {cause}");
            Err(EXIT_FAULT)
        }
        StepOutcome::Halted | StepOutcome::Retired => Ok(()),
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParsedArgs::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParsedArgs::Run(path)) => match run(&path) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            EXIT_LOAD_FAILURE
        }
    };

    std::process::exit(exit_code);
}
