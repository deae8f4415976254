//! The Plotscript Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use crate::cli::args::{Command, PlotscriptArgs};
use crate::errors::print_error;
use crate::interpreter::Interpreter;
use crate::repl::run_repl;
use crate::session::run_with_worker_stack;
use clap::Parser;
use std::process;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = PlotscriptArgs::parse();

    let mut interp = Interpreter::new();
    if let Some(path) = &args.startup {
        // A broken startup file is reported but does not stop the session.
        if let Err(e) = interp.load_startup(path) {
            print_error(e);
        }
    }

    // Dispatch to the appropriate subcommand handler.
    let outcome = match args.command.clone().unwrap_or(Command::Repl) {
        Command::Run { file } => run_with_worker_stack(move || interp.eval_file(&file)),
        Command::Eval { expression } => {
            run_with_worker_stack(move || interp.eval_source(&expression))
        }
        Command::Repl => {
            if let Err(e) = run_repl(interp, args.json) {
                eprintln!("Error: could not start the interpreter kernel: {}", e);
                process::exit(1);
            }
            return;
        }
    };

    match outcome {
        Ok(Ok(value)) => output::print_result(&value, args.json),
        Ok(Err(e)) => {
            print_error(e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
