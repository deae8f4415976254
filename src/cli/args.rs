//! Defines the command-line arguments and subcommands for the Plotscript CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "plotscript",
    version,
    about = "Evaluate Plotscript programs: complex arithmetic, lists, lambdas and plots."
)]
pub struct PlotscriptArgs {
    /// Script evaluated before anything else; its definitions are the session baseline.
    #[arg(long, global = true, value_name = "FILE")]
    pub startup: Option<PathBuf>,

    /// Print results as JSON instead of the textual form.
    #[arg(long, global = true)]
    pub json: bool,

    /// With no subcommand, start the interactive REPL.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Evaluate a program file and print its result.
    Run {
        /// The path to the Plotscript program.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Evaluate a program given on the command line.
    #[command(visible_alias = "e")]
    Eval {
        /// The program text, e.g. "(+ 1 2)".
        #[arg(required = true)]
        expression: String,
    },
    /// Start the interactive read-eval-print loop.
    Repl,
}
