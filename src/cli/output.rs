//! Handles all user-facing output for the CLI.
//!
//! Results go to stdout, in colour when the terminal supports it, or as JSON
//! for renderers. Errors go to stderr.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Expression;
use crate::session::Output;

/// Pretty-prints an evaluation result to the console.
pub fn print_result(result: &Expression, json: bool) {
    if json {
        print_json(result);
        return;
    }
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "{}", result);
    let _ = stdout.reset();
}

/// Prints a one-line error message, as produced by a session worker.
pub fn print_message_error(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}

/// Prints whatever a session worker sent back.
pub fn print_output(output: &Output, json: bool) {
    match output {
        Output::Result(result) => print_result(result, json),
        Output::Error(message) => print_message_error(message),
    }
}

fn print_json(result: &Expression) {
    match serde_json::to_string_pretty(result) {
        Ok(text) => println!("{}", text),
        Err(e) => print_message_error(&format!("Error: could not encode result as JSON: {}", e)),
    }
}
