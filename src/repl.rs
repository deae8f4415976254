//! Plotscript REPL (Read-Eval-Print Loop)
//!
//! Programs are handed to a [`Session`] worker, so the environment persists
//! across lines until the kernel is reset or stopped.

use std::io::{self, BufRead, Write};

use crate::{
    cli::output::{print_message_error, print_output},
    interpreter::Interpreter,
    session::{Output, Session, NOT_RUNNING},
};

pub const PROMPT: &str = "plotscript> ";
const CONTINUATION: &str = "    -> ";

/// Main REPL entry point. `baseline` is what `%reset` restores.
pub fn run_repl(baseline: Interpreter, json: bool) -> io::Result<()> {
    println!("Plotscript REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut session = Some(Session::new(baseline)?);
    let mut input_buffer = String::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if input_buffer.is_empty() {
            print!("{}", PROMPT);
        } else {
            print!("{}", CONTINUATION);
        }
        io::stdout().flush()?;

        let line = match lines.next() {
            None => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            Some(Ok(line)) => line,
        };
        let line = line.trim();

        if input_buffer.is_empty() {
            if line.is_empty() {
                continue;
            }
            if line.starts_with(':') || line.starts_with('%') {
                match handle_repl_command(line, &mut session)? {
                    ReplCommand::Continue => continue,
                    ReplCommand::Quit => break,
                }
            }
        }

        if !input_buffer.is_empty() {
            input_buffer.push('\n');
        }
        input_buffer.push_str(line);

        // An empty line forces evaluation of whatever has been typed so far.
        if is_complete_expression(&input_buffer) || line.is_empty() {
            let output = match &mut session {
                Some(s) => s.eval(&input_buffer),
                None => Output::Error(NOT_RUNNING.to_string()),
            };
            print_output(&output, json);
            input_buffer.clear();
        }
    }

    if let Some(session) = session {
        session.exit();
    }
    Ok(())
}

/// REPL command results
enum ReplCommand {
    Continue,
    Quit,
}

/// Handle `:` shell commands and `%` kernel commands.
fn handle_repl_command(command: &str, session: &mut Option<Session>) -> io::Result<ReplCommand> {
    match command.to_ascii_lowercase().as_str() {
        ":help" | ":h" => {
            println!("Plotscript REPL Commands:");
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!("  %start        Start the interpreter kernel if it is stopped");
            println!("  %stop         Stop the kernel, discarding its definitions");
            println!("  %reset        Restart the kernel from the startup state");
            println!("  %exit         Stop the kernel and exit");
            println!();
            println!("Enter Plotscript expressions to evaluate them.");
            println!("Multi-line expressions are supported.");
        }
        ":quit" | ":q" => return Ok(ReplCommand::Quit),
        "%start" => match session {
            Some(s) => s.start()?,
            None => report_not_running(),
        },
        "%stop" => match session {
            Some(s) => s.stop(),
            None => report_not_running(),
        },
        "%reset" => match session {
            Some(s) => s.reset()?,
            None => report_not_running(),
        },
        "%exit" => {
            if let Some(s) = session.take() {
                s.exit();
            }
            return Ok(ReplCommand::Quit);
        }
        _ => print_message_error(&format!(
            "Unknown command: {}. Type :help for available commands.",
            command
        )),
    }
    Ok(ReplCommand::Continue)
}

fn report_not_running() {
    print_message_error(NOT_RUNNING);
}

/// Checks whether parentheses and string quotes are balanced.
pub fn is_complete_expression(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }

    let mut paren_count = 0i32;
    let mut in_string = false;
    let mut escape_next = false;
    let mut in_comment = false;

    for ch in trimmed.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            ';' if !in_string => in_comment = true,
            '(' if !in_string => paren_count += 1,
            ')' if !in_string => paren_count -= 1,
            _ => {}
        }
    }

    paren_count <= 0 && !in_string
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete_expression() {
        assert!(is_complete_expression("(+ 1 2)"));
        assert!(is_complete_expression("(begin (define x 10) (+ x 5))"));
        assert!(is_complete_expression("(list \"a (b\")"));
        assert!(is_complete_expression("(+ 1 2) ; trailing ("));

        assert!(!is_complete_expression("(+ 1"));
        assert!(!is_complete_expression("(begin (define x 10)"));
        assert!(!is_complete_expression("(list \"unclosed"));
        assert!(!is_complete_expression(""));
    }

    #[test]
    fn stopped_kernel_commands_do_not_quit() {
        let mut session = None;
        assert!(matches!(
            handle_repl_command("%stop", &mut session).unwrap(),
            ReplCommand::Continue
        ));
        assert!(matches!(
            handle_repl_command("%exit", &mut session).unwrap(),
            ReplCommand::Quit
        ));
    }
}
