//! # Plotscript Test Helpers
//!
//! Shared helpers for the integration tests: run a program in a fresh
//! interpreter and inspect the result or the failure.
#![allow(dead_code)]

use plotscript::{ErrorKind, Expression, Interpreter, PlotscriptError};

/// Parses and evaluates `program` in a fresh default environment.
pub fn run(program: &str) -> Result<Expression, PlotscriptError> {
    Interpreter::new().eval_source(program)
}

/// Evaluates `program`, panicking with the diagnostic if it fails.
pub fn eval_ok(program: &str) -> Expression {
    match run(program) {
        Ok(result) => result,
        Err(e) => panic!("{program} failed: {e}"),
    }
}

/// Evaluates `program`, which must fail, and returns what went wrong.
pub fn eval_err(program: &str) -> ErrorKind {
    match run(program) {
        Ok(result) => panic!("{program} should fail, got {result}"),
        Err(e) => e.kind,
    }
}

pub fn number(value: f64) -> Expression {
    Expression::number(value)
}

pub fn numbers(values: &[f64]) -> Expression {
    Expression::list(values.iter().copied().map(Expression::number).collect())
}

/// Screen coordinates of a point primitive.
pub fn coords(point: &Expression) -> (f64, f64) {
    match (point.tail[0].as_number(), point.tail[1].as_number()) {
        (Some(x), Some(y)) => (x, y),
        _ => panic!("{point} is not a point"),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
