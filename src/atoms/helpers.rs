//! # Procedure Helper Infrastructure
//!
//! Argument checking and extraction shared by every built-in procedure.

use num_complex::Complex64;

use crate::ast::Expression;
use crate::errors::{ErrorReporting, PlotscriptError, RUNTIME};

// ============================================================================
// ARITY CHECKS
// ============================================================================

/// Validates that exactly `expected` arguments were provided.
pub fn require_arity(name: &str, args: &[Expression], expected: usize) -> Result<(), PlotscriptError> {
    if args.len() != expected {
        return Err(RUNTIME.arity(name, &expected.to_string(), args.len()));
    }
    Ok(())
}

/// Validates that at least `min` arguments were provided.
pub fn require_min_arity(name: &str, args: &[Expression], min: usize) -> Result<(), PlotscriptError> {
    if args.len() < min {
        return Err(RUNTIME.arity(name, &format!("at least {}", min), args.len()));
    }
    Ok(())
}

// ============================================================================
// TYPE EXTRACTION
// ============================================================================

/// Extracts a real number.
pub fn extract_number(name: &str, arg: &Expression) -> Result<f64, PlotscriptError> {
    arg.as_number()
        .ok_or_else(|| RUNTIME.type_mismatch(name, "a number", arg.type_name()))
}

/// Extracts a complex number; real numbers are not promoted.
pub fn extract_complex(name: &str, arg: &Expression) -> Result<Complex64, PlotscriptError> {
    arg.as_complex()
        .ok_or_else(|| RUNTIME.type_mismatch(name, "a complex number", arg.type_name()))
}

/// Extracts the elements of a list.
pub fn extract_list<'a>(name: &str, arg: &'a Expression) -> Result<&'a [Expression], PlotscriptError> {
    if arg.is_list() {
        Ok(&arg.tail)
    } else {
        Err(RUNTIME.type_mismatch(name, "a list", arg.type_name()))
    }
}

/// Extracts the elements of a list that must not be empty.
pub fn extract_non_empty_list<'a>(
    name: &str,
    arg: &'a Expression,
) -> Result<&'a [Expression], PlotscriptError> {
    let items = extract_list(name, arg)?;
    if items.is_empty() {
        return Err(RUNTIME.type_mismatch(name, "a non-empty list", "an empty list"));
    }
    Ok(items)
}

// ============================================================================
// DUAL-MODE NUMERIC OPERANDS
// ============================================================================

/// Operands of a numeric procedure, all real or all complex.
#[derive(Debug, Clone, PartialEq)]
pub enum Operands {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

/// Classifies the operands: if any is complex, every operand is promoted to
/// complex; otherwise all stay real. Non-numeric operands are a type error.
pub fn numeric_operands(name: &str, args: &[Expression]) -> Result<Operands, PlotscriptError> {
    if let Some(reals) = args.iter().map(Expression::as_number).collect::<Option<Vec<_>>>() {
        return Ok(Operands::Real(reals));
    }

    args.iter()
        .map(|arg| promote(arg).ok_or_else(|| RUNTIME.type_mismatch(name, "a number or complex", arg.type_name())))
        .collect::<Result<Vec<_>, _>>()
        .map(Operands::Complex)
}

/// Promotes a numeric leaf to complex.
pub fn promote(arg: &Expression) -> Option<Complex64> {
    arg.as_complex()
        .or_else(|| arg.as_number().map(|n| Complex64::new(n, 0.0)))
}
