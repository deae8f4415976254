//! # Mathematical Operations
//!
//! Arithmetic, transcendental and complex-decomposition procedures.
//!
//! ## Procedures Provided
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `^`, `sqrt`
//! - **Transcendental**: `ln`, `sin`, `cos`, `tan`
//! - **Complex parts**: `real`, `imag`, `mag`, `arg`, `conj`
//!
//! Every arithmetic procedure is dual-mode: if any operand is complex the whole
//! computation is carried out in complex arithmetic and the result is complex;
//! otherwise it stays real.

use num_complex::Complex64;

use crate::ast::Expression;
use crate::atoms::helpers::{extract_complex, numeric_operands, require_arity, require_min_arity, Operands};
use crate::atoms::Procedure;
use crate::errors::{ErrorReporting, RUNTIME};
use crate::runtime::Environment;

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///   - <a>, <b>, ...: Numbers or complex numbers, at least one
///
///   Returns: Number, or Complex if any operand is complex
///
/// Example:
///   (+ 1 2 3) ; => 6
///   (+ 1 I)   ; => (1,1)
pub const ATOM_ADD: Procedure = |args| {
    require_min_arity("+", args, 1)?;
    Ok(match numeric_operands("+", args)? {
        Operands::Real(ns) => Expression::number(ns.iter().sum()),
        Operands::Complex(zs) => Expression::complex(zs.iter().sum()),
    })
};

/// Negates one number or subtracts two.
///
/// Usage: (- <a>) or (- <a> <b>)
///
/// Example:
///   (- 4)   ; => -4
///   (- 5 2) ; => 3
pub const ATOM_SUB: Procedure = |args| {
    if !(1..=2).contains(&args.len()) {
        return Err(RUNTIME.arity("-", "1 or 2", args.len()));
    }
    match numeric_operands("-", args)? {
        Operands::Real(ns) => match ns.as_slice() {
            [a] => Ok(Expression::number(-a)),
            [a, b] => Ok(Expression::number(a - b)),
            _ => Err(RUNTIME.arity("-", "1 or 2", args.len())),
        },
        Operands::Complex(zs) => match zs.as_slice() {
            [a] => Ok(Expression::complex(-a)),
            [a, b] => Ok(Expression::complex(a - b)),
            _ => Err(RUNTIME.arity("-", "1 or 2", args.len())),
        },
    }
};

/// Multiplies numbers, folding from 1.
///
/// Usage: (* <a> <b> ...)
///
/// Example:
///   (* 2 3 4) ; => 24
///   (*)       ; => 1
pub const ATOM_MUL: Procedure = |args| {
    Ok(match numeric_operands("*", args)? {
        Operands::Real(ns) => Expression::number(ns.iter().product()),
        Operands::Complex(zs) => Expression::complex(zs.iter().product()),
    })
};

/// Divides two numbers, or takes the reciprocal of one.
///
/// Usage: (/ <a> <b>) or (/ <a>)
///
/// The unary complex form returns the conjugate of its operand, so `(/ I)`
/// is `(0,-1)`.
///
/// Example:
///   (/ 1 4) ; => 0.25
///   (/ 4)   ; => 0.25
pub const ATOM_DIV: Procedure = |args| {
    if !(1..=2).contains(&args.len()) {
        return Err(RUNTIME.arity("/", "1 or 2", args.len()));
    }
    match numeric_operands("/", args)? {
        Operands::Real(ns) => match ns.as_slice() {
            [a] => Ok(Expression::number(1.0 / a)),
            [a, b] => Ok(Expression::number(a / b)),
            _ => Err(RUNTIME.arity("/", "1 or 2", args.len())),
        },
        Operands::Complex(zs) => match zs.as_slice() {
            [a] => Ok(Expression::complex(a.conj())),
            [a, b] => Ok(Expression::complex(a / b)),
            _ => Err(RUNTIME.arity("/", "1 or 2", args.len())),
        },
    }
};

/// Square root. Negative reals yield a pure imaginary result.
///
/// Usage: (sqrt <a>)
///
/// Example:
///   (sqrt 4)  ; => 2
///   (sqrt -4) ; => (0,2)
pub const ATOM_SQRT: Procedure = |args| {
    require_arity("sqrt", args, 1)?;
    Ok(match numeric_operands("sqrt", args)? {
        Operands::Real(ns) if ns[0] < 0.0 => Expression::complex(Complex64::new(0.0, (-ns[0]).sqrt())),
        Operands::Real(ns) => Expression::number(ns[0].sqrt()),
        Operands::Complex(zs) => Expression::complex(zs[0].sqrt()),
    })
};

/// Raises a number to a power.
///
/// Usage: (^ <base> <exponent>)
///
/// Example:
///   (^ 2 10) ; => 1024
///   (^ e (* I pi)) ; => (-1,0)
pub const ATOM_POW: Procedure = |args| {
    require_arity("^", args, 2)?;
    Ok(match numeric_operands("^", args)? {
        Operands::Real(ns) => Expression::number(ns[0].powf(ns[1])),
        Operands::Complex(zs) => Expression::complex(zs[0].powc(zs[1])),
    })
};

// ============================================================================
// TRANSCENDENTAL FUNCTIONS
// ============================================================================

/// Applies a unary real/complex function pair.
fn unary(
    name: &str,
    args: &[Expression],
    real: fn(f64) -> f64,
    complex: fn(Complex64) -> Complex64,
) -> Result<Expression, crate::errors::PlotscriptError> {
    require_arity(name, args, 1)?;
    Ok(match numeric_operands(name, args)? {
        Operands::Real(ns) => Expression::number(real(ns[0])),
        Operands::Complex(zs) => Expression::complex(complex(zs[0])),
    })
}

/// Natural logarithm.
///
/// Usage: (ln <a>)
pub const ATOM_LN: Procedure = |args| unary("ln", args, f64::ln, Complex64::ln);

/// Sine, in radians.
pub const ATOM_SIN: Procedure = |args| unary("sin", args, f64::sin, Complex64::sin);

/// Cosine, in radians.
pub const ATOM_COS: Procedure = |args| unary("cos", args, f64::cos, Complex64::cos);

/// Tangent, in radians.
pub const ATOM_TAN: Procedure = |args| unary("tan", args, f64::tan, Complex64::tan);

// ============================================================================
// COMPLEX DECOMPOSITION
// ============================================================================

/// Real part of a complex number.
///
/// Usage: (real <z>)
///
/// Example:
///   (real (+ 3 (* 4 I))) ; => 3
pub const ATOM_REAL: Procedure = |args| {
    require_arity("real", args, 1)?;
    Ok(Expression::number(extract_complex("real", &args[0])?.re))
};

/// Imaginary part of a complex number.
pub const ATOM_IMAG: Procedure = |args| {
    require_arity("imag", args, 1)?;
    Ok(Expression::number(extract_complex("imag", &args[0])?.im))
};

/// Magnitude of a complex number.
pub const ATOM_MAG: Procedure = |args| {
    require_arity("mag", args, 1)?;
    Ok(Expression::number(extract_complex("mag", &args[0])?.norm()))
};

/// Phase angle of a complex number, in radians.
pub const ATOM_ARG: Procedure = |args| {
    require_arity("arg", args, 1)?;
    Ok(Expression::number(extract_complex("arg", &args[0])?.arg()))
};

/// Complex conjugate.
pub const ATOM_CONJ: Procedure = |args| {
    require_arity("conj", args, 1)?;
    Ok(Expression::complex(extract_complex("conj", &args[0])?.conj()))
};

// ============================================================================
// REGISTRATION
// ============================================================================

pub fn register_math_procedures(env: &mut Environment) {
    env.add_procedure("+", ATOM_ADD);
    env.add_procedure("-", ATOM_SUB);
    env.add_procedure("*", ATOM_MUL);
    env.add_procedure("/", ATOM_DIV);
    env.add_procedure("sqrt", ATOM_SQRT);
    env.add_procedure("^", ATOM_POW);
    env.add_procedure("ln", ATOM_LN);
    env.add_procedure("sin", ATOM_SIN);
    env.add_procedure("cos", ATOM_COS);
    env.add_procedure("tan", ATOM_TAN);
    env.add_procedure("real", ATOM_REAL);
    env.add_procedure("imag", ATOM_IMAG);
    env.add_procedure("mag", ATOM_MAG);
    env.add_procedure("arg", ATOM_ARG);
    env.add_procedure("conj", ATOM_CONJ);
}
