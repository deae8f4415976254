use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::number::format_significant;

/// Digits used when printing numbers, matching C's `%g`.
const DISPLAY_PRECISION: usize = 6;

/// An indivisible scalar value.
///
/// # Examples
///
/// ```rust
/// use plotscript::ast::Atom;
/// let n = Atom::Number(3.0);
/// assert_eq!(n.type_name(), "number");
/// assert_eq!(Atom::symbol("pi").as_symbol(), Some("pi"));
/// assert!(Atom::default().is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Atom {
    #[default]
    None,
    Number(f64),
    Complex(Complex64),
    Symbol(String),
    String(String),
}

impl Atom {
    pub fn symbol(name: impl Into<String>) -> Self {
        Atom::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Atom::String(text.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::None => "none",
            Atom::Number(_) => "number",
            Atom::Complex(_) => "complex",
            Atom::Symbol(_) => "symbol",
            Atom::String(_) => "string",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Atom::None)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Atom::Number(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Atom::Complex(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Atom::Symbol(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Atom::String(_))
    }

    /// True for literals that evaluate to themselves.
    pub fn is_literal(&self) -> bool {
        matches!(self, Atom::Number(_) | Atom::Complex(_) | Atom::String(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Atom::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Atom::Complex(z) => Some(*z),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Atom::String(s) => Some(s),
            _ => None,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    !diff.is_nan() && diff <= f64::EPSILON
}

/// Numbers compare within an absolute epsilon so that results such as
/// `(tan (/ pi 4))` equal `1`.
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Atom::None, Atom::None) => true,
            (Atom::Number(a), Atom::Number(b)) => close(*a, *b),
            (Atom::Complex(a), Atom::Complex(b)) => close(a.re, b.re) && close(a.im, b.im),
            (Atom::Symbol(a), Atom::Symbol(b)) => a == b,
            (Atom::String(a), Atom::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::None => write!(f, "NONE"),
            Atom::Number(n) => write!(f, "{}", format_significant(*n, DISPLAY_PRECISION)),
            Atom::Complex(z) => write!(
                f,
                "({},{})",
                format_significant(z.re, DISPLAY_PRECISION),
                format_significant(z.im, DISPLAY_PRECISION)
            ),
            Atom::Symbol(s) => write!(f, "{}", s),
            Atom::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Atom::Number(value)
    }
}

impl From<Complex64> for Atom {
    fn from(value: Complex64) -> Self {
        Atom::Complex(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_within_epsilon() {
        assert_eq!(Atom::Number(1.0), Atom::Number(0.9999999999999999));
        assert_ne!(Atom::Number(1.0), Atom::Number(1.001));
        assert_ne!(Atom::Number(f64::NAN), Atom::Number(f64::NAN));
        assert_eq!(Atom::Number(f64::INFINITY), Atom::Number(f64::INFINITY));
    }

    #[test]
    fn real_and_complex_are_distinct() {
        assert_ne!(Atom::Number(0.0), Atom::Complex(Complex64::new(0.0, 0.0)));
        assert_ne!(Atom::symbol("a"), Atom::string("a"));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Atom::Number(3.5).to_string(), "3.5");
        assert_eq!(Atom::Complex(Complex64::new(0.0, 1.0)).to_string(), "(0,1)");
        assert_eq!(Atom::string("hi").to_string(), "\"hi\"");
        assert_eq!(Atom::None.to_string(), "NONE");
    }
}
