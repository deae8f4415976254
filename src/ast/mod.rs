//! AST module for the Plotscript language
//!
//! A program and every value it produces share one representation: an
//! [`Expression`] tree with an [`Atom`] head, an ordered tail of child
//! expressions, and an optional property map used to attach rendering
//! metadata (see the `plot` module).

// ============================================================================
// IMPORTS
// ============================================================================

pub mod atom;
pub mod number;

pub use atom::Atom;

use im::HashMap;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Head symbol of the language's only compound literal.
pub const LIST: &str = "list";
/// Head symbol of a lambda value.
pub const LAMBDA: &str = "lambda";

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A head atom, its ordered children and an optional property map.
///
/// Equality is structural over head and tail; properties are not compared.
///
/// # Examples
///
/// ```rust
/// use plotscript::ast::Expression;
/// let point = Expression::list(vec![Expression::number(1.0), Expression::number(2.0)])
///     .with_property("object-name", Expression::string("point"));
/// assert!(point.is_list());
/// assert_eq!(point, Expression::list(vec![Expression::number(1.0), Expression::number(2.0)]));
/// assert_eq!(point.get_property("object-name"), Some(&Expression::string("point")));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expression {
    pub head: Atom,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tail: Vec<Expression>,
    /// Only populated on nodes that carry metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<HashMap<String, Expression>>,
}

impl Expression {
    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    pub fn new(head: Atom, tail: Vec<Expression>) -> Self {
        Self {
            head,
            tail,
            properties: None,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn atom(head: Atom) -> Self {
        Self::new(head, Vec::new())
    }

    pub fn number(value: f64) -> Self {
        Self::atom(Atom::Number(value))
    }

    pub fn complex(value: Complex64) -> Self {
        Self::atom(Atom::Complex(value))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::atom(Atom::symbol(name))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::atom(Atom::string(text))
    }

    pub fn list(items: Vec<Expression>) -> Self {
        Self::new(Atom::symbol(LIST), items)
    }

    /// Builds the data-as-code form of a lambda: `(lambda (list params...) body)`.
    pub fn lambda(params: Vec<String>, body: Expression) -> Self {
        let params = params.into_iter().map(Expression::symbol).collect();
        Self::new(Atom::symbol(LAMBDA), vec![Self::list(params), body])
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    pub fn is_none(&self) -> bool {
        self.head.is_none() && self.tail.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.tail.is_empty()
    }

    pub fn head_symbol(&self) -> Option<&str> {
        self.head.as_symbol()
    }

    pub fn is_list(&self) -> bool {
        self.head_symbol() == Some(LIST)
    }

    pub fn is_lambda(&self) -> bool {
        self.head_symbol() == Some(LAMBDA) && self.tail.len() == 2 && self.tail[0].is_list()
    }

    /// The real value of a numeric leaf.
    pub fn as_number(&self) -> Option<f64> {
        if self.is_leaf() {
            self.head.as_number()
        } else {
            None
        }
    }

    /// The value of a complex leaf.
    pub fn as_complex(&self) -> Option<Complex64> {
        if self.is_leaf() {
            self.head.as_complex()
        } else {
            None
        }
    }

    /// The name of a bare symbol, i.e. a symbol with nothing attached.
    pub fn as_symbol(&self) -> Option<&str> {
        if self.is_leaf() {
            self.head.as_symbol()
        } else {
            None
        }
    }

    /// The contents of a string literal leaf.
    pub fn as_str(&self) -> Option<&str> {
        if self.is_leaf() {
            self.head.as_string()
        } else {
            None
        }
    }

    /// Parameter names and body of a lambda value.
    pub fn lambda_parts(&self) -> Option<(Vec<&str>, &Expression)> {
        if !self.is_lambda() {
            return None;
        }
        let params = self.tail[0]
            .tail
            .iter()
            .map(Expression::as_symbol)
            .collect::<Option<Vec<_>>>()?;
        Some((params, &self.tail[1]))
    }

    /// Short description used in type errors.
    pub fn type_name(&self) -> &'static str {
        if self.is_list() {
            "list"
        } else if self.is_lambda() {
            "lambda"
        } else if self.is_leaf() {
            self.head.type_name()
        } else {
            "expression"
        }
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    pub fn get_property(&self, key: &str) -> Option<&Expression> {
        self.properties.as_ref()?.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Expression) {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Expression) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Expression)> {
        self.properties.iter().flat_map(|p| p.iter())
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.tail == other.tail
    }
}

impl From<Atom> for Expression {
    fn from(atom: Atom) -> Self {
        Self::atom(atom)
    }
}

// ============================================================================
// PRINTING
// ============================================================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "NONE");
        }

        if self.is_lambda() {
            write!(f, "((")?;
            write_atoms(f, &self.tail[0].tail)?;
            return write!(f, ") {})", self.tail[1]);
        }

        if self.is_list() {
            write!(f, "(")?;
            write_joined(f, &self.tail)?;
            return write!(f, ")");
        }

        match (&self.head, self.tail.is_empty()) {
            (Atom::Complex(_), true) => write!(f, "{}", self.head),
            (head, true) => write!(f, "({})", head),
            (head, false) => {
                write!(f, "({} ", head)?;
                write_joined(f, &self.tail)?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_atoms(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item.head)?;
    }
    Ok(())
}
