//! # Plotscript Procedure Library
//!
//! Built-in procedures take an ordered sequence of already-evaluated
//! expressions and return one expression, or fail with an argument or type
//! error.
//!
//! ## Module Structure
//!
//! - **`helpers`**: Arity checks, extraction and dual-mode operand handling
//! - **`math`**: Arithmetic, transcendental and complex procedures
//! - **`collections`**: List procedures (`list`, `first`, `range`, ...)
//! - **`properties`**: `set-property` and `get-property`
//!
//! The plot procedures live with the plot compiler in [`crate::plot`].

pub mod collections;
pub mod helpers;
pub mod math;
pub mod properties;

use crate::ast::Expression;
use crate::errors::PlotscriptError;
use crate::runtime::Environment;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A built-in procedure: evaluated arguments in, one expression out.
pub type Procedure = fn(args: &[Expression]) -> Result<Expression, PlotscriptError>;

/// Returned by `Environment::get_procedure` for unknown names; yields None.
pub const ATOM_NONE: Procedure = |_| Ok(Expression::none());

// ============================================================================
// REGISTRATION
// ============================================================================

/// Installs every built-in procedure into `env`.
pub fn register_all_procedures(env: &mut Environment) {
    math::register_math_procedures(env);
    collections::register_collection_procedures(env);
    properties::register_property_procedures(env);
    crate::plot::register_plot_procedures(env);
}
