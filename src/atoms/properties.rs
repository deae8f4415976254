//! Property access on expressions.
//!
//! The evaluator handles `set-property` and `get-property` as special forms
//! (their key must be a string literal in the source). These procedure forms
//! take already-evaluated arguments so the same operations stay reachable
//! through `apply` and `map`.

use crate::ast::Expression;
use crate::atoms::helpers::require_arity;
use crate::atoms::Procedure;
use crate::errors::{ErrorReporting, PlotscriptError, RUNTIME};
use crate::runtime::Environment;

/// Extracts a property key, which must be a string.
pub fn extract_key<'a>(name: &str, arg: &'a Expression) -> Result<&'a str, PlotscriptError> {
    arg.as_str()
        .ok_or_else(|| RUNTIME.type_mismatch(name, "a string property name", arg.type_name()))
}

/// Returns a copy of `target` with `key` set to `value`.
pub fn set_property(target: &Expression, key: &str, value: Expression) -> Expression {
    target.clone().with_property(key, value)
}

/// Reads `key` from `target`, or None when absent.
pub fn get_property(target: &Expression, key: &str) -> Expression {
    target.get_property(key).cloned().unwrap_or_default()
}

/// Usage: (set-property "<key>" <value> <expression>)
///
///   Returns: a copy of <expression> carrying the property
///
/// Example:
///   (set-property "size" 2 (list 0 0))
pub const ATOM_SET_PROPERTY: Procedure = |args| {
    require_arity("set-property", args, 3)?;
    let key = extract_key("set-property", &args[0])?;
    Ok(set_property(&args[2], key, args[1].clone()))
};

/// Usage: (get-property "<key>" <expression>)
///
///   Returns: the property value, or NONE
pub const ATOM_GET_PROPERTY: Procedure = |args| {
    require_arity("get-property", args, 2)?;
    let key = extract_key("get-property", &args[0])?;
    Ok(get_property(&args[1], key))
};

pub fn register_property_procedures(env: &mut Environment) {
    env.add_procedure("set-property", ATOM_SET_PROPERTY);
    env.add_procedure("get-property", ATOM_GET_PROPERTY);
}
