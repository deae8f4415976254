//! List operations for the Plotscript language.
//!
//! Lists are `list`-headed expressions; every procedure here returns a new
//! list and never mutates its arguments.

use crate::ast::Expression;
use crate::atoms::helpers::{extract_list, extract_non_empty_list, extract_number, require_arity};
use crate::atoms::Procedure;
use crate::errors::{ErrorReporting, RUNTIME};
use crate::runtime::Environment;

/// Builds a list from its arguments.
///
/// Usage: (list <a> ...)
///
/// Example:
///   (list 1 2 3) ; => ((1) (2) (3))
///   (list)       ; => ()
pub const ATOM_LIST: Procedure = |args| Ok(Expression::list(args.to_vec()));

/// First element of a non-empty list.
///
/// Usage: (first <list>)
pub const ATOM_FIRST: Procedure = |args| {
    require_arity("first", args, 1)?;
    let items = extract_non_empty_list("first", &args[0])?;
    Ok(items[0].clone())
};

/// All but the first element of a non-empty list.
///
/// Usage: (rest <list>)
///
/// Example:
///   (rest (list 1)) ; => ()
pub const ATOM_REST: Procedure = |args| {
    require_arity("rest", args, 1)?;
    let items = extract_non_empty_list("rest", &args[0])?;
    Ok(Expression::list(items[1..].to_vec()))
};

/// Number of elements in a list.
///
/// Usage: (length <list>)
pub const ATOM_LENGTH: Procedure = |args| {
    require_arity("length", args, 1)?;
    let items = extract_list("length", &args[0])?;
    Ok(Expression::number(items.len() as f64))
};

/// Appends to a non-empty list. A list second argument is spread.
///
/// Usage: (append <list> <value>)
///
/// Example:
///   (append (list 1 2) 3)          ; => ((1) (2) (3))
///   (append (list 1) (list 2 3))   ; => ((1) (2) (3))
pub const ATOM_APPEND: Procedure = |args| {
    require_arity("append", args, 2)?;
    let mut items = extract_non_empty_list("append", &args[0])?.to_vec();
    if args[1].is_list() {
        items.extend(args[1].tail.iter().cloned());
    } else {
        items.push(args[1].clone());
    }
    Ok(Expression::list(items))
};

/// Concatenates two lists.
///
/// Usage: (join <list> <list>)
pub const ATOM_JOIN: Procedure = |args| {
    require_arity("join", args, 2)?;
    let mut items = extract_list("join", &args[0])?.to_vec();
    items.extend(extract_list("join", &args[1])?.iter().cloned());
    Ok(Expression::list(items))
};

/// Largest list `range` will build.
pub const MAX_RANGE_LEN: usize = 10_000_000;

/// Evenly spaced numbers from `begin` up to and including the largest value
/// not greater than `end`.
///
/// Usage: (range <begin> <end> <increment>)
///
/// Example:
///   (range 0 5 1) ; => ((0) (1) (2) (3) (4) (5))
pub const ATOM_RANGE: Procedure = |args| {
    require_arity("range", args, 3)?;
    let begin = extract_number("range", &args[0])?;
    let end = extract_number("range", &args[1])?;
    let increment = extract_number("range", &args[2])?;

    if begin >= end {
        return Err(RUNTIME.type_mismatch("range", "begin less than end", "begin >= end"));
    }
    if increment <= 0.0 || !increment.is_finite() {
        return Err(RUNTIME.type_mismatch("range", "a positive increment", &increment.to_string()));
    }

    // Index-based stepping keeps the last sample from drifting past `end`.
    let steps = ((end - begin) / increment + f64::EPSILON.sqrt()).floor();
    if !steps.is_finite() || steps >= MAX_RANGE_LEN as f64 {
        return Err(RUNTIME.type_mismatch(
            "range",
            &format!("fewer than {MAX_RANGE_LEN} elements"),
            &format!("{steps} steps"),
        ));
    }
    let count = steps as usize;
    let items = (0..=count)
        .map(|i| begin + i as f64 * increment)
        .filter(|x| *x <= end + f64::EPSILON * end.abs().max(1.0))
        .map(Expression::number)
        .collect();
    Ok(Expression::list(items))
};

pub fn register_collection_procedures(env: &mut Environment) {
    env.add_procedure("list", ATOM_LIST);
    env.add_procedure("first", ATOM_FIRST);
    env.add_procedure("rest", ATOM_REST);
    env.add_procedure("length", ATOM_LENGTH);
    env.add_procedure("append", ATOM_APPEND);
    env.add_procedure("join", ATOM_JOIN);
    env.add_procedure("range", ATOM_RANGE);
}
