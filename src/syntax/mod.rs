//! Syntax module for the Plotscript language
//!
//! Turns program text into the [`Expression`](crate::ast::Expression) trees
//! consumed by the evaluator.

pub mod parser;

pub use parser::parse;
