//! Plotscript: a small Lisp-like language over real and complex numbers,
//! lists and lambdas, whose plot forms compile data into annotated geometric
//! primitives for a renderer.

pub use crate::ast::{Atom, Expression};
pub use crate::errors::{ErrorKind, PlotscriptError};
pub use crate::interpreter::Interpreter;
pub use crate::runtime::{evaluate, EngineConfig, Environment};
pub use crate::session::{Output, Session};

pub mod ast;
pub mod atoms;
pub mod cli;
pub mod errors;
pub mod interpreter;
pub mod plot;
pub mod repl;
pub mod runtime;
pub mod session;
pub mod syntax;
