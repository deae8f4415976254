//! Runtime module for the Plotscript language
//!
//! The environment (symbol table) and the evaluator that walks expression
//! trees against it.

pub mod environment;
pub mod eval;
pub mod special_forms;

pub use environment::{EnvEntry, Environment};
pub use eval::{evaluate, evaluate_with_config, Callable, EvaluationContext};

/// Default bound on nested evaluations.
pub const DEFAULT_MAX_DEPTH: usize = 1_000;

/// Engine settings that are not part of the language itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of evaluations (tree depth plus lambda calls).
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
