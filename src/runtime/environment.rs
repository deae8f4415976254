//! The symbol table: names mapped to bound expressions or built-in procedures.
//!
//! Entries live in a persistent `im::HashMap`, so the copy taken for every
//! lambda application shares structure with the calling environment.

use im::HashMap;
use num_complex::Complex64;
use once_cell::sync::Lazy;

use crate::ast::Expression;
use crate::atoms::{register_all_procedures, Procedure, ATOM_NONE};
use crate::errors::{ErrorReporting, PlotscriptError, RUNTIME};

/// Heads whose evaluation rule is built into the evaluator.
pub const SPECIAL_FORMS: [&str; 9] = [
    "define",
    "begin",
    "lambda",
    "apply",
    "map",
    "set-property",
    "get-property",
    "discrete-plot",
    "continuous-plot",
];

/// Constants installed in every default environment.
pub const CONSTANTS: [&str; 3] = ["pi", "e", "I"];

static DEFAULT_ENVIRONMENT: Lazy<Environment> = Lazy::new(Environment::build_default);

/// What a name denotes. A name denotes at most one entry at a time.
#[derive(Clone)]
pub enum EnvEntry {
    Binding(Expression),
    Procedure(Procedure),
}

#[derive(Clone)]
pub struct Environment {
    entries: HashMap<String, EnvEntry>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("Environment").field("names", &names).finish()
    }
}

impl Environment {
    /// A fresh default environment: constants plus every built-in procedure.
    pub fn new() -> Self {
        DEFAULT_ENVIRONMENT.clone()
    }

    /// An environment with no entries at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn build_default() -> Self {
        let mut env = Self::empty();
        env.insert_binding("pi", Expression::number(std::f64::consts::PI));
        env.insert_binding("e", Expression::number(std::f64::consts::E));
        env.insert_binding("I", Expression::complex(Complex64::new(0.0, 1.0)));
        register_all_procedures(&mut env);
        env
    }

    /// Clears every entry and reinstalls the default set.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_binding(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(EnvEntry::Binding(_)))
    }

    pub fn is_procedure(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(EnvEntry::Procedure(_)))
    }

    /// The bound expression, if any.
    pub fn lookup(&self, name: &str) -> Option<&Expression> {
        match self.entries.get(name) {
            Some(EnvEntry::Binding(expr)) => Some(expr),
            _ => None,
        }
    }

    /// The bound expression, or the None expression when absent.
    pub fn get_binding(&self, name: &str) -> Expression {
        self.lookup(name).cloned().unwrap_or_default()
    }

    /// The procedure named `name`, or a procedure returning None when absent.
    pub fn get_procedure(&self, name: &str) -> Procedure {
        match self.entries.get(name) {
            Some(EnvEntry::Procedure(procedure)) => *procedure,
            _ => ATOM_NONE,
        }
    }

    /// True for names that `define` and lambda parameters may not take.
    pub fn is_reserved(&self, name: &str) -> bool {
        SPECIAL_FORMS.contains(&name) || CONSTANTS.contains(&name) || self.is_procedure(name)
    }

    /// Fails with a redefinition error if `name` cannot be bound.
    pub fn check_bindable(&self, name: &str) -> Result<(), PlotscriptError> {
        if self.is_reserved(name) {
            return Err(RUNTIME.redefinition(name));
        }
        Ok(())
    }

    /// Binds `name`, replacing an earlier user binding of the same name.
    pub fn add_binding(&mut self, name: &str, value: Expression) -> Result<(), PlotscriptError> {
        self.check_bindable(name)?;
        self.insert_binding(name, value);
        Ok(())
    }

    /// Installs a built-in procedure, replacing whatever `name` denoted.
    pub fn add_procedure(&mut self, name: &str, procedure: Procedure) {
        self.entries
            .insert(name.to_string(), EnvEntry::Procedure(procedure));
    }

    /// Names of every built-in procedure, sorted.
    pub fn procedure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, EnvEntry::Procedure(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn insert_binding(&mut self, name: &str, value: Expression) {
        self.entries
            .insert(name.to_string(), EnvEntry::Binding(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn default_environment_contents() {
        let env = Environment::new();
        for name in CONSTANTS {
            assert!(env.is_binding(name), "{name} should be bound");
        }
        for name in [
            "+", "-", "*", "/", "sqrt", "^", "ln", "sin", "cos", "tan", "real", "imag", "mag",
            "arg", "conj", "list", "first", "rest", "length", "append", "join", "range",
            "discrete-plot", "continuous-plot", "set-property", "get-property",
        ] {
            assert!(env.is_procedure(name), "{name} should be a procedure");
        }
        assert_eq!(env.procedure_names().len(), 26);
    }

    #[test]
    fn missing_names() {
        let env = Environment::new();
        assert!(!env.is_known("nope"));
        assert!(env.get_binding("nope").is_none());
        assert_eq!(env.get_procedure("nope")(&[]).unwrap(), Expression::none());
    }

    #[test]
    fn reserved_names_cannot_be_bound() {
        let mut env = Environment::new();
        for name in ["pi", "+", "begin", "define", "lambda"] {
            let err = env.add_binding(name, Expression::number(1.0)).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::Redefinition { .. }));
        }
        assert_eq!(env.get_binding("pi"), Expression::number(std::f64::consts::PI));
    }

    #[test]
    fn rebinding_replaces_and_reset_restores() {
        let mut env = Environment::new();
        env.add_binding("a", Expression::number(1.0)).unwrap();
        env.add_binding("a", Expression::number(2.0)).unwrap();
        assert_eq!(env.get_binding("a"), Expression::number(2.0));

        env.reset();
        assert!(!env.is_known("a"));
        assert!(env.is_binding("pi"));
    }

    #[test]
    fn copies_are_independent() {
        let mut base = Environment::new();
        base.add_binding("x", Expression::number(1.0)).unwrap();
        let mut derived = base.clone();
        derived.add_binding("x", Expression::number(5.0)).unwrap();
        assert_eq!(base.get_binding("x"), Expression::number(1.0));
        assert_eq!(derived.get_binding("x"), Expression::number(5.0));
    }
}
