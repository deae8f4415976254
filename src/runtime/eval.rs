//! This module provides the evaluation engine: a recursive tree walk of an
//! [`Expression`] against an [`Environment`].
//!
//! ## Dispatch Order
//!
//! 1. `apply` forms.
//! 2. Leaves (other than `list`): literals evaluate to themselves, symbols are
//!    looked up.
//! 3. Special forms (`begin`, `define`, `lambda`, `map`, `set-property`,
//!    `get-property`, `discrete-plot`, `continuous-plot`), see
//!    [`special_forms`](crate::runtime::special_forms).
//! 4. Lambda application when the head is bound to a lambda.
//! 5. Built-in procedure application on eagerly evaluated arguments.
//!
//! ## Error Handling
//!
//! Every failure aborts the whole evaluation. Bindings are only written after
//! all validation for a form has passed.

use tracing::{debug, trace};

use crate::ast::{Atom, Expression, LIST};
use crate::atoms::Procedure;
use crate::errors::{unspanned, ErrorKind, ErrorReporting, PlotscriptError, RUNTIME};
use crate::runtime::environment::SPECIAL_FORMS;
use crate::runtime::{EngineConfig, Environment};

/// Remaining stack below which `eval` switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each segment allocated once the red zone is reached.
const STACK_GROWTH: usize = 2 * 1024 * 1024;

// ============================================================================
// CORE DATA STRUCTURES: Evaluation Context
// ============================================================================

/// The context for a single evaluation.
pub struct EvaluationContext<'a> {
    pub env: &'a mut Environment,
    pub max_depth: usize,
    pub depth: usize,
}

/// Something `map`, `apply` and `continuous-plot` can call.
#[derive(Clone)]
pub enum Callable {
    Procedure(Procedure),
    Lambda(Expression),
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Evaluates `expr` in `env` with the default engine configuration.
pub fn evaluate(expr: &Expression, env: &mut Environment) -> Result<Expression, PlotscriptError> {
    evaluate_with_config(expr, env, EngineConfig::default())
}

pub fn evaluate_with_config(
    expr: &Expression,
    env: &mut Environment,
    config: EngineConfig,
) -> Result<Expression, PlotscriptError> {
    let mut context = EvaluationContext::new(env, config);
    context.eval(expr)
}

impl<'a> EvaluationContext<'a> {
    pub fn new(env: &'a mut Environment, config: EngineConfig) -> Self {
        Self {
            env,
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Evaluates one expression, enforcing the depth limit.
    pub fn eval(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        if self.depth >= self.max_depth {
            return Err(RUNTIME.report(
                ErrorKind::RecursionLimit {
                    limit: self.max_depth,
                },
                unspanned(),
            ));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.dispatch(expr));
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        let head = expr.head_symbol();
        trace!(head = ?expr.head, arity = expr.tail.len(), "dispatch");

        if head == Some("apply") {
            return self.eval_apply(expr);
        }
        if expr.tail.is_empty() && head != Some(LIST) {
            return self.eval_terminal(expr);
        }

        match head {
            Some("begin") => self.eval_begin(expr),
            Some("define") => self.eval_define(expr),
            Some("lambda") => self.eval_lambda(expr),
            Some("map") => self.eval_map(expr),
            Some("set-property") => self.eval_set_property(expr),
            Some("get-property") => self.eval_get_property(expr),
            Some("discrete-plot") => self.eval_discrete_plot(expr),
            Some("continuous-plot") => self.eval_continuous_plot(expr),
            _ => self.eval_call(expr),
        }
    }

    // ------------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------------

    fn eval_terminal(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        let name = match &expr.head {
            Atom::Symbol(name) => name.as_str(),
            _ => return Ok(expr.clone()),
        };

        if let Some(value) = self.env.lookup(name) {
            return Ok(value.clone());
        }
        if self.env.is_procedure(name) {
            // `(+)` and friends: a procedure applied to no arguments.
            return (self.env.get_procedure(name))(&[]);
        }
        if SPECIAL_FORMS.contains(&name) {
            return Err(RUNTIME.arity(name, "at least 1", 0));
        }
        Err(RUNTIME.unbound_symbol(name))
    }

    // ------------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------------

    fn eval_call(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        let Some(name) = expr.head_symbol() else {
            return Err(RUNTIME.unknown_procedure(&expr.head.to_string()));
        };

        if let Some(binding) = self.env.lookup(name) {
            if binding.is_lambda() {
                let lambda = binding.clone();
                let args = self.eval_args(&expr.tail)?;
                return self.apply_lambda(name, &lambda, &args);
            }
        }

        if !self.env.is_procedure(name) {
            return Err(RUNTIME.unknown_procedure(name));
        }
        let procedure = self.env.get_procedure(name);
        let args = self.eval_args(&expr.tail)?;
        procedure(&args)
    }

    /// Evaluates arguments left to right.
    pub fn eval_args(&mut self, args: &[Expression]) -> Result<Vec<Expression>, PlotscriptError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// Binds each parameter in a copy of the calling environment, then
    /// evaluates the body there.
    pub fn apply_lambda(
        &mut self,
        name: &str,
        lambda: &Expression,
        args: &[Expression],
    ) -> Result<Expression, PlotscriptError> {
        let Some((params, body)) = lambda.lambda_parts() else {
            return Err(RUNTIME.type_mismatch(name, "a lambda", lambda.type_name()));
        };
        if params.len() != args.len() {
            return Err(RUNTIME.arity(name, &params.len().to_string(), args.len()));
        }

        let mut derived = self.env.clone();
        for (param, arg) in params.iter().zip(args) {
            derived.add_binding(param, arg.clone())?;
        }
        debug!(lambda = name, params = ?params, "applying lambda");

        let mut inner = EvaluationContext {
            env: &mut derived,
            max_depth: self.max_depth,
            depth: self.depth,
        };
        inner.eval(body)
    }

    /// Resolves a bare name to a built-in procedure or a bound lambda.
    pub fn resolve_callable(&self, form: &str, expr: &Expression) -> Result<Callable, PlotscriptError> {
        let Some(name) = expr.as_symbol() else {
            return Err(RUNTIME.type_mismatch(form, "a procedure name", expr.type_name()));
        };

        if self.env.is_procedure(name) {
            return Ok(Callable::Procedure(self.env.get_procedure(name)));
        }
        match self.env.lookup(name) {
            Some(binding) if binding.is_lambda() => Ok(Callable::Lambda(binding.clone())),
            Some(binding) => Err(RUNTIME.type_mismatch(form, "a procedure or lambda", binding.type_name())),
            None => Err(RUNTIME.unknown_procedure(name)),
        }
    }

    /// Calls a resolved callable with already-evaluated arguments.
    pub fn call(
        &mut self,
        form: &str,
        callable: &Callable,
        args: &[Expression],
    ) -> Result<Expression, PlotscriptError> {
        match callable {
            Callable::Procedure(procedure) => procedure(args),
            Callable::Lambda(lambda) => self.apply_lambda(form, lambda, args),
        }
    }
}
