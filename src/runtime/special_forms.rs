//! Special forms: heads whose evaluation rule is built into the evaluator.
//!
//! Each form validates its argument count and kinds before evaluating
//! anything, so a rejected form leaves the environment untouched.

use tracing::debug;

use crate::ast::{Atom, Expression};
use crate::atoms::properties::{get_property, set_property};
use crate::errors::{ErrorReporting, PlotscriptError, RUNTIME};
use crate::plot::{self, PlotKind, PlotOptions};
use crate::runtime::eval::{Callable, EvaluationContext};

fn require_tail(form: &str, expr: &Expression, expected: usize) -> Result<(), PlotscriptError> {
    if expr.tail.len() != expected {
        return Err(RUNTIME.arity(form, &expected.to_string(), expr.tail.len()));
    }
    Ok(())
}

fn require_tail_range(
    form: &str,
    expr: &Expression,
    min: usize,
    max: usize,
) -> Result<(), PlotscriptError> {
    if expr.tail.len() < min || expr.tail.len() > max {
        return Err(RUNTIME.arity(form, &format!("{} or {}", min, max), expr.tail.len()));
    }
    Ok(())
}

/// A string literal written directly in the source.
fn literal_key<'a>(form: &str, expr: &'a Expression) -> Result<&'a str, PlotscriptError> {
    expr.as_str()
        .ok_or_else(|| RUNTIME.type_mismatch(form, "a string literal property name", expr.type_name()))
}

impl EvaluationContext<'_> {
    // ========================================================================
    // SEQUENCING AND BINDING
    // ========================================================================

    /// `(begin e1 e2 ...)`: evaluates in order, returns the last value.
    pub(crate) fn eval_begin(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        let mut result = None;
        for item in &expr.tail {
            result = Some(self.eval(item)?);
        }
        result.ok_or_else(|| RUNTIME.arity("begin", "at least 1", 0))
    }

    /// `(define name expr)`: binds the value of `expr` and returns it.
    pub(crate) fn eval_define(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("define", expr, 2)?;
        let target = &expr.tail[0];
        let Some(name) = target.as_symbol() else {
            return Err(RUNTIME.type_mismatch("define", "a symbol", target.type_name()));
        };
        self.env.check_bindable(name)?;

        let value = self.eval(&expr.tail[1])?;
        self.env.add_binding(name, value.clone())?;
        debug!(symbol = name, value = %value, "define");
        Ok(value)
    }

    /// `(lambda (params...) body)`: builds a lambda value without evaluating
    /// the body.
    pub(crate) fn eval_lambda(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("lambda", expr, 2)?;
        let params_expr = &expr.tail[0];

        // An already-built lambda carries its parameters as a list.
        let (first, rest) = if params_expr.is_list() {
            (None, params_expr.tail.as_slice())
        } else {
            (Some(&params_expr.head), params_expr.tail.as_slice())
        };

        let param_name = |atom: &Atom| {
            atom.as_symbol()
                .map(str::to_string)
                .ok_or_else(|| RUNTIME.type_mismatch("lambda", "parameter names", atom.type_name()))
        };

        let mut params = Vec::with_capacity(rest.len() + 1);
        if let Some(head) = first {
            params.push(param_name(head)?);
        }
        for param in rest {
            if !param.is_leaf() {
                return Err(RUNTIME.type_mismatch("lambda", "parameter names", param.type_name()));
            }
            params.push(param_name(&param.head)?);
        }

        Ok(Expression::lambda(params, expr.tail[1].clone()))
    }

    // ========================================================================
    // HIGHER-ORDER FORMS
    // ========================================================================

    /// `(apply name (list args...))`
    pub(crate) fn eval_apply(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("apply", expr, 2)?;
        let callable = self.resolve_callable("apply", &expr.tail[0])?;
        let args = self.eval(&expr.tail[1])?;
        if !args.is_list() {
            return Err(RUNTIME.type_mismatch("apply", "a list of arguments", args.type_name()));
        }
        self.call("apply", &callable, &args.tail)
    }

    /// `(map name list)`: applies the callable to each element in order.
    pub(crate) fn eval_map(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("map", expr, 2)?;
        let callable = self.resolve_callable("map", &expr.tail[0])?;
        let items = self.eval(&expr.tail[1])?;
        if !items.is_list() {
            return Err(RUNTIME.type_mismatch("map", "a list", items.type_name()));
        }

        let results = items
            .tail
            .iter()
            .map(|item| self.call("map", &callable, std::slice::from_ref(item)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expression::list(results))
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    /// `(set-property "key" value expr)`
    pub(crate) fn eval_set_property(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("set-property", expr, 3)?;
        let key = literal_key("set-property", &expr.tail[0])?;
        let value = self.eval(&expr.tail[1])?;
        let target = self.eval(&expr.tail[2])?;
        Ok(set_property(&target, key, value))
    }

    /// `(get-property "key" expr)`
    pub(crate) fn eval_get_property(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail("get-property", expr, 2)?;
        let key = literal_key("get-property", &expr.tail[0])?;
        let target = self.eval(&expr.tail[1])?;
        Ok(get_property(&target, key))
    }

    // ========================================================================
    // PLOTS
    // ========================================================================

    fn eval_plot_options(&mut self, expr: Option<&Expression>) -> Result<PlotOptions, PlotscriptError> {
        match expr {
            Some(options) => PlotOptions::from_expression(&self.eval(options)?),
            None => Ok(PlotOptions::default()),
        }
    }

    /// `(discrete-plot data [options])`
    pub(crate) fn eval_discrete_plot(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail_range("discrete-plot", expr, 1, 2)?;
        let data = self.eval(&expr.tail[0])?;
        let options = self.eval_plot_options(expr.tail.get(1))?;
        let samples = plot::extract_samples("discrete-plot", &data)?;
        plot::compile(&samples, PlotKind::Discrete, &options)
    }

    /// `(continuous-plot f (list xmin xmax) [options])`
    pub(crate) fn eval_continuous_plot(&mut self, expr: &Expression) -> Result<Expression, PlotscriptError> {
        require_tail_range("continuous-plot", expr, 2, 3)?;

        let function = &expr.tail[0];
        let callable = if function.as_symbol().is_some() {
            self.resolve_callable("continuous-plot", function)?
        } else {
            let value = self.eval(function)?;
            if !value.is_lambda() {
                return Err(RUNTIME.type_mismatch("continuous-plot", "a function", value.type_name()));
            }
            Callable::Lambda(value)
        };

        let bounds = self.eval(&expr.tail[1])?;
        let (x_min, x_max) = plot::extract_bounds(&bounds)?;
        let options = self.eval_plot_options(expr.tail.get(2))?;

        let mut samples = Vec::with_capacity(plot::SAMPLE_COUNT);
        for x in plot::sample_abscissas(x_min, x_max) {
            let y = self.call("continuous-plot", &callable, &[Expression::number(x)])?;
            let y = y.as_number().ok_or_else(|| {
                RUNTIME.type_mismatch("continuous-plot", "a function returning numbers", y.type_name())
            })?;
            samples.push((x, y));
        }
        plot::compile(&samples, PlotKind::Continuous, &options)
    }
}
