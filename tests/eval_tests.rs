//! Evaluator behaviour: dispatch, special forms, lambdas and the error
//! taxonomy, exercised through whole programs.

mod common;

use common::{eval_err, eval_ok, number, numbers, run};
use plotscript::runtime::DEFAULT_MAX_DEPTH;
use plotscript::{EngineConfig, ErrorKind, Expression, Interpreter};

// ============================================================================
// LITERALS AND LOOKUP
// ============================================================================

#[test]
fn literals_evaluate_to_themselves() {
    assert_eq!(eval_ok("(42)"), number(42.0));
    assert_eq!(eval_ok("(-3.5e2)"), number(-350.0));
    assert_eq!(eval_ok("(\"hello\")"), Expression::string("hello"));
}

#[test]
fn evaluating_a_value_again_changes_nothing() {
    let mut interp = Interpreter::new();
    let first = interp.eval_source("(\"text\")").unwrap();
    let again = interp.eval_source(&first.to_string()).unwrap();
    assert_eq!(first, again);
}

#[test]
fn constants_are_bound() {
    assert_eq!(eval_ok("(pi)"), number(std::f64::consts::PI));
    assert_eq!(eval_ok("(e)"), number(std::f64::consts::E));
    assert_eq!(eval_ok("(I)").to_string(), "(0,1)");
}

#[test]
fn unbound_symbols_fail() {
    assert!(matches!(
        eval_err("(undefined-symbol)"),
        ErrorKind::UnboundSymbol { symbol } if symbol == "undefined-symbol"
    ));
    assert!(matches!(eval_err("(+ 1 nope)"), ErrorKind::UnboundSymbol { .. }));
}

#[test]
fn unknown_procedures_fail() {
    assert!(matches!(
        eval_err("(frobnicate 1 2)"),
        ErrorKind::UnknownProcedure { name } if name == "frobnicate"
    ));
    assert!(matches!(eval_err("(1 2 3)"), ErrorKind::UnknownProcedure { .. }));
}

#[test]
fn procedure_names_alone_are_zero_argument_calls() {
    assert!(matches!(eval_err("(+)"), ErrorKind::Argument { .. }));
    assert_eq!(eval_ok("(*)"), number(1.0));
    assert_eq!(eval_ok("(list)"), Expression::list(vec![]));
}

// ============================================================================
// BEGIN AND DEFINE
// ============================================================================

#[test]
fn begin_returns_last_value() {
    assert_eq!(eval_ok("(begin (1) (2) (3))"), number(3.0));
    assert!(matches!(eval_err("(begin)"), ErrorKind::Argument { .. }));
}

#[test]
fn define_binds_and_returns_value() {
    assert_eq!(eval_ok("(define x (+ 1 2))"), number(3.0));
    assert_eq!(eval_ok("(begin (define x (+ 1 2)) (* x 2))"), number(6.0));
}

#[test]
fn define_replaces_user_bindings() {
    assert_eq!(eval_ok("(begin (define a 1) (define a 2) a)"), number(2.0));
}

#[test]
fn reserved_names_cannot_be_redefined() {
    for program in [
        "(define pi 3)",
        "(define + 3)",
        "(define begin 1)",
        "(define define 1)",
        "(define I 0)",
    ] {
        assert!(
            matches!(eval_err(program), ErrorKind::Redefinition { .. }),
            "{program}"
        );
    }
}

#[test]
fn define_checks_its_shape() {
    assert!(matches!(eval_err("(define x)"), ErrorKind::Argument { .. }));
    assert!(matches!(eval_err("(define x 1 2)"), ErrorKind::Argument { .. }));
    assert!(matches!(eval_err("(define 1 2)"), ErrorKind::Type { .. }));
}

#[test]
fn failed_define_leaves_environment_untouched() {
    let mut interp = Interpreter::new();
    assert!(interp.eval_source("(define x (first 4))").is_err());
    assert!(!interp.environment().is_known("x"));
    assert!(interp.eval_source("(define pi (define y 1))").is_err());
    assert!(!interp.environment().is_known("y"));
}

// ============================================================================
// LAMBDAS
// ============================================================================

#[test]
fn lambda_application() {
    assert_eq!(
        eval_ok("(begin (define f (lambda (x) (+ x 1))) (f 41))"),
        number(42.0)
    );
    assert_eq!(
        eval_ok("(begin (define add (lambda (a b) (+ a b))) (add 2 3))"),
        number(5.0)
    );
}

#[test]
fn lambda_body_is_not_evaluated_at_creation() {
    let lambda = eval_ok("(lambda (x) (nope x))");
    assert!(lambda.is_lambda());
    assert_eq!(lambda.to_string(), "((x) (nope (x)))");
}

#[test]
fn lambda_sees_the_calling_environment() {
    // y is bound after f is created but before it is called.
    assert_eq!(
        eval_ok("(begin (define f (lambda (x) (+ x y))) (define y 10) (f 1))"),
        number(11.0)
    );
}

#[test]
fn lambda_bindings_do_not_leak() {
    let mut interp = Interpreter::new();
    interp
        .eval_source("(begin (define x 1) (define g (lambda (x) (define z x))) (g 5))")
        .unwrap();
    assert_eq!(interp.eval_source("(x)").unwrap(), number(1.0));
    assert!(interp.eval_source("(z)").is_err());
}

#[test]
fn lambda_arity_is_checked() {
    let program = "(begin (define f (lambda (a b) (+ a b))) (f 1))";
    assert!(matches!(
        eval_err(program),
        ErrorKind::Argument { actual: 1, .. }
    ));
}

#[test]
fn lambda_parameters_cannot_shadow_builtins() {
    assert!(matches!(
        eval_err("(begin (define f (lambda (sin) sin)) (f 1))"),
        ErrorKind::Redefinition { .. }
    ));
}

#[test]
fn lambda_parameters_must_be_symbols() {
    assert!(matches!(eval_err("(lambda (1) 2)"), ErrorKind::Type { .. }));
    assert!(matches!(eval_err("(lambda (x))"), ErrorKind::Argument { .. }));
}

#[test]
fn runaway_recursion_is_stopped() {
    let mut interp = Interpreter::with_config(EngineConfig { max_depth: 64 });
    let err = interp
        .eval_source("(begin (define f (lambda (x) (f x))) (f 1))")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit { limit: 64 });
}

#[test]
fn default_recursion_limit_fits_an_ordinary_thread() {
    let err = Interpreter::new()
        .eval_source("(begin (define f (lambda (n) (f n))) (f 1))")
        .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::RecursionLimit {
            limit: DEFAULT_MAX_DEPTH
        }
    );
}

// ============================================================================
// APPLY AND MAP
// ============================================================================

#[test]
fn apply_spreads_arguments() {
    assert_eq!(eval_ok("(apply + (list 1 2 3))"), number(6.0));
    assert_eq!(
        eval_ok("(begin (define f (lambda (a b) (- a b))) (apply f (list 5 2)))"),
        number(3.0)
    );
}

#[test]
fn apply_requires_a_name_and_a_list() {
    assert!(matches!(eval_err("(apply + 3)"), ErrorKind::Type { .. }));
    assert!(matches!(eval_err("(apply (+ 1) (list 2))"), ErrorKind::Type { .. }));
    assert!(matches!(eval_err("(apply nope (list 2))"), ErrorKind::UnknownProcedure { .. }));
    assert!(matches!(eval_err("(apply +)"), ErrorKind::Argument { .. }));
    assert!(matches!(
        eval_err("(begin (define a 1) (apply a (list 2)))"),
        ErrorKind::Type { .. }
    ));
}

#[test]
fn map_preserves_order() {
    assert_eq!(eval_ok("(map sqrt (list 1 4 9))"), numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(
        eval_ok("(begin (define sq (lambda (x) (* x x))) (map sq (list 1 2 3)))"),
        numbers(&[1.0, 4.0, 9.0])
    );
    assert_eq!(eval_ok("(map - (list))"), Expression::list(vec![]));
}

#[test]
fn map_requires_a_callable_and_a_list() {
    assert!(matches!(eval_err("(map sqrt 4)"), ErrorKind::Type { .. }));
    assert!(matches!(eval_err("(map nope (list 1))"), ErrorKind::UnknownProcedure { .. }));
    assert!(matches!(eval_err("(map first (list 1))"), ErrorKind::Type { .. }));
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn properties_round_trip() {
    assert_eq!(
        eval_ok("(get-property \"key\" (set-property \"key\" (+ 1 2) (list)))"),
        number(3.0)
    );
    assert!(eval_ok("(get-property \"missing\" (list 1))").is_none());
}

#[test]
fn property_values_do_not_change_equality() {
    let tagged = eval_ok("(set-property \"note\" \"x\" (list 1 2))");
    assert_eq!(tagged, numbers(&[1.0, 2.0]));
    assert_eq!(tagged.get_property("note"), Some(&Expression::string("x")));
}

#[test]
fn property_keys_must_be_string_literals() {
    assert!(matches!(
        eval_err("(set-property key 1 (list))"),
        ErrorKind::Type { .. }
    ));
    assert!(matches!(eval_err("(get-property 1 (list))"), ErrorKind::Type { .. }));
    assert!(matches!(eval_err("(get-property \"k\")"), ErrorKind::Argument { .. }));
}

#[test]
fn property_procedures_work_through_apply() {
    assert_eq!(
        eval_ok("(get-property \"k\" (apply set-property (list \"k\" 7 (list))))"),
        number(7.0)
    );
}

// ============================================================================
// PARSING
// ============================================================================

#[test]
fn malformed_programs_are_parse_errors() {
    for program in ["(+ 1", "", "pi", "(+ 1 2) (+ 3 4)", "((+ 1) 2)"] {
        let err = run(program).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Parse { .. }), "{program:?}");
        assert!(err.to_string().starts_with("Error: invalid expression"));
    }
}

#[test]
fn comments_and_whitespace_are_ignored() {
    let program = "; leading comment\n(begin\n  (define a 2) ; trailing\n  (* a 3))\n";
    assert_eq!(eval_ok(program), number(6.0));
}
