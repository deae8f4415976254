//! Worker sessions: the inbound/outbound channel protocol and the
//! start/stop/reset/interrupt lifecycle.

use std::sync::mpsc;
use std::thread;

use plotscript::session::{worker_loop, Request, INTERRUPTED, NOT_RUNNING};
use plotscript::{Expression, Interpreter, Output, Session};

fn result(output: Output) -> Expression {
    match output {
        Output::Result(expr) => expr,
        Output::Error(message) => panic!("unexpected error: {message}"),
    }
}

#[test]
fn requests_are_parsed_from_lines() {
    assert_eq!(Request::from("stop"), Request::Stop);
    assert_eq!(Request::from("reset"), Request::Reset);
    assert_eq!(Request::from("exit"), Request::Exit);
    assert_eq!(Request::from("(+ 1 2)"), Request::Eval("(+ 1 2)".into()));
}

#[test]
fn worker_loop_answers_in_order_until_a_control_token() {
    let (to_worker, inbound) = mpsc::channel();
    let (outbound, from_worker) = mpsc::channel();
    let handle = thread::spawn(move || worker_loop(Interpreter::new(), inbound, outbound));

    for line in ["(define a 2)", "(* a 21)", "(first 4)", "stop", "(+ 1 1)"] {
        let _ = to_worker.send(line.to_string());
    }
    handle.join().unwrap();

    let outputs: Vec<Output> = from_worker.iter().collect();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[1], Output::Result(Expression::number(42.0)));
    assert!(outputs[2].is_error());
}

#[test]
fn errors_are_reported_as_messages() {
    let mut session = Session::new(Interpreter::new()).unwrap();
    match session.eval("(first 4)") {
        Output::Error(message) => assert!(message.starts_with("Error:"), "{message}"),
        other => panic!("expected an error, got {other:?}"),
    }
    match session.eval("(+ 1") {
        Output::Error(message) => assert!(message.starts_with("Error: invalid expression")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn definitions_persist_within_a_session() {
    let mut session = Session::new(Interpreter::new()).unwrap();
    result(session.eval("(define a 5)"));
    assert_eq!(result(session.eval("(+ a 1)")), Expression::number(6.0));
}

#[test]
fn reset_restores_the_baseline() {
    let mut baseline = Interpreter::new();
    baseline.eval_source("(define b 7)").unwrap();
    let mut session = Session::new(baseline).unwrap();

    result(session.eval("(define a 5)"));
    session.reset().unwrap();
    assert!(session.is_running());
    assert!(session.eval("(a)").is_error());
    assert_eq!(result(session.eval("(b)")), Expression::number(7.0));
}

#[test]
fn stopped_sessions_refuse_work_until_started() {
    let mut session = Session::new(Interpreter::new()).unwrap();
    session.stop();
    assert!(!session.is_running());
    assert!(!session.submit("(+ 1 2)"));
    assert_eq!(session.eval("(+ 1 2)"), Output::Error(NOT_RUNNING.to_string()));

    session.start().unwrap();
    assert_eq!(result(session.eval("(+ 1 2)")), Expression::number(3.0));
}

#[test]
fn control_tokens_sent_as_programs_stop_the_worker() {
    for token in ["stop", "reset", "exit"] {
        let mut session = Session::new(Interpreter::new()).unwrap();
        assert_eq!(session.eval(token), Output::Error(NOT_RUNNING.to_string()));
        assert!(!session.is_running(), "{token} left the worker running");

        session.start().unwrap();
        assert!(session.is_running());
        assert_eq!(result(session.eval("(+ 1 2)")), Expression::number(3.0));
    }
}

#[test]
fn interrupt_starts_a_fresh_worker() {
    let mut session = Session::new(Interpreter::new()).unwrap();
    result(session.eval("(define a 1)"));
    let output = session.interrupt().unwrap();
    assert_eq!(output, Output::Error(INTERRUPTED.to_string()));
    assert!(session.is_running());
    assert!(session.eval("(a)").is_error());
    assert_eq!(result(session.eval("(* 2 3)")), Expression::number(6.0));
}

#[test]
fn exit_ends_the_session() {
    let mut session = Session::new(Interpreter::new()).unwrap();
    result(session.eval("(+ 1 1)"));
    session.exit();
}

#[test]
fn outputs_serialize_with_their_kind() {
    let error = serde_json::to_value(Output::Error("Error: nope".into())).unwrap();
    assert_eq!(error, serde_json::json!({ "error": "Error: nope" }));

    let value = serde_json::to_value(Output::Result(Expression::number(3.0))).unwrap();
    assert_eq!(value["result"]["head"]["type"], "number");
    assert_eq!(value["result"]["head"]["value"], 3.0);

    let decoded: Output = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, Output::Result(Expression::number(3.0)));
}
