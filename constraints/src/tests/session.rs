use crate::engine::{Answer, ExecutionContext, LogicEngine};
use crate::error::DiagnosticKind;
use crate::replay::ReplayEngine;
use crate::session::Session;
use crate::term::Term;

fn syntax_error(line: i64, column: i64) -> Term {
    Term::compound(
        "error",
        vec![
            Term::compound("syntax_error", vec![Term::atom("operator_expected")]),
            Term::list(vec![
                Term::compound("line", vec![Term::Integer(line)]),
                Term::compound("column", vec![Term::Integer(column)]),
            ]),
        ],
    )
}

#[test]
fn test_start_failure_is_translated() {
    let engine = ReplayEngine::new().reject_program(syntax_error(2, 5));

    match Session::start(&engine, "foo(") {
        Err(diagnostic) => {
            assert_eq!(diagnostic.kind, DiagnosticKind::SyntaxError);
            assert_eq!(diagnostic.position(), Some((2, 5)));
        }
        Ok(_) => panic!("Expected the program to be rejected"),
    }
}

#[test]
fn test_query_failure_happens_before_answers() {
    let engine = ReplayEngine::new().reject_query("foo(.", syntax_error(1, 5));
    let mut session = Session::start(&engine, "").unwrap();

    let result = session.query("foo(.");
    assert!(matches!(result, Err(ref d) if d.kind == DiagnosticKind::SyntaxError));
}

#[test]
fn test_answers_are_yielded_in_engine_order() {
    let engine = ReplayEngine::new().on_query(
        "member(X, [a, b]).",
        vec![
            Answer::solution([("X", Term::atom("a"))]),
            Answer::solution([("X", Term::atom("b"))]),
        ],
    );
    let mut session = Session::start(&engine, "").unwrap();

    let answers: Vec<_> = session
        .query("member(X, [a, b]).")
        .unwrap()
        .map(|answer| answer.unwrap()["X"].clone())
        .collect();
    assert_eq!(answers, vec![Term::atom("a"), Term::atom("b")]);
}

#[test]
fn test_thrown_answer_ends_the_sequence() {
    let thrown = Term::compound(
        "error",
        vec![
            Term::compound(
                "existence_error",
                vec![
                    Term::atom("procedure"),
                    Term::compound("/", vec![Term::atom("missing"), Term::Integer(0)]),
                ],
            ),
            Term::compound("/", vec![Term::atom("missing"), Term::Integer(0)]),
        ],
    );
    let engine = ReplayEngine::new().on_query(
        "p(X).",
        vec![
            Answer::solution([("X", Term::Integer(1))]),
            Answer::Thrown(thrown),
            Answer::solution([("X", Term::Integer(2))]),
        ],
    );
    let mut session = Session::start(&engine, "").unwrap();
    let mut answers = session.query("p(X).").unwrap();

    assert!(answers.next().unwrap().is_ok());
    let error = answers.next().unwrap().unwrap_err();
    assert_eq!(error.kind, DiagnosticKind::ExistenceError);
    assert!(error.message.contains("missing/0"));
    assert!(answers.next().is_none());
    assert!(answers.next().is_none());
}

#[test]
fn test_session_runs_queries_one_after_another() {
    let engine = ReplayEngine::new()
        .on_query("a(X).", vec![Answer::solution([("X", Term::Integer(1))])])
        .on_query("b(X).", vec![Answer::solution([("X", Term::Integer(2))])]);
    let mut session = Session::start(&engine, "").unwrap();

    assert_eq!(session.query("a(X).").unwrap().count(), 1);
    assert_eq!(session.query("b(X).").unwrap().count(), 1);
    assert_eq!(session.query("c(X).").unwrap().count(), 0);
}

#[test]
fn test_abandoned_query_does_not_leak_into_next() {
    let engine = ReplayEngine::new()
        .on_query(
            "a(X).",
            vec![
                Answer::solution([("X", Term::Integer(1))]),
                Answer::solution([("X", Term::Integer(2))]),
            ],
        )
        .on_query("b(X).", vec![]);
    let mut session = Session::start(&engine, "").unwrap();

    let first = session.query("a(X).").unwrap().next();
    assert!(first.is_some());
    assert_eq!(session.query("b(X).").unwrap().count(), 0);
}

#[test]
fn test_owned_answers_outlive_the_borrow() {
    let engine = ReplayEngine::new().on_query(
        "a(X).",
        vec![Answer::solution([("X", Term::Integer(1))])],
    );
    let answers = Session::start(&engine, "")
        .unwrap()
        .into_answers("a(X).")
        .unwrap();
    assert_eq!(answers.count(), 1);
}

#[test]
fn test_replay_context_records_queries() {
    let engine = ReplayEngine::new();
    let mut context = engine.start("p.").unwrap();
    context.query("p.").unwrap();
    context.query("q.").unwrap();

    assert_eq!(context.queries(), ["p.".to_string(), "q.".to_string()]);
    assert!(context.next_answer().is_none());
    assert_eq!(engine.programs(), vec!["p.".to_string()]);
}
