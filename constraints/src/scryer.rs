//! A [`LogicEngine`] backed by an embedded Scryer Prolog machine
//!
//! Each [`ScryerEngine::start`] builds a fresh machine. The program is first
//! read clause by clause with `read_term/3`, so malformed text fails the start
//! with the reader's syntax error, and only then consulted.

use crate::engine::{Answer, Bindings, ExecutionContext, LogicEngine};
use crate::facts::escape;
use crate::term::Term;
use scryer_prolog::{LeafAnswer, Machine, MachineBuilder, Term as PrologTerm};
use std::collections::VecDeque;
use std::io::Write;
use tracing::debug;

/// Written on the first line of every consulted file. Facts for one predicate
/// are spread over several workspace blocks, and generators may be defined
/// anywhere in the rules.
const PRELUDE: &str = ":- discontiguous(workspace/1). \
:- discontiguous(workspace_ident/2). \
:- discontiguous(workspace_version/2). \
:- discontiguous(workspace_has_dependency/4). \
:- discontiguous(gen_enforced_dependency/4). \
:- discontiguous(gen_invalid_dependency/4). \
:- discontiguous(gen_enforced_field/3).\n";

/// Lines the prelude shifts the program by
const PRELUDE_LINES: i64 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScryerEngine;

impl ScryerEngine {
    pub fn new() -> Self {
        Self
    }
}

impl LogicEngine for ScryerEngine {
    type Context = ScryerContext;

    fn start(&self, program: &str) -> Result<ScryerContext, Term> {
        let mut file = tempfile::Builder::new()
            .prefix("constraints-")
            .suffix(".pl")
            .tempfile()
            .map_err(host_error)?;
        file.write_all(PRELUDE.as_bytes())
            .and_then(|_| file.write_all(program.as_bytes()))
            .and_then(|_| file.flush())
            .map_err(host_error)?;

        let path = escape(Some(&file.path().to_string_lossy()));
        let load = format!(
            "open({path}, read, S), \
             catch((repeat, read_term(S, T, []), T == end_of_file, !), E, (close(S), throw(E))), \
             close(S), consult({path}).",
            path = path
        );

        let mut machine = MachineBuilder::default().build();
        debug!(bytes = program.len(), "consulting program");

        let outcome = machine.run_query(load).next();
        match outcome {
            Some(Ok(LeafAnswer::True)) | Some(Ok(LeafAnswer::LeafAnswer { .. })) => {}
            Some(Ok(LeafAnswer::Exception(error))) | Some(Err(error)) => {
                return Err(program_error(from_prolog(error)));
            }
            Some(Ok(LeafAnswer::False)) | None => {
                return Err(Term::compound(
                    "error",
                    vec![Term::atom("program could not be loaded")],
                ));
            }
        }

        Ok(ScryerContext {
            machine,
            pending: VecDeque::new(),
        })
    }
}

pub struct ScryerContext {
    machine: Machine,
    pending: VecDeque<Answer>,
}

impl ExecutionContext for ScryerContext {
    /// Runs `goal` to completion and buffers its answers, up to and including
    /// the first exception.
    fn query(&mut self, goal: &str) -> Result<(), Term> {
        self.pending.clear();

        for answer in self.machine.run_query(goal.to_string()) {
            match answer {
                Ok(LeafAnswer::True) => {
                    self.pending.push_back(Answer::Solution(Bindings::new()));
                }
                Ok(LeafAnswer::LeafAnswer { bindings, .. }) => {
                    let bindings = bindings
                        .into_iter()
                        .map(|(name, term)| (name, from_prolog(term)))
                        .collect();
                    self.pending.push_back(Answer::Solution(bindings));
                }
                Ok(LeafAnswer::False) => break,
                Ok(LeafAnswer::Exception(error)) | Err(error) => {
                    self.pending.push_back(Answer::Thrown(from_prolog(error)));
                    break;
                }
            }
        }

        debug!(goal, answers = self.pending.len(), "query answered");
        Ok(())
    }

    fn next_answer(&mut self) -> Option<Answer> {
        self.pending.pop_front()
    }
}

fn from_prolog(term: PrologTerm) -> Term {
    match term {
        PrologTerm::Integer(n) => {
            let digits = n.to_string();
            digits.parse().map(Term::Integer).unwrap_or(Term::Atom(digits))
        }
        PrologTerm::Rational(r) => Term::Atom(r.to_string()),
        PrologTerm::Float(n) => Term::Float(n.into()),
        PrologTerm::Atom(name) => Term::Atom(name),
        PrologTerm::String(text) => Term::String(text),
        PrologTerm::List(items) => Term::list(items.into_iter().map(from_prolog).collect()),
        PrologTerm::Compound(name, args) => {
            Term::compound(name, args.into_iter().map(from_prolog).collect())
        }
        PrologTerm::Var(name) => Term::Var(name),
    }
}

/// Keeps only the position details of a syntax error raised while reading
/// the program, moved back past the prelude. Other errors pass through.
fn program_error(error: Term) -> Term {
    let [cause, context] = match error {
        Term::Compound { name, args } if name == "error" => match <[Term; 2]>::try_from(args) {
            Ok(pair) if pair[0].indicator() == ("syntax_error", 1) => pair,
            Ok(pair) => return Term::compound(name, pair.into()),
            Err(args) => return Term::compound(name, args),
        },
        other => return other,
    };

    let mut details = Vec::new();
    let mut cursor = &context;
    loop {
        match cursor {
            Term::Compound { name, args } if name == "." && args.len() == 2 => {
                keep_position(&args[0], &mut details);
                cursor = &args[1];
            }
            last => {
                keep_position(last, &mut details);
                break;
            }
        }
    }

    Term::compound("error", vec![cause, Term::list(details)])
}

fn keep_position(item: &Term, details: &mut Vec<Term>) {
    match item {
        Term::Compound { name, args } if name == "line" => {
            if let [Term::Integer(line)] = args.as_slice() {
                let line = (line - PRELUDE_LINES).max(1);
                details.push(Term::compound("line", vec![Term::Integer(line)]));
            }
        }
        Term::Compound { name, args } if name == "column" && args.len() == 1 => {
            details.push(item.clone());
        }
        _ => {}
    }
}

fn host_error(err: std::io::Error) -> Term {
    Term::compound(
        "error",
        vec![Term::atom(format!("cannot stage program: {}", err))],
    )
}
