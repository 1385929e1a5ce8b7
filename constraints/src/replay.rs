//! An in-memory engine that replays recorded answers
//!
//! Handy for exercising rule tooling without a Prolog runtime: each query
//! string is mapped to the answers (or the error) a real engine gave for it.
//! Queries nobody recorded have no solutions.

use crate::engine::{Answer, ExecutionContext, LogicEngine};
use crate::term::Term;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
enum Script {
    Answers(Vec<Answer>),
    Rejected(Term),
}

#[derive(Debug, Default)]
pub struct ReplayEngine {
    program_error: Option<Term>,
    scripts: HashMap<String, Script>,
    programs: RefCell<Vec<String>>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `start` fails with `error`, as with a malformed program.
    pub fn reject_program(mut self, error: Term) -> Self {
        self.program_error = Some(error);
        self
    }

    pub fn on_query(mut self, goal: &str, answers: Vec<Answer>) -> Self {
        self.scripts
            .insert(normalize_goal(goal), Script::Answers(answers));
        self
    }

    /// Issuing `goal` fails with `error` before any answer.
    pub fn reject_query(mut self, goal: &str, error: Term) -> Self {
        self.scripts
            .insert(normalize_goal(goal), Script::Rejected(error));
        self
    }

    /// Programs this engine was started with, oldest first.
    pub fn programs(&self) -> Vec<String> {
        self.programs.borrow().clone()
    }
}

impl LogicEngine for ReplayEngine {
    type Context = ReplayContext;

    fn start(&self, program: &str) -> Result<ReplayContext, Term> {
        self.programs.borrow_mut().push(program.to_string());
        if let Some(error) = &self.program_error {
            return Err(error.clone());
        }
        Ok(ReplayContext {
            scripts: self.scripts.clone(),
            pending: VecDeque::new(),
            queries: Vec::new(),
        })
    }
}

#[derive(Debug)]
pub struct ReplayContext {
    scripts: HashMap<String, Script>,
    pending: VecDeque<Answer>,
    queries: Vec<String>,
}

impl ReplayContext {
    /// Queries issued against this context, in order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

impl ExecutionContext for ReplayContext {
    fn query(&mut self, goal: &str) -> Result<(), Term> {
        let goal = normalize_goal(goal);
        self.queries.push(goal.clone());
        self.pending.clear();

        match self.scripts.get(&goal) {
            Some(Script::Rejected(error)) => Err(error.clone()),
            Some(Script::Answers(answers)) => {
                self.pending.extend(answers.iter().cloned());
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn next_answer(&mut self) -> Option<Answer> {
        self.pending.pop_front()
    }
}

fn normalize_goal(goal: &str) -> String {
    goal.split_whitespace().collect::<Vec<_>>().join(" ")
}
