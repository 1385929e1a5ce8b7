//! The seam between constraint evaluation and a logic engine
//!
//! The engine itself (parsing, unification, resolution) lives outside this
//! crate. It is driven through two traits: a [`LogicEngine`] consults a
//! program and hands back an [`ExecutionContext`], which answers one query at
//! a time, one solution per call.

use crate::term::Term;
use std::collections::BTreeMap;

/// Variable name to bound term, for one solution
pub type Bindings = BTreeMap<String, Term>;

/// One reply from [`ExecutionContext::next_answer`]
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Solution(Bindings),
    /// The goal raised an exception; no further solutions follow.
    Thrown(Term),
}

impl Answer {
    pub fn solution<'a>(bindings: impl IntoIterator<Item = (&'a str, Term)>) -> Self {
        Answer::Solution(
            bindings
                .into_iter()
                .map(|(name, term)| (name.to_string(), term))
                .collect(),
        )
    }
}

pub trait LogicEngine {
    type Context: ExecutionContext;

    /// Consults `program` into a fresh execution context. Malformed program
    /// text is reported as the engine's error term.
    fn start(&self, program: &str) -> Result<Self::Context, Term>;
}

pub trait ExecutionContext {
    /// Issues a new query, discarding whatever was left of the previous one.
    fn query(&mut self, goal: &str) -> Result<(), Term>;

    /// Requests the next solution of the current query. Blocks until the
    /// engine has one; `None` once the solutions are exhausted.
    fn next_answer(&mut self) -> Option<Answer>;
}
