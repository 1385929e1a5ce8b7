use crate::engine::{Answer, Bindings, ExecutionContext, LogicEngine};
use crate::error::Diagnostic;
use crate::translate::translate;
use tracing::debug;

/// One execution context, consulted with a fully assembled program
///
/// Queries run one at a time: [`Session::query`] borrows the session
/// mutably for as long as its answers are being consumed.
pub struct Session<C: ExecutionContext> {
    context: C,
    finished: bool,
}

impl<C: ExecutionContext> Session<C> {
    pub fn start<E>(engine: &E, source: &str) -> Result<Self, Diagnostic>
    where
        E: LogicEngine<Context = C>,
    {
        debug!(bytes = source.len(), "starting logic session");
        let context = engine.start(source).map_err(|term| translate(&term))?;
        Ok(Self {
            context,
            finished: true,
        })
    }

    /// Issues `goal`. Errors raised by the query itself are returned before
    /// any answer is produced.
    pub fn query(&mut self, goal: &str) -> Result<Answers<'_, C>, Diagnostic> {
        self.begin(goal)?;
        Ok(Answers { session: self })
    }

    /// Like [`Session::query`], but the answers take the session with them.
    pub fn into_answers(mut self, goal: &str) -> Result<IntoAnswers<C>, Diagnostic> {
        self.begin(goal)?;
        Ok(IntoAnswers { session: self })
    }

    fn begin(&mut self, goal: &str) -> Result<(), Diagnostic> {
        debug!(goal, "issuing query");
        self.finished = true;
        self.context.query(goal).map_err(|term| translate(&term))?;
        self.finished = false;
        Ok(())
    }

    fn next_answer(&mut self) -> Option<Result<Bindings, Diagnostic>> {
        if self.finished {
            return None;
        }

        match self.context.next_answer() {
            Some(Answer::Solution(bindings)) => Some(Ok(bindings)),
            Some(Answer::Thrown(term)) => {
                self.finished = true;
                let diagnostic = translate(&term);
                debug!(error = %diagnostic, "query threw");
                Some(Err(diagnostic))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

/// Lazily pulled solutions of one query. Stops after the first error.
pub struct Answers<'s, C: ExecutionContext> {
    session: &'s mut Session<C>,
}

impl<C: ExecutionContext> Iterator for Answers<'_, C> {
    type Item = Result<Bindings, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        self.session.next_answer()
    }
}

/// Owning counterpart of [`Answers`]
pub struct IntoAnswers<C: ExecutionContext> {
    session: Session<C>,
}

impl<C: ExecutionContext> Iterator for IntoAnswers<C> {
    type Item = Result<Bindings, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        self.session.next_answer()
    }
}
