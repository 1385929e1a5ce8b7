//! Translation of engine error terms into diagnostics
//!
//! Engines report failures as terms such as
//! `error(syntax_error(operator_expected), [line(3), column(7), found(foo)])`.
//! The term is walked into a [`Node`]; nodes describing an error become a
//! [`Diagnostic`]. Anything the walk does not understand, including terms
//! nested deeper than [`MAX_DEPTH`], degrades to an "unknown error" carrying
//! the raw term.

use crate::error::{Diagnostic, DiagnosticKind};
use crate::term::Term;
use std::fmt;

/// The decoded value of a term
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Node>),
    Record(Record),
}

/// A (possibly partial) diagnostic. `line(3)` decodes to a record with only
/// `line` set, waiting to be merged into the error it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
struct Record {
    kind: Option<DiagnosticKind>,
    message: Option<String>,
    line: Option<i64>,
    column: Option<i64>,
    found: Option<String>,
}

impl Record {
    /// Fields set on `other` win.
    fn merge(mut self, other: Record) -> Record {
        self.kind = other.kind.or(self.kind);
        self.message = other.message.or(self.message);
        self.line = other.line.or(self.line);
        self.column = other.column.or(self.column);
        self.found = other.found.or(self.found);
        self
    }
}

#[derive(Debug)]
struct DecodeFailure(String);

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Decoded = Result<Node, DecodeFailure>;

/// Deepest compound nesting the walk follows. List cells do not count.
pub const MAX_DEPTH: usize = 32;

/// Translates an engine error term. Never fails: terms that cannot be
/// decoded become an [`DiagnosticKind::UnknownError`].
pub fn translate(term: &Term) -> Diagnostic {
    match decode(term, 0).and_then(into_diagnostic) {
        Ok(diagnostic) => diagnostic,
        Err(failure) => Diagnostic::unknown(format!("Unknown error: {} ({})", term, failure)),
    }
}

fn into_diagnostic(node: Node) -> Result<Diagnostic, DecodeFailure> {
    let record = match node {
        Node::Record(record) => record,
        other => {
            return Err(DecodeFailure(format!(
                "'{}' does not describe an error",
                render(&other)?
            )))
        }
    };

    let (Some(kind), Some(mut message)) = (record.kind, record.message) else {
        return Err(DecodeFailure(
            "error term carries position details but no cause".to_string(),
        ));
    };

    if let (Some(line), Some(column)) = (record.line, record.column) {
        message.push_str(&format!(" at line {}, column {}", line, column));
    }

    Ok(Diagnostic {
        kind,
        message,
        line: record.line,
        column: record.column,
        found: record.found,
    })
}

fn decode(term: &Term, depth: usize) -> Decoded {
    if depth > MAX_DEPTH {
        return Err(DecodeFailure(format!(
            "term nested deeper than {} levels",
            MAX_DEPTH
        )));
    }

    match term {
        Term::Integer(n) => Ok(Node::Integer(*n)),
        Term::Float(n) => Ok(Node::Float(*n)),
        Term::Atom(name) | Term::String(name) => Ok(Node::Text(name.clone())),
        Term::Compound { name, args } => decode_compound(name, args, term, depth + 1),
        Term::Var(_) => Err(unsupported(term)),
    }
}

fn decode_compound(name: &str, args: &[Term], term: &Term, depth: usize) -> Decoded {
    let child = |term: &Term| decode(term, depth);

    match (name, args) {
        ("throw" | "error", [inner]) => child(inner),
        ("error", [cause, context]) => Ok(merge(child(cause)?, child(context)?)),
        ("syntax_error", [what]) => Ok(Node::Record(Record {
            kind: Some(DiagnosticKind::SyntaxError),
            message: Some(format!("Syntax error: {}", render(&child(what)?)?)),
            ..Record::default()
        })),
        ("existence_error", [what, which]) => Ok(Node::Record(Record {
            kind: Some(DiagnosticKind::ExistenceError),
            message: Some(format!(
                "Existence error: {} {} not found",
                render(&child(what)?)?,
                render(&child(which)?)?
            )),
            ..Record::default()
        })),
        ("line", [n]) => Ok(Node::Record(Record {
            line: Some(integer(child(n)?, "line")?),
            ..Record::default()
        })),
        ("column", [n]) => Ok(Node::Record(Record {
            column: Some(integer(child(n)?, "column")?),
            ..Record::default()
        })),
        ("found", [token]) => Ok(Node::Record(Record {
            found: Some(render(&child(token)?)?),
            ..Record::default()
        })),
        (".", [_, _]) => decode_list(term, depth),
        ("/", [left, right]) => Ok(Node::Text(format!(
            "{}/{}",
            render(&child(left)?)?,
            render(&child(right)?)?
        ))),
        _ => Err(unsupported(term)),
    }
}

/// Walks the `'.'/2` chain in place; items decode one level below the list.
fn decode_list(list: &Term, depth: usize) -> Decoded {
    let mut items = Vec::new();
    let mut cursor = list;
    loop {
        match cursor {
            Term::Compound { name, args } if name == "." && args.len() == 2 => {
                items.push(decode(&args[0], depth)?);
                cursor = &args[1];
            }
            Term::Atom(end) | Term::String(end) if end == crate::term::EMPTY_LIST => {
                return Ok(Node::List(items));
            }
            _ => return Err(DecodeFailure(format!("improper list in {}", list))),
        }
    }
}

/// Combines the cause of an `error/2` with its context.
///
/// Records merge field by field; a list of records (the usual position
/// context) merges element by element. When either side is a plain value
/// the cause is kept as it is.
fn merge(cause: Node, context: Node) -> Node {
    match (cause, context) {
        (Node::Record(cause), Node::Record(context)) => Node::Record(cause.merge(context)),
        (Node::Record(cause), Node::List(items)) => Node::Record(
            items
                .into_iter()
                .fold(cause, |merged, item| match item {
                    Node::Record(record) => merged.merge(record),
                    _ => merged,
                }),
        ),
        (cause, _) => cause,
    }
}

fn integer(node: Node, field: &str) -> Result<i64, DecodeFailure> {
    match node {
        Node::Integer(n) => Ok(n),
        other => Err(DecodeFailure(format!(
            "{} must be an integer, got {}",
            field,
            render(&other)?
        ))),
    }
}

/// Textual form of a node, for interpolation into messages.
fn render(node: &Node) -> Result<String, DecodeFailure> {
    match node {
        Node::Integer(n) => Ok(n.to_string()),
        Node::Float(n) => Ok(format!("{:?}", n)),
        Node::Text(text) => Ok(text.clone()),
        Node::List(items) => {
            let rendered: Result<Vec<String>, DecodeFailure> = items.iter().map(render).collect();
            Ok(rendered?.join(","))
        }
        Node::Record(record) => match &record.message {
            Some(message) => Ok(message.clone()),
            None => Err(DecodeFailure(
                "cannot use a position detail as a value".to_string(),
            )),
        },
    }
}

fn unsupported(term: &Term) -> DecodeFailure {
    let (name, arity) = term.indicator();
    DecodeFailure(format!("unsupported node {}/{}", name, arity))
}
