use std::fmt;

/// A term as produced by the logic engine: answer bindings and thrown errors
/// both come back in this shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Integer(i64),
    Float(f64),
    Atom(String),
    String(String),
    Var(String),
    Compound { name: String, args: Vec<Term> },
}

/// Binary operators rendered infix, the way the engine writes them back.
const INFIX_OPERATORS: &[&str] = &[
    "-", "+", "*", "/", "//", ":", "=", "==", "\\=", "@", "^", "->", ":-", ";", ",", "<", ">",
    "=<", ">=", "is", "mod", "rem", "xor",
];

/// The atom the engine uses for the empty list, and for "no value".
pub const EMPTY_LIST: &str = "[]";

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn compound(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Compound {
            name: name.into(),
            args,
        }
    }

    pub fn empty_list() -> Self {
        Term::Atom(EMPTY_LIST.to_string())
    }

    /// Builds a proper list out of `'.'/2` cells, terminated by `[]`.
    pub fn list(items: Vec<Term>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Term::empty_list(), |tail, head| {
                Term::compound(".", vec![head, tail])
            })
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Term::Atom(name) if name == EMPTY_LIST)
    }

    /// Name and arity, e.g. `("error", 2)`. Leaves report an arity of zero.
    pub fn indicator(&self) -> (&str, usize) {
        match self {
            Term::Compound { name, args } => (name.as_str(), args.len()),
            Term::Atom(name) | Term::String(name) | Term::Var(name) => (name.as_str(), 0),
            Term::Integer(_) | Term::Float(_) => ("", 0),
        }
    }

    /// Collects the items of a proper list, or `None` if this is not one.
    fn list_items(&self) -> Option<Vec<&Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Term::Compound { name, args } if name == "." && args.len() == 2 => {
                    items.push(&args[0]);
                    cursor = &args[1];
                }
                other if other.is_empty_list() => return Some(items),
                _ => return None,
            }
        }
    }
}

/// Nesting beyond this depth is printed as `...`.
const MAX_DISPLAY_DEPTH: usize = 64;

impl Term {
    fn write_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if depth > MAX_DISPLAY_DEPTH {
            return write!(f, "...");
        }

        match self {
            Term::Integer(n) => write!(f, "{}", n),
            Term::Float(n) => write!(f, "{:?}", n),
            Term::Atom(name) | Term::String(name) | Term::Var(name) => write!(f, "{}", name),
            Term::Compound { name, args } => {
                if name == "." && args.len() == 2 {
                    if let Some(items) = self.list_items() {
                        write!(f, "[")?;
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                write!(f, ",")?;
                            }
                            item.write_nested(f, depth + 1)?;
                        }
                        return write!(f, "]");
                    }
                }

                if args.len() == 2 && INFIX_OPERATORS.contains(&name.as_str()) {
                    let alphabetic = name.chars().all(|c| c.is_ascii_alphabetic());
                    args[0].write_nested(f, depth + 1)?;
                    if alphabetic {
                        write!(f, " {} ", name)?;
                    } else {
                        write!(f, "{}", name)?;
                    }
                    return args[1].write_nested(f, depth + 1);
                }

                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    arg.write_nested(f, depth + 1)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_nested(f, 0)
    }
}
