use crate::engine::Bindings;
use crate::term::Term;

/// Turns a bound answer variable into plain text.
///
/// The empty list is how "no value" comes back from rules, so it decodes to
/// `None`; every other term decodes to its textual form.
pub fn parse_link(term: &Term) -> Option<String> {
    if term.is_empty_list() {
        None
    } else {
        Some(term.to_string())
    }
}

/// Decodes the variable `name`; an unbound variable reads as `None`.
pub fn link(bindings: &Bindings, name: &str) -> Option<String> {
    bindings.get(name).and_then(parse_link)
}
