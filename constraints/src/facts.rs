//! Renders the project into the fact database rules are evaluated against
//!
//! Rendering is pure and deterministic: the same project always produces the
//! same text, workspace by workspace, dependency type by dependency type.

use crate::project::{DependencyType, Project};
use crate::term::EMPTY_LIST;
use std::fmt::Write;

/// Always-false clauses so that querying a predicate without facts fails
/// quietly instead of raising an existence error.
const FACT_FALLBACKS: &str = "\
workspace(_) :- false.
workspace_ident(_, _) :- false.
workspace_version(_, _) :- false.
workspace_has_dependency(_, _, _, _) :- false.
";

/// Placeholders for the generators rules may define. They come last in the
/// program so that user clauses are always tried first.
const DECLARATIONS: &str = "\
gen_enforced_dependency(_, _, _, _) :- false.
gen_invalid_dependency(_, _, _, _) :- false.
gen_enforced_field(_, _, _) :- false.
";

/// Quotes a value for the generated program; a missing value becomes `[]`.
///
/// Embedded quotes are doubled and backslashes escaped, so paths and
/// versions cannot terminate the atom early.
pub fn escape(value: Option<&str>) -> String {
    match value {
        None => EMPTY_LIST.to_string(),
        Some(value) => {
            let mut quoted = String::with_capacity(value.len() + 2);
            quoted.push('\'');
            for c in value.chars() {
                match c {
                    '\'' => quoted.push_str("''"),
                    '\\' => quoted.push_str("\\\\"),
                    c => quoted.push(c),
                }
            }
            quoted.push('\'');
            quoted
        }
    }
}

pub fn project_database(project: &Project) -> String {
    let mut database = String::new();

    for dependency_type in DependencyType::ALL {
        let _ = writeln!(database, "dependency_type({}).", dependency_type);
    }
    database.push('\n');

    for workspace in &project.workspaces {
        let cwd = escape(Some(&workspace.relative_cwd));
        let _ = writeln!(database, "workspace({}).", cwd);
        let _ = writeln!(
            database,
            "workspace_ident({}, {}).",
            cwd,
            escape(Some(&workspace.ident.to_string()))
        );
        let _ = writeln!(
            database,
            "workspace_version({}, {}).",
            cwd,
            escape(workspace.version())
        );

        for dependency_type in DependencyType::ALL {
            for dependency in workspace.manifest.dependencies_of(dependency_type) {
                let _ = writeln!(
                    database,
                    "workspace_has_dependency({}, {}, {}, {}).",
                    cwd,
                    escape(Some(&dependency.ident.to_string())),
                    escape(Some(&dependency.range)),
                    dependency_type
                );
            }
        }
        database.push('\n');
    }

    database.push_str(FACT_FALLBACKS);
    database
}

pub fn declarations() -> &'static str {
    DECLARATIONS
}

/// Facts, then the user's rules, then the declarations. The order decides
/// which clauses the engine tries first.
pub fn full_source(project: &Project, rules: &str) -> String {
    format!("{}\n{}\n{}", project_database(project), rules, declarations())
}
