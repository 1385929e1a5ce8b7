//! # Constraints Engine
//!
//! **Dependency rules for multi-package projects**
//!
//! Rules such as "every workspace uses the same version of `typescript`" are
//! written as a logic program. The engine renders the project's workspaces
//! and dependencies into facts, runs the rules through a logic engine, and
//! collects what they assert in a stable order.
//!
//! ## Quick Start
//!
//! With the `scryer` feature, rules run on an embedded Scryer Prolog machine:
//!
//! ```rust,no_run
//! # #[cfg(feature = "scryer")]
//! # fn main() -> constraints::ConstraintsResult<()> {
//! use constraints::{Constraints, ConstraintsConfig, Project, ScryerEngine};
//!
//! let project = Project::load(".")?;
//! let config = ConstraintsConfig::default();
//! let constraints = Constraints::load(&project, &config, ScryerEngine::new())?;
//!
//! let result = constraints.process()?;
//! for violation in constraints::check(&result) {
//!     println!("{}", violation);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "scryer"))]
//! # fn main() {}
//! ```
//!
//! ## Core Concepts
//!
//! ### Facts
//! Every workspace contributes `workspace/1`, `workspace_ident/2`,
//! `workspace_version/2` and one `workspace_has_dependency/4` fact per
//! dependency. `dependency_type/1` enumerates the dependency categories.
//!
//! ### Generators
//! Rules define `gen_enforced_dependency/4`, `gen_invalid_dependency/4` and
//! `gen_enforced_field/3`. Generators a rule file leaves out simply have no
//! solutions.
//!
//! ### Engines
//! Parsing and resolution belong to the logic engine, plugged in through
//! [`LogicEngine`]. Engine errors come back as [`Diagnostic`]s. `ScryerEngine`
//! runs the rules for real; [`ReplayEngine`] answers from recorded solutions.

pub mod check;
pub mod config;
pub mod constraints;
pub mod decode;
pub mod engine;
pub mod error;
pub mod facts;
pub mod project;
pub mod replay;
#[cfg(feature = "scryer")]
pub mod scryer;
pub mod session;
pub mod term;
pub mod translate;

pub use check::{check, Violation};
pub use config::ConstraintsConfig;
pub use constraints::{
    Constraints, EnforcedDependency, EnforcedField, EvaluationResult, InvalidDependency,
    QueryResults,
};
pub use engine::{Answer, Bindings, ExecutionContext, LogicEngine};
pub use error::{ConstraintsError, Diagnostic, DiagnosticKind};
pub use project::{DependencyType, Descriptor, Ident, Manifest, Project, ProjectError, Workspace};
pub use replay::ReplayEngine;
#[cfg(feature = "scryer")]
pub use scryer::ScryerEngine;
pub use session::Session;
pub use term::Term;
pub use translate::translate;

/// Result type for constraint operations
pub type ConstraintsResult<T> = Result<T, ConstraintsError>;

#[cfg(test)]
mod tests;
