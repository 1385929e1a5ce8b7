use crate::config::ConstraintsConfig;
use crate::decode::{link, parse_link};
use crate::engine::{Bindings, ExecutionContext, LogicEngine};
use crate::facts;
use crate::project::{DependencyType, Ident, Project, Workspace};
use crate::session::{IntoAnswers, Session};
use crate::{ConstraintsError, ConstraintsResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info};

pub const ENFORCED_DEPENDENCY_QUERY: &str =
    "workspace(WorkspaceCwd), dependency_type(DependencyType), gen_enforced_dependency(WorkspaceCwd, DependencyIdent, DependencyRange, DependencyType).";

pub const INVALID_DEPENDENCY_QUERY: &str =
    "workspace(WorkspaceCwd), dependency_type(DependencyType), gen_invalid_dependency(WorkspaceCwd, DependencyIdent, DependencyType, Reason).";

pub const ENFORCED_FIELD_QUERY: &str =
    "workspace(WorkspaceCwd), gen_enforced_field(WorkspaceCwd, FieldPath, FieldValue).";

/// Variable name the engine uses for "don't care"; never reported.
const ANONYMOUS_VARIABLE: &str = "_";

/// `workspace` must (or, without a range, must not) depend on `dependency_ident`
#[derive(Debug, Clone, Serialize)]
pub struct EnforcedDependency<'p> {
    #[serde(serialize_with = "serialize_workspace")]
    pub workspace: &'p Workspace,
    pub dependency_ident: Ident,
    pub dependency_range: Option<String>,
    pub dependency_type: DependencyType,
}

/// `workspace` must not depend on `dependency_ident`, for `reason`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidDependency<'p> {
    #[serde(serialize_with = "serialize_workspace")]
    pub workspace: &'p Workspace,
    pub dependency_ident: Ident,
    pub dependency_type: DependencyType,
    pub reason: Option<String>,
}

/// The manifest field at `field_path` must hold `field_value` (or be absent)
#[derive(Debug, Clone, Serialize)]
pub struct EnforcedField<'p> {
    #[serde(serialize_with = "serialize_workspace")]
    pub workspace: &'p Workspace,
    pub field_path: String,
    pub field_value: Option<String>,
}

/// Everything the rules assert about a project, in a stable order
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationResult<'p> {
    pub enforced_dependencies: Vec<EnforcedDependency<'p>>,
    pub invalid_dependencies: Vec<InvalidDependency<'p>>,
    pub enforced_fields: Vec<EnforcedField<'p>>,
}

impl EvaluationResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.enforced_dependencies.is_empty()
            && self.invalid_dependencies.is_empty()
            && self.enforced_fields.is_empty()
    }
}

fn serialize_workspace<S: Serializer>(
    workspace: &&Workspace,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&workspace.relative_cwd)
}

/// Constraint rules bound to a project and a logic engine
///
/// Every [`Constraints::process`] and [`Constraints::query`] call renders the
/// program afresh and runs it in its own execution context.
pub struct Constraints<'p, E: LogicEngine> {
    project: &'p Project,
    source: String,
    engine: E,
}

impl<'p, E: LogicEngine> Constraints<'p, E> {
    pub fn new(project: &'p Project, source: impl Into<String>, engine: E) -> Self {
        Self {
            project,
            source: source.into(),
            engine,
        }
    }

    /// Reads the rule file named by `config`. A missing file means no rules.
    pub fn load(
        project: &'p Project,
        config: &ConstraintsConfig,
        engine: E,
    ) -> ConstraintsResult<Self> {
        let path = project.cwd.join(&config.rules_path);
        let io_error = |source: std::io::Error| ConstraintsError::Io {
            path: path.display().to_string(),
            source,
        };

        let source = match fs::metadata(&path) {
            Ok(metadata) => {
                let size = metadata.len();
                if size > config.max_rules_file_bytes as u64 {
                    return Err(ConstraintsError::ResourceLimitExceeded {
                        limit_name: "max_rules_file_bytes".to_string(),
                        limit_value: config.max_rules_file_bytes.to_string(),
                        actual_value: size.to_string(),
                        suggestion: format!(
                            "Reduce the size of {} to {} bytes or less",
                            config.rules_path, config.max_rules_file_bytes
                        ),
                    });
                }
                fs::read_to_string(&path).map_err(io_error)?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no rule file, evaluating without rules");
                String::new()
            }
            Err(err) => return Err(io_error(err)),
        };

        Ok(Self::new(project, source, engine))
    }

    pub fn project(&self) -> &'p Project {
        self.project
    }

    /// The user's rules, as written
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn project_database(&self) -> String {
        facts::project_database(self.project)
    }

    pub fn declarations(&self) -> &'static str {
        facts::declarations()
    }

    pub fn full_source(&self) -> String {
        facts::full_source(self.project, &self.source)
    }

    pub fn create_session(&self) -> ConstraintsResult<Session<E::Context>> {
        Ok(Session::start(&self.engine, &self.full_source())?)
    }

    /// Runs the three generator queries and collects their solutions.
    pub fn process(&self) -> ConstraintsResult<EvaluationResult<'p>> {
        let mut session = self.create_session()?;

        let mut enforced_dependencies = Vec::new();
        for answer in session.query(ENFORCED_DEPENDENCY_QUERY)? {
            let bindings = answer?;
            let predicate = "gen_enforced_dependency/4";
            enforced_dependencies.push(EnforcedDependency {
                workspace: self.workspace_of(&bindings, predicate)?,
                dependency_ident: Ident::parse(&required(
                    &bindings,
                    "DependencyIdent",
                    predicate,
                )?)?,
                dependency_range: link(&bindings, "DependencyRange"),
                dependency_type: dependency_type_of(&bindings, predicate)?,
            });
        }

        let mut invalid_dependencies = Vec::new();
        for answer in session.query(INVALID_DEPENDENCY_QUERY)? {
            let bindings = answer?;
            let predicate = "gen_invalid_dependency/4";
            invalid_dependencies.push(InvalidDependency {
                workspace: self.workspace_of(&bindings, predicate)?,
                dependency_ident: Ident::parse(&required(
                    &bindings,
                    "DependencyIdent",
                    predicate,
                )?)?,
                dependency_type: dependency_type_of(&bindings, predicate)?,
                reason: link(&bindings, "Reason"),
            });
        }

        let mut enforced_fields = Vec::new();
        for answer in session.query(ENFORCED_FIELD_QUERY)? {
            let bindings = answer?;
            let predicate = "gen_enforced_field/3";
            enforced_fields.push(EnforcedField {
                workspace: self.workspace_of(&bindings, predicate)?,
                field_path: required(&bindings, "FieldPath", predicate)?,
                field_value: link(&bindings, "FieldValue"),
            });
        }

        enforced_dependencies.sort_by_cached_key(|row| {
            (
                row.dependency_range.is_none(),
                row.workspace.ident.to_string(),
                row.dependency_ident.to_string(),
            )
        });
        invalid_dependencies.sort_by_cached_key(|row| {
            (
                row.workspace.ident.to_string(),
                row.dependency_ident.to_string(),
            )
        });
        enforced_fields.sort_by_cached_key(|row| {
            (row.workspace.ident.to_string(), row.field_path.clone())
        });

        info!(
            enforced_dependencies = enforced_dependencies.len(),
            invalid_dependencies = invalid_dependencies.len(),
            enforced_fields = enforced_fields.len(),
            "evaluated constraints"
        );

        Ok(EvaluationResult {
            enforced_dependencies,
            invalid_dependencies,
            enforced_fields,
        })
    }

    /// Runs an arbitrary query; solutions are decoded lazily, in engine order.
    pub fn query(&self, query: &str) -> ConstraintsResult<QueryResults<E::Context>> {
        let answers = self.create_session()?.into_answers(query)?;
        Ok(QueryResults { answers })
    }

    fn workspace_of(
        &self,
        bindings: &Bindings,
        predicate: &str,
    ) -> ConstraintsResult<&'p Workspace> {
        let project = self.project;
        let relative_cwd = required(bindings, "WorkspaceCwd", predicate)?;
        Ok(project.workspace_by_cwd(&project.resolve(&relative_cwd))?)
    }
}

fn required(bindings: &Bindings, variable: &str, predicate: &str) -> ConstraintsResult<String> {
    link(bindings, variable).ok_or_else(|| {
        ConstraintsError::invalid_rule(format!(
            "{} produced a solution without {}",
            predicate, variable
        ))
    })
}

fn dependency_type_of(bindings: &Bindings, predicate: &str) -> ConstraintsResult<DependencyType> {
    required(bindings, "DependencyType", predicate)?
        .parse::<DependencyType>()
        .map_err(|err| ConstraintsError::invalid_rule(format!("{}: {}", predicate, err)))
}

/// Decoded solutions of an ad hoc query
pub struct QueryResults<C: ExecutionContext> {
    answers: IntoAnswers<C>,
}

impl<C: ExecutionContext> Iterator for QueryResults<C> {
    type Item = ConstraintsResult<BTreeMap<String, Option<String>>>;

    fn next(&mut self) -> Option<Self::Item> {
        let bindings = match self.answers.next()? {
            Ok(bindings) => bindings,
            Err(diagnostic) => return Some(Err(diagnostic.into())),
        };

        Some(Ok(bindings
            .iter()
            .filter(|(name, _)| name.as_str() != ANONYMOUS_VARIABLE)
            .map(|(name, term)| (name.clone(), parse_link(term)))
            .collect()))
    }
}
