//! Compares what the rules assert against what the manifests declare

use crate::constraints::EvaluationResult;
use crate::project::{DependencyType, Ident, Workspace};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Violation<'p> {
    MissingDependency {
        workspace: &'p Workspace,
        ident: Ident,
        dependency_type: DependencyType,
        expected_range: String,
    },
    RangeMismatch {
        workspace: &'p Workspace,
        ident: Ident,
        dependency_type: DependencyType,
        expected_range: String,
        actual_range: String,
    },
    ExtraneousDependency {
        workspace: &'p Workspace,
        ident: Ident,
        dependency_type: DependencyType,
    },
    ConflictingRanges {
        workspace: &'p Workspace,
        ident: Ident,
        dependency_type: DependencyType,
        ranges: Vec<Option<String>>,
    },
    InvalidDependency {
        workspace: &'p Workspace,
        ident: Ident,
        dependency_type: DependencyType,
        reason: Option<String>,
    },
    FieldMismatch {
        workspace: &'p Workspace,
        field_path: String,
        expected: Option<Value>,
        actual: Option<Value>,
    },
    ConflictingFieldValues {
        workspace: &'p Workspace,
        field_path: String,
        values: Vec<Option<String>>,
    },
}

impl Violation<'_> {
    pub fn workspace(&self) -> &Workspace {
        match self {
            Violation::MissingDependency { workspace, .. }
            | Violation::RangeMismatch { workspace, .. }
            | Violation::ExtraneousDependency { workspace, .. }
            | Violation::ConflictingRanges { workspace, .. }
            | Violation::InvalidDependency { workspace, .. }
            | Violation::FieldMismatch { workspace, .. }
            | Violation::ConflictingFieldValues { workspace, .. } => *workspace,
        }
    }
}

impl fmt::Display for Violation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.workspace().ident)?;
        match self {
            Violation::MissingDependency {
                ident,
                dependency_type,
                expected_range,
                ..
            } => write!(
                f,
                "must depend on {} via {} in {}, but doesn't",
                ident, expected_range, dependency_type
            ),
            Violation::RangeMismatch {
                ident,
                dependency_type,
                expected_range,
                actual_range,
                ..
            } => write!(
                f,
                "must depend on {} via {} in {}, but uses {} instead",
                ident, expected_range, dependency_type, actual_range
            ),
            Violation::ExtraneousDependency {
                ident,
                dependency_type,
                ..
            } => write!(
                f,
                "has an extraneous dependency on {} in {}",
                ident, dependency_type
            ),
            Violation::ConflictingRanges {
                ident,
                dependency_type,
                ranges,
                ..
            } => write!(
                f,
                "conflicting ranges for {} in {}: {}",
                ident,
                dependency_type,
                join_candidates(ranges)
            ),
            Violation::InvalidDependency {
                ident,
                dependency_type,
                reason,
                ..
            } => write!(
                f,
                "invalid dependency {} in {}: {}",
                ident,
                dependency_type,
                reason.as_deref().unwrap_or("no reason given")
            ),
            Violation::FieldMismatch {
                field_path,
                expected: Some(expected),
                actual,
                ..
            } => write!(
                f,
                "must have field {} set to {}, but has {}",
                field_path,
                expected,
                actual
                    .as_ref()
                    .map_or_else(|| "nothing".to_string(), Value::to_string)
            ),
            Violation::FieldMismatch {
                field_path,
                expected: None,
                actual,
                ..
            } => write!(
                f,
                "must not have field {}, but has {}",
                field_path,
                actual
                    .as_ref()
                    .map_or_else(|| "nothing".to_string(), Value::to_string)
            ),
            Violation::ConflictingFieldValues {
                field_path, values, ..
            } => write!(
                f,
                "conflicting values for field {}: {}",
                field_path,
                join_candidates(values)
            ),
        }
    }
}

fn join_candidates(candidates: &[Option<String>]) -> String {
    candidates
        .iter()
        .map(|candidate| candidate.as_deref().unwrap_or("<absent>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field values are JSON when they parse as JSON (`true`, `1`, `{"a":1}`),
/// plain strings otherwise.
pub fn expected_field_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Groups rows by key, keeping first-seen order, and collects their distinct values.
fn group_distinct<'r, K, R>(
    rows: impl IntoIterator<Item = &'r R>,
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> Option<String>,
) -> Vec<(&'r R, Vec<Option<String>>)>
where
    K: std::hash::Hash + Eq,
    R: 'r,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(&'r R, Vec<Option<String>>)> = Vec::new();

    for row in rows {
        let slot = *index.entry(key(row)).or_insert_with(|| {
            groups.push((row, Vec::new()));
            groups.len() - 1
        });
        let candidate = value(row);
        if !groups[slot].1.contains(&candidate) {
            groups[slot].1.push(candidate);
        }
    }

    groups
}

/// Lists every place where the manifests disagree with the rules.
pub fn check<'p>(result: &EvaluationResult<'p>) -> Vec<Violation<'p>> {
    let mut violations = Vec::new();

    let dependency_groups = group_distinct(
        &result.enforced_dependencies,
        |row| {
            (
                row.workspace.relative_cwd.clone(),
                row.dependency_ident.clone(),
                row.dependency_type,
            )
        },
        |row| row.dependency_range.clone(),
    );

    for (row, ranges) in dependency_groups {
        let workspace = row.workspace;
        let ident = row.dependency_ident.clone();
        let dependency_type = row.dependency_type;
        let declared = workspace.manifest.get_dependency(dependency_type, &ident);

        if ranges.len() > 1 {
            violations.push(Violation::ConflictingRanges {
                workspace,
                ident,
                dependency_type,
                ranges,
            });
            continue;
        }

        match (ranges.into_iter().next().flatten(), declared) {
            (None, Some(_)) => violations.push(Violation::ExtraneousDependency {
                workspace,
                ident,
                dependency_type,
            }),
            (Some(expected_range), None) => violations.push(Violation::MissingDependency {
                workspace,
                ident,
                dependency_type,
                expected_range,
            }),
            (Some(expected_range), Some(descriptor)) if descriptor.range != expected_range => {
                violations.push(Violation::RangeMismatch {
                    workspace,
                    ident,
                    dependency_type,
                    expected_range,
                    actual_range: descriptor.range.clone(),
                })
            }
            _ => {}
        }
    }

    for row in &result.invalid_dependencies {
        let declared = row
            .workspace
            .manifest
            .get_dependency(row.dependency_type, &row.dependency_ident);
        if declared.is_some() {
            violations.push(Violation::InvalidDependency {
                workspace: row.workspace,
                ident: row.dependency_ident.clone(),
                dependency_type: row.dependency_type,
                reason: row.reason.clone(),
            });
        }
    }

    let field_groups = group_distinct(
        &result.enforced_fields,
        |row| (row.workspace.relative_cwd.clone(), row.field_path.clone()),
        |row| row.field_value.clone(),
    );

    for (row, values) in field_groups {
        let workspace = row.workspace;
        if values.len() > 1 {
            violations.push(Violation::ConflictingFieldValues {
                workspace,
                field_path: row.field_path.clone(),
                values,
            });
            continue;
        }

        let expected = values
            .into_iter()
            .next()
            .flatten()
            .map(|value| expected_field_value(&value));
        let actual = workspace.manifest.field(&row.field_path).cloned();
        if expected != actual {
            violations.push(Violation::FieldMismatch {
                workspace,
                field_path: row.field_path.clone(),
                expected,
                actual,
            });
        }
    }

    violations
}
