use crate::project::ProjectError;
use serde::Serialize;
use std::fmt;

/// What went wrong inside the logic engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    SyntaxError,
    ExistenceError,
    UnknownError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::SyntaxError => write!(f, "syntax error"),
            DiagnosticKind::ExistenceError => write!(f, "existence error"),
            DiagnosticKind::UnknownError => write!(f, "unknown error"),
        }
    }
}

/// An engine error term, translated into something a user can act on
///
/// When both `line` and `column` are known they are already part of `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            column: None,
            found: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnknownError, message)
    }

    /// Line and column, if the engine reported both
    pub fn position(&self) -> Option<(i64, i64)> {
        self.line.zip(self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Error types for constraint evaluation
#[derive(Debug)]
pub enum ConstraintsError {
    /// The logic engine rejected the program or a query, or threw while answering
    Engine(Diagnostic),

    /// A rule produced a solution that cannot be attributed to a workspace or dependency
    InvalidRule(String),

    /// The project model could not answer a lookup
    Project(ProjectError),

    /// Rule file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },

    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },
}

impl ConstraintsError {
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule(message.into())
    }

    /// The engine diagnostic, if this error came from the engine
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ConstraintsError::Engine(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintsError::Engine(diagnostic) => write!(f, "{}", diagnostic),
            ConstraintsError::InvalidRule(msg) => write!(f, "Invalid rule: {}", msg),
            ConstraintsError::Project(err) => write!(f, "Project error: {}", err),
            ConstraintsError::Io { path, source } => {
                write!(f, "Failed to read rules from {}: {}", path, source)
            }
            ConstraintsError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                limit_name, limit_value, actual_value, suggestion
            ),
        }
    }
}

impl std::error::Error for ConstraintsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConstraintsError::Engine(diagnostic) => Some(diagnostic),
            ConstraintsError::Project(err) => Some(err),
            ConstraintsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<Diagnostic> for ConstraintsError {
    fn from(diagnostic: Diagnostic) -> Self {
        ConstraintsError::Engine(diagnostic)
    }
}

impl From<ProjectError> for ConstraintsError {
    fn from(err: ProjectError) -> Self {
        ConstraintsError::Project(err)
    }
}
