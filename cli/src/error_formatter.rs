use ariadne::{Color, Label, Report, ReportKind, Source};
use constraints::{ConstraintsError, Diagnostic, ProjectError};
use std::fs;
use std::path::Path;

/// Format a ConstraintsError for the terminal
pub fn format_error(error: &ConstraintsError) -> String {
    match error {
        ConstraintsError::Project(err) => format_project_error(err),
        ConstraintsError::Engine(diagnostic) => {
            format!("Engine error ({}): {}", diagnostic.kind, diagnostic.message)
        }
        ConstraintsError::InvalidRule(msg) => format!("Invalid rule: {}", msg),
        ConstraintsError::Io { path, source } => {
            format!("Failed to read rules from {}: {}", path, source)
        }
        ConstraintsError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
    }
}

/// Format a ProjectError, pointing into the manifest with Ariadne when it is malformed JSON
pub fn format_project_error(error: &ProjectError) -> String {
    match error {
        ProjectError::ManifestParse { path, source } => {
            format_manifest_error(path, source).unwrap_or_else(|| format!("Error: {}", error))
        }
        _ => format!("Error: {}", error),
    }
}

fn format_manifest_error(path: &Path, error: &serde_json::Error) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let source_id = path.display().to_string();
    let offset = offset_of(&text, error.line(), error.column());
    let end = (offset + 1).min(text.chars().count());

    let mut output = Vec::new();
    Report::build(ReportKind::Error, &source_id, offset)
        .with_message(format!("Invalid manifest {}", source_id))
        .with_label(
            Label::new((&source_id, offset..end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write((&source_id, Source::from(text.as_str())), &mut output)
        .ok()?;

    Some(String::from_utf8_lossy(&output).to_string())
}

/// Format an engine diagnostic, pointing into the consulted program when the
/// engine reported a position
#[cfg_attr(not(feature = "scryer"), allow(dead_code))]
pub fn format_diagnostic(diagnostic: &Diagnostic, source_id: &str, source: &str) -> String {
    let Some((line, column)) = diagnostic.position() else {
        return format!("Engine error ({}): {}", diagnostic.kind, diagnostic.message);
    };

    let offset = offset_of(source, line.max(1) as usize, column.max(1) as usize);
    let end = (offset + 1).min(source.chars().count());

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, source_id, offset)
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((source_id, offset..end))
                .with_message(diagnostic.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write((source_id, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => format!("Engine error ({}): {}", diagnostic.kind, diagnostic.message),
    }
}

/// Character offset of a 1-based line and column, clamped to the text
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let preceding: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(|line| line.chars().count())
        .sum();
    (preceding + column.saturating_sub(1)).min(text.chars().count())
}
