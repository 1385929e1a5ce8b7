use crate::{monorepo, write};
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_facts_lists_workspaces_and_dependencies() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("facts").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("dependency_type(dependencies)."))
        .stdout(predicate::str::contains("workspace('.')."))
        .stdout(predicate::str::contains("workspace_version('.', [])."))
        .stdout(predicate::str::contains(
            "workspace_ident('packages/app', '@acme/app').",
        ))
        .stdout(predicate::str::contains(
            "workspace_has_dependency('packages/app', 'left-pad', '^1.3.0', dependencies).",
        ))
        .stdout(predicate::str::contains(
            "workspace_has_dependency('packages/app', 'typescript', '^5.0.0', devDependencies).",
        ))
        .stdout(predicate::str::ends_with(
            "workspace_has_dependency(_, _, _, _) :- false.\n",
        ));
}

#[test]
fn test_cli_facts_without_manifest() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("facts").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_cli_facts_malformed_manifest_points_at_error() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "package.json", "{\n  \"name\": \"broken\",\n}\n");

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("facts").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest"));
}
