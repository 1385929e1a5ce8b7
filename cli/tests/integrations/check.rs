use crate::monorepo;
#[cfg(feature = "scryer")]
use crate::write;
use assert_cmd::Command;
use predicates::prelude::*;

#[cfg(not(feature = "scryer"))]
#[test]
fn test_cli_check_requires_engine_feature() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Recompile with: cargo build --features scryer",
        ));
}

#[cfg(feature = "scryer")]
#[test]
fn test_cli_check_reports_violations() {
    let temp_dir = monorepo();
    write(
        temp_dir.path(),
        "constraints.pro",
        "gen_enforced_dependency(Cwd, 'left-pad', '^2.0.0', dependencies) :-\n    workspace_has_dependency(Cwd, 'left-pad', _, dependencies).\n",
    );

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "@acme/app: must depend on left-pad via ^2.0.0 in dependencies, but uses ^1.3.0 instead",
        ))
        .stderr(predicate::str::contains("1 violation found"));
}

#[cfg(feature = "scryer")]
#[test]
fn test_cli_check_passes_when_rules_hold() {
    let temp_dir = monorepo();
    write(
        temp_dir.path(),
        "constraints.pro",
        "gen_enforced_dependency(Cwd, 'left-pad', '^1.3.0', dependencies) :-\n    workspace_ident(Cwd, '@acme/app').\n",
    );

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No constraint violations"));
}

#[cfg(feature = "scryer")]
#[test]
fn test_cli_check_without_rule_file() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No constraint violations"));
}

#[cfg(feature = "scryer")]
#[test]
fn test_cli_check_malformed_rules() {
    let temp_dir = monorepo();
    write(
        temp_dir.path(),
        "constraints.pro",
        "gen_enforced_field(Cwd, 'license' :- workspace(Cwd).\n",
    );

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Syntax error"));
}

#[cfg(feature = "scryer")]
#[test]
fn test_cli_check_undefined_predicate() {
    let temp_dir = monorepo();
    write(
        temp_dir.path(),
        "constraints.pro",
        "gen_enforced_field(Cwd, 'license', 'MIT') :- not_defined(Cwd).\n",
    );

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("check").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Existence error"))
        .stderr(predicate::str::contains("not_defined/1"));
}
