use crate::{monorepo, write};
use assert_cmd::Command;
use predicates::prelude::*;

const RULES: &str = "gen_enforced_field(Cwd, 'license', 'MIT') :- workspace(Cwd).\n";

#[test]
fn test_cli_source_prints_rules() {
    let temp_dir = monorepo();
    write(temp_dir.path(), "constraints.pro", RULES);

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("source").arg("--dir").arg(temp_dir.path());

    cmd.assert().success().stdout(RULES);
}

#[test]
fn test_cli_source_verbose_prints_full_program() {
    let temp_dir = monorepo();
    write(temp_dir.path(), "constraints.pro", RULES);

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("source")
        .arg("--verbose")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("workspace('packages/util')."))
        .stdout(predicate::str::contains(RULES))
        .stdout(predicate::str::ends_with(
            "gen_enforced_field(_, _, _) :- false.\n",
        ));
}

#[test]
fn test_cli_source_custom_rules_path() {
    let temp_dir = monorepo();
    write(temp_dir.path(), "rules/deps.pro", RULES);

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("source")
        .arg("--rules")
        .arg("rules/deps.pro")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert().success().stdout(RULES);
}

#[test]
fn test_cli_source_without_rule_file_is_empty() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("source").arg("--dir").arg(temp_dir.path());

    cmd.assert().success().stdout("");
}
