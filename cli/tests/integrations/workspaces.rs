use crate::monorepo;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn test_cli_workspaces_table() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("workspaces").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("@acme/app"))
        .stdout(predicate::str::contains("packages/util"))
        .stdout(predicate::str::contains("1.2.0"))
        .stdout(predicate::str::contains("3 workspaces found"));
}

#[test]
fn test_cli_workspaces_json() {
    let temp_dir = monorepo();

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    let output = cmd
        .arg("workspaces")
        .arg("--json")
        .arg("--dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let workspaces: Value = serde_json::from_slice(&output.stdout).unwrap();
    let cwds: Vec<&str> = workspaces
        .as_array()
        .unwrap()
        .iter()
        .map(|workspace| workspace["relative_cwd"].as_str().unwrap())
        .collect();
    assert_eq!(cwds, vec![".", "packages/app", "packages/util"]);
    assert_eq!(workspaces[1]["ident"], "@acme/app");
    assert_eq!(
        workspaces[1]["manifest"]["dependencies"][0]["range"],
        "^1.3.0"
    );
}

#[test]
fn test_cli_workspaces_unsupported_pattern() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    crate::write(
        temp_dir.path(),
        "package.json",
        r#"{ "workspaces": ["packages/**"] }"#,
    );

    let mut cmd = Command::cargo_bin("constraints").unwrap();
    cmd.arg("workspaces").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported workspace pattern"));
}
