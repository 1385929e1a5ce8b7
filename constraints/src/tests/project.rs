use super::{project, workspace};
use crate::project::{normalize_path, DependencyType, Ident, Manifest, ProjectError};
use std::path::{Path, PathBuf};

#[test]
fn test_parse_plain_ident() {
    let ident = Ident::parse("left-pad").unwrap();
    assert_eq!(ident.scope, None);
    assert_eq!(ident.name, "left-pad");
    assert_eq!(ident.to_string(), "left-pad");
}

#[test]
fn test_parse_scoped_ident() {
    let ident: Ident = "@types/node".parse().unwrap();
    assert_eq!(ident.scope.as_deref(), Some("types"));
    assert_eq!(ident.name, "node");
    assert_eq!(ident.to_string(), "@types/node");
}

#[test]
fn test_reject_malformed_idents() {
    for input in ["", "@types", "@/node", "a/b", "has space"] {
        assert!(
            matches!(Ident::parse(input), Err(ProjectError::InvalidIdent(_))),
            "accepted {:?}",
            input
        );
    }
}

#[test]
fn test_dependency_type_round_trips_through_its_name() {
    for dependency_type in DependencyType::ALL {
        assert_eq!(
            dependency_type.as_str().parse::<DependencyType>().unwrap(),
            dependency_type
        );
    }
    assert!("optionalDependencies".parse::<DependencyType>().is_err());
}

#[test]
fn test_normalize_path() {
    assert_eq!(
        normalize_path(Path::new("/repo/./packages/a")),
        PathBuf::from("/repo/packages/a")
    );
    assert_eq!(
        normalize_path(Path::new("/repo/packages/../tools")),
        PathBuf::from("/repo/tools")
    );
    assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
}

#[test]
fn test_workspace_by_cwd() {
    let project = project(vec![
        workspace(".", "root", None, &[]),
        workspace("packages/a", "a", Some("1.0.0"), &[]),
    ]);

    let found = project.workspace_by_cwd(&project.resolve("packages/a")).unwrap();
    assert_eq!(found.ident.to_string(), "a");

    let root = project.workspace_by_cwd(&project.resolve(".")).unwrap();
    assert_eq!(root.relative_cwd, ".");

    let same = project.workspace_by_cwd(&project.resolve("./packages/b/../a")).unwrap();
    assert_eq!(same.relative_cwd, "packages/a");
}

#[test]
fn test_unknown_workspace_is_an_error() {
    let project = project(vec![workspace(".", "root", None, &[])]);

    match project.workspace_by_cwd(&project.resolve("packages/missing")) {
        Err(ProjectError::WorkspaceNotFound(path)) => {
            assert_eq!(path, PathBuf::from("/repo/packages/missing"));
        }
        other => panic!("Expected WorkspaceNotFound, got {:?}", other),
    }
}

#[test]
fn test_manifest_from_json() {
    let manifest = Manifest::from_json(
        r#"{
            "name": "@acme/app",
            "version": "2.1.0",
            "license": "MIT",
            "publishConfig": { "access": "public" },
            "dependencies": { "react": "^18.0.0", "left-pad": "^1.0.0" },
            "devDependencies": { "typescript": "^5.0.0" }
        }"#,
        Path::new("package.json"),
    )
    .unwrap();

    assert_eq!(manifest.name.as_ref().unwrap().to_string(), "@acme/app");
    assert_eq!(manifest.version.as_deref(), Some("2.1.0"));
    assert_eq!(manifest.dependencies.len(), 2);
    assert_eq!(manifest.dev_dependencies[0].range, "^5.0.0");
    assert!(manifest.peer_dependencies.is_empty());

    let react = Ident::parse("react").unwrap();
    assert!(manifest
        .get_dependency(DependencyType::Dependencies, &react)
        .is_some());
    assert!(manifest
        .get_dependency(DependencyType::DevDependencies, &react)
        .is_none());

    assert_eq!(manifest.field("license").unwrap(), "MIT");
    assert_eq!(manifest.field("publishConfig.access").unwrap(), "public");
    assert!(manifest.field("publishConfig.registry").is_none());
}

#[test]
fn test_manifest_rejects_bad_shapes() {
    let path = Path::new("package.json");

    assert!(matches!(
        Manifest::from_json("{ not json", path),
        Err(ProjectError::ManifestParse { .. })
    ));
    assert!(matches!(
        Manifest::from_json("[]", path),
        Err(ProjectError::InvalidManifest { .. })
    ));
    assert!(matches!(
        Manifest::from_json(r#"{ "dependencies": { "a": 1 } }"#, path),
        Err(ProjectError::InvalidManifest { .. })
    ));
}

#[test]
fn test_workspace_without_name_uses_directory() {
    let manifest = Manifest::default();
    let workspace = crate::project::Workspace::new(Path::new("/repo"), "tools/cli", manifest);
    assert_eq!(workspace.ident.to_string(), "cli");
    assert_eq!(workspace.cwd, PathBuf::from("/repo/tools/cli"));
}
