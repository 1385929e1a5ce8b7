mod check;
mod facts;
mod source;
mod workspaces;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Root manifest with two workspaces under `packages/`
pub fn monorepo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "package.json",
        r#"{ "name": "monorepo", "private": true, "workspaces": ["packages/*"] }"#,
    );
    write(
        root,
        "packages/app/package.json",
        r#"{
            "name": "@acme/app",
            "version": "1.2.0",
            "dependencies": { "left-pad": "^1.3.0" },
            "devDependencies": { "typescript": "^5.0.0" }
        }"#,
    );
    write(
        root,
        "packages/util/package.json",
        r#"{ "name": "util", "version": "0.1.0" }"#,
    );

    temp_dir
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
