//! Read-only model of a multi-package project
//!
//! The engine only ever reads this model: it renders it into facts and looks
//! workspaces back up when rules name them. [`Project::load`] builds it from
//! `package.json` manifests on disk.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "package.json";

/// Errors raised while building or querying the project model
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("invalid package ident: '{0}'")]
    InvalidIdent(String),

    #[error("unsupported workspace pattern: '{0}'")]
    UnsupportedPattern(String),

    #[error("workspace not found ({})", .0.display())]
    WorkspaceNotFound(PathBuf),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// A package name, optionally scoped (`@scope/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident {
    pub scope: Option<String>,
    pub name: String,
}

impl Ident {
    pub fn new(scope: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.map(str::to_string),
            name: name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ProjectError> {
        let invalid = || ProjectError::InvalidIdent(input.to_string());

        let (scope, name) = match input.strip_prefix('@') {
            Some(scoped) => {
                let (scope, name) = scoped.split_once('/').ok_or_else(invalid)?;
                if scope.is_empty() {
                    return Err(invalid());
                }
                (Some(scope), name)
            }
            None => (None, input),
        };

        if name.is_empty() || name.contains('/') || name.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self::new(scope, name))
    }
}

impl FromStr for Ident {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Dependency categories, in the order their facts are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    Dependencies,
    DevDependencies,
    PeerDependencies,
}

impl DependencyType {
    pub const ALL: [DependencyType; 3] = [
        DependencyType::Dependencies,
        DependencyType::DevDependencies,
        DependencyType::PeerDependencies,
    ];

    /// Manifest key, which doubles as the atom used in facts
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Dependencies => "dependencies",
            DependencyType::DevDependencies => "devDependencies",
            DependencyType::PeerDependencies => "peerDependencies",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown dependency type '{}'", s))
    }
}

/// A dependency entry: which package, and which range of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub ident: Ident,
    pub range: String,
}

impl Descriptor {
    pub fn new(ident: Ident, range: impl Into<String>) -> Self {
        Self {
            ident,
            range: range.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    pub name: Option<Ident>,
    pub version: Option<String>,
    pub dependencies: Vec<Descriptor>,
    pub dev_dependencies: Vec<Descriptor>,
    pub peer_dependencies: Vec<Descriptor>,
    /// The manifest as written, used to check enforced fields
    #[serde(skip)]
    pub raw: Value,
}

impl Manifest {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ProjectError> {
        let raw: Value = serde_json::from_str(text).map_err(|source| ProjectError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        let invalid = |message: String| ProjectError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        };

        let object = raw
            .as_object()
            .ok_or_else(|| invalid("top-level value must be an object".to_string()))?;

        let name = match object.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(Ident::parse(name)?),
            Some(_) => return Err(invalid("'name' must be a string".to_string())),
        };

        let version = match object.get("version") {
            None | Some(Value::Null) => None,
            Some(Value::String(version)) => Some(version.clone()),
            Some(_) => return Err(invalid("'version' must be a string".to_string())),
        };

        let mut manifest = Manifest {
            name,
            version,
            ..Manifest::default()
        };

        for dependency_type in DependencyType::ALL {
            let key = dependency_type.as_str();
            let entries = match object.get(key) {
                None | Some(Value::Null) => continue,
                Some(Value::Object(entries)) => entries,
                Some(_) => return Err(invalid(format!("'{}' must be an object", key))),
            };

            let descriptors = manifest.dependencies_mut(dependency_type);
            for (name, range) in entries {
                let range = range
                    .as_str()
                    .ok_or_else(|| {
                        invalid(format!("range of '{}' in '{}' must be a string", name, key))
                    })?;
                descriptors.push(Descriptor::new(Ident::parse(name)?, range));
            }
        }

        manifest.raw = raw;
        Ok(manifest)
    }

    pub fn dependencies_of(&self, dependency_type: DependencyType) -> &[Descriptor] {
        match dependency_type {
            DependencyType::Dependencies => &self.dependencies,
            DependencyType::DevDependencies => &self.dev_dependencies,
            DependencyType::PeerDependencies => &self.peer_dependencies,
        }
    }

    fn dependencies_mut(&mut self, dependency_type: DependencyType) -> &mut Vec<Descriptor> {
        match dependency_type {
            DependencyType::Dependencies => &mut self.dependencies,
            DependencyType::DevDependencies => &mut self.dev_dependencies,
            DependencyType::PeerDependencies => &mut self.peer_dependencies,
        }
    }

    pub fn get_dependency(
        &self,
        dependency_type: DependencyType,
        ident: &Ident,
    ) -> Option<&Descriptor> {
        self.dependencies_of(dependency_type)
            .iter()
            .find(|descriptor| &descriptor.ident == ident)
    }

    /// Looks up a dot-separated field path (`publishConfig.access`) in the raw manifest.
    pub fn field(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.raw, |value, segment| value.get(segment))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Workspace {
    /// Absolute (or project-relative, if the project root is) location
    #[serde(skip)]
    pub cwd: PathBuf,
    /// Location relative to the project root, `.` for the root workspace
    pub relative_cwd: String,
    pub ident: Ident,
    pub manifest: Manifest,
}

impl Workspace {
    pub fn new(project_cwd: &Path, relative_cwd: &str, manifest: Manifest) -> Self {
        let cwd = normalize_path(&project_cwd.join(relative_cwd));
        let relative_cwd = portable_relative(relative_cwd);

        let ident = manifest.name.clone().unwrap_or_else(|| {
            let fallback = cwd
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .filter(|name| Ident::parse(name).is_ok())
                .unwrap_or_else(|| "root-workspace".to_string());
            Ident::new(None, fallback)
        });

        Self {
            cwd,
            relative_cwd,
            ident,
            manifest,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    #[serde(skip)]
    pub cwd: PathBuf,
    pub workspaces: Vec<Workspace>,
}

impl Project {
    pub fn new(cwd: impl AsRef<Path>, workspaces: Vec<Workspace>) -> Self {
        Self {
            cwd: normalize_path(cwd.as_ref()),
            workspaces,
        }
    }

    /// Loads the root manifest and every workspace its `workspaces` field lists.
    ///
    /// Patterns are either exact directories (`tools/cli`) or a single-level
    /// wildcard (`packages/*`). Directories without a manifest are skipped.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref();
        let root_manifest = read_manifest(&root.join(MANIFEST_FILE))?;
        let patterns = workspace_patterns(&root_manifest.raw);

        let mut workspaces = vec![Workspace::new(root, ".", root_manifest)];
        for pattern in patterns {
            for relative_cwd in expand_pattern(root, &pattern)? {
                if workspaces.iter().any(|w| w.relative_cwd == relative_cwd) {
                    continue;
                }
                let manifest = read_manifest(&root.join(&relative_cwd).join(MANIFEST_FILE))?;
                workspaces.push(Workspace::new(root, &relative_cwd, manifest));
            }
        }

        debug!(
            root = %root.display(),
            workspaces = workspaces.len(),
            "loaded project"
        );
        Ok(Self::new(root, workspaces))
    }

    pub fn workspace_by_cwd(&self, cwd: &Path) -> Result<&Workspace, ProjectError> {
        let cwd = normalize_path(cwd);
        self.workspaces
            .iter()
            .find(|workspace| workspace.cwd == cwd)
            .ok_or(ProjectError::WorkspaceNotFound(cwd))
    }

    /// Resolves a path the way rules write it: relative to the project root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        normalize_path(&self.cwd.join(relative))
    }
}

fn read_manifest(path: &Path) -> Result<Manifest, ProjectError> {
    let text = fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Manifest::from_json(&text, path)
}

fn workspace_patterns(raw: &Value) -> Vec<String> {
    let list = match raw.get("workspaces") {
        Some(Value::Array(list)) => list,
        Some(Value::Object(object)) => match object.get("packages") {
            Some(Value::Array(list)) => list,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    list.iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn expand_pattern(root: &Path, pattern: &str) -> Result<Vec<String>, ProjectError> {
    let trimmed = pattern.trim_start_matches("./").trim_end_matches('/');

    let (base, wildcard) = match trimmed.strip_suffix("/*") {
        Some(base) => (base, true),
        None if trimmed == "*" => ("", true),
        None => (trimmed, false),
    };

    if base.contains(['*', '?', '[', '{', '!']) {
        return Err(ProjectError::UnsupportedPattern(pattern.to_string()));
    }

    if !wildcard {
        if root.join(base).join(MANIFEST_FILE).is_file() {
            return Ok(vec![base.to_string()]);
        }
        warn!(pattern, "workspace pattern matches no manifest");
        return Ok(Vec::new());
    }

    let dir = root.join(base);
    if !dir.is_dir() {
        warn!(pattern, "workspace pattern base is not a directory");
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() || !entry.path().join(MANIFEST_FILE).is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if base.is_empty() {
            matches.push(name.into_owned());
        } else {
            matches.push(format!("{}/{}", base, name));
        }
    }

    Ok(matches)
}

/// Lexically normalizes a path: drops `.` segments and folds `..` into its parent.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::ParentDir)
                );
                if at_parent {
                    normalized.push("..");
                } else {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

fn portable_relative(relative_cwd: &str) -> String {
    let normalized = normalize_path(Path::new(relative_cwd));
    let segments: Vec<String> = normalized
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.join("/")
}
