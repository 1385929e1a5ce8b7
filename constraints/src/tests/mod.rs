use crate::project::{DependencyType, Descriptor, Ident, Manifest, Project, Workspace};



// Session tests
mod session;

// Project model tests
mod project;

/// Builds a workspace by hand, the way a loaded manifest would describe it.
pub(crate) fn workspace(
    relative_cwd: &str,
    name: &str,
    version: Option<&str>,
    dependencies: &[(DependencyType, &str, &str)],
) -> Workspace {
    let mut manifest = Manifest {
        name: Some(Ident::parse(name).unwrap()),
        version: version.map(str::to_string),
        ..Manifest::default()
    };
    for (dependency_type, ident, range) in dependencies {
        let descriptor = Descriptor::new(Ident::parse(ident).unwrap(), *range);
        match dependency_type {
            DependencyType::Dependencies => manifest.dependencies.push(descriptor),
            DependencyType::DevDependencies => manifest.dev_dependencies.push(descriptor),
            DependencyType::PeerDependencies => manifest.peer_dependencies.push(descriptor),
        }
    }
    Workspace::new(std::path::Path::new("/repo"), relative_cwd, manifest)
}

pub(crate) fn project(workspaces: Vec<Workspace>) -> Project {
    Project::new("/repo", workspaces)
}
