mod error_formatter;
mod formatter;

use anyhow::Result;
use clap::{Parser, Subcommand};
use constraints::{Constraints, ConstraintsConfig, Project, ReplayEngine};
use formatter::Formatter;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "constraints")]
#[command(about = "Dependency rules for multi-package projects.")]
#[command(
    long_about = "Constraints are logic rules about the workspaces of a project and their dependencies.\nThe CLI checks a project against its rules and shows the facts, the program and the workspaces involved."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rule file (or, verbose, the whole program)
    ///
    /// With --verbose the output is exactly what the logic engine consults:
    /// project facts first, then the rules, then the generator declarations.
    Source {
        /// Project root containing package.json
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Rule file, relative to the project root
        #[arg(long, default_value = constraints::config::DEFAULT_RULES_PATH)]
        rules: String,
        /// Include the generated facts and declarations
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the facts generated for the project
    ///
    /// One block per workspace: workspace/1, workspace_ident/2,
    /// workspace_version/2 and workspace_has_dependency/4.
    Facts {
        /// Project root containing package.json
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Evaluate the rules and report every violation
    ///
    /// Requires the embedded Prolog engine (the `scryer` feature). Exits with
    /// status 1 when a workspace breaks a rule.
    Check {
        /// Project root containing package.json
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Rule file, relative to the project root
        #[arg(long, default_value = constraints::config::DEFAULT_RULES_PATH)]
        rules: String,
    },
    /// List the workspaces of the project
    Workspaces {
        /// Project root containing package.json
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "constraints=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Source {
            workdir,
            rules,
            verbose,
        } => source_command(workdir, rules, *verbose),
        Commands::Facts { workdir } => facts_command(workdir),
        Commands::Check { workdir, rules } => check_command(workdir, rules),
        Commands::Workspaces { workdir, json } => workspaces_command(workdir, *json),
    };

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<constraints::ConstraintsError>() {
            eprintln!("{}", error_formatter::format_error(err));
        } else if let Some(err) = e.downcast_ref::<constraints::ProjectError>() {
            eprintln!("{}", error_formatter::format_project_error(err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn source_command(workdir: &Path, rules: &str, verbose: bool) -> Result<()> {
    let project = load_project(workdir)?;
    let config = ConstraintsConfig::new().with_rules_path(rules);
    debug!(rules = %config.rules_path, verbose, "rendering source");

    // Rendering never consults the engine.
    let constraints = Constraints::load(&project, &config, ReplayEngine::new())?;

    if verbose {
        print!("{}", constraints.full_source());
    } else {
        print!("{}", constraints.source());
    }

    Ok(())
}

fn facts_command(workdir: &Path) -> Result<()> {
    let project = load_project(workdir)?;
    print!("{}", constraints::facts::project_database(&project));
    Ok(())
}

#[cfg(feature = "scryer")]
fn check_command(workdir: &Path, rules: &str) -> Result<()> {
    use constraints::{ConstraintsError, ScryerEngine};

    let project = load_project(workdir)?;
    let config = ConstraintsConfig::new().with_rules_path(rules);
    let constraints = Constraints::load(&project, &config, ScryerEngine::new())?;

    let result = match constraints.process() {
        Ok(result) => result,
        Err(ConstraintsError::Engine(diagnostic)) if diagnostic.position().is_some() => {
            let source = constraints.full_source();
            eprintln!(
                "{}",
                error_formatter::format_diagnostic(&diagnostic, &config.rules_path, &source)
            );
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    let violations = constraints::check(&result);
    if violations.is_empty() {
        println!("No constraint violations");
        return Ok(());
    }

    for violation in &violations {
        println!("{}", violation);
    }
    eprintln!(
        "{} violation{} found",
        violations.len(),
        if violations.len() == 1 { "" } else { "s" }
    );
    std::process::exit(1);
}

#[cfg(not(feature = "scryer"))]
fn check_command(_workdir: &Path, _rules: &str) -> Result<()> {
    eprintln!("Error: Prolog engine not enabled");
    eprintln!("Recompile with: cargo build --features scryer");
    std::process::exit(1);
}

fn workspaces_command(workdir: &Path, json: bool) -> Result<()> {
    let project = load_project(workdir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project.workspaces)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_workspaces(&project));
    }

    Ok(())
}

fn load_project(workdir: &Path) -> Result<Project> {
    Ok(Project::load(workdir)?)
}
