//! create-deskkit-app - scaffold a new deskkit desktop application

mod names;
mod prompt;
mod scaffold;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};

use crate::names::{
    DEFAULT_PROJECT_NAME, default_display_name, default_identifier, validate_identifier,
    validate_project_name,
};
use crate::prompt::{Cancelled, Prompter, RustylinePrompter};
use crate::scaffold::ProjectVars;

#[derive(Parser, Debug)]
#[command(name = "create-deskkit-app")]
#[command(author, version, about = "Scaffold a new deskkit desktop application", long_about = None)]
struct Cli {
    /// Project name, also used as the directory name
    project_name: Option<String>,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    template: String,

    /// Human readable app name (defaults to the title-cased project name)
    #[arg(short, long)]
    display_name: Option<String>,

    /// Reverse-DNS app identifier, e.g. com.company.app
    #[arg(short, long)]
    identifier: Option<String>,

    /// Accept defaults and skip all prompts
    #[arg(short, long)]
    yes: bool,

    /// Directory holding the templates
    #[arg(long, value_name = "DIR")]
    templates_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "create_deskkit_app=warn".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot read current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &cwd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<Cancelled>() => {
            eprintln!("Operation cancelled");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, cwd: &Path) -> anyhow::Result<()> {
    println!();
    println!("  create-deskkit-app");
    println!();

    let mut prompter: Option<RustylinePrompter> = if cli.yes {
        None
    } else {
        Some(RustylinePrompter::new()?)
    };
    let vars = collect_vars(&cli, prompter.as_mut().map(|p| p as &mut dyn Prompter))?;

    let templates_dir = scaffold::resolve_templates_dir(cli.templates_dir.as_deref());
    let template = templates_dir.join(&cli.template);
    if !template.is_dir() {
        let available = scaffold::list_templates(&templates_dir);
        if !available.is_empty() {
            eprintln!("Available templates: {}", available.join(", "));
        }
        bail!("Template \"{}\" not found", cli.template);
    }

    let target = cwd.join(&vars.name);
    if target.exists() {
        let overwrite = match prompter.as_mut() {
            None => true,
            Some(p) => p.confirm(
                &format!("Directory \"{}\" already exists. Overwrite?", vars.name),
                false,
            )?,
        };
        if !overwrite {
            return Err(Cancelled.into());
        }
        std::fs::remove_dir_all(&target)
            .with_context(|| format!("failed to remove {}", target.display()))?;
        info!(path = %target.display(), "removed existing directory");
    }

    println!("Creating project in {}...", target.display());
    let written = scaffold::copy_template(&template, &target, &vars)?;
    info!(files = written, template = %cli.template, "template copied");

    if let Err(e) = scaffold::check_generated_config(&target) {
        warn!("generated deskkit.toml is invalid: {:#}", e);
        eprintln!("Warning: generated deskkit.toml is invalid: {:#}", e);
    }

    if let Err(e) = scaffold::init_git(&target) {
        warn!("git init failed: {:#}", e);
        eprintln!("Warning: could not initialize a git repository");
    }

    println!();
    println!("Project created successfully!");
    println!();
    println!("  Name:       {}", vars.display_name);
    println!("  Identifier: {}", vars.identifier);
    println!();
    println!("Next steps:");
    println!("  cd {}", vars.name);
    println!("  cargo run");
    println!();
    Ok(())
}

/// Resolve project values from flags, asking for anything missing when a
/// prompter is available
fn collect_vars(cli: &Cli, prompter: Option<&mut dyn Prompter>) -> anyhow::Result<ProjectVars> {
    match prompter {
        None => {
            let name = cli
                .project_name
                .clone()
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
            validate_project_name(&name).map_err(anyhow::Error::msg)?;
            let display_name = cli
                .display_name
                .clone()
                .unwrap_or_else(|| default_display_name(&name));
            let identifier = cli
                .identifier
                .clone()
                .unwrap_or_else(|| default_identifier(&name));
            validate_identifier(&identifier).map_err(anyhow::Error::msg)?;
            Ok(ProjectVars {
                name,
                display_name,
                identifier,
            })
        }
        Some(p) => {
            let name = match &cli.project_name {
                Some(name) => {
                    validate_project_name(name).map_err(anyhow::Error::msg)?;
                    name.clone()
                }
                None => p.text_validated("Project name", DEFAULT_PROJECT_NAME, &validate_project_name)?,
            };
            let display_name = match &cli.display_name {
                Some(display_name) => display_name.clone(),
                None => p.text_validated("Display name", &default_display_name(&name), &|value: &str| {
                    if value.is_empty() {
                        Err("Display name cannot be empty".to_string())
                    } else {
                        Ok(())
                    }
                })?,
            };
            let identifier = match &cli.identifier {
                Some(identifier) => {
                    validate_identifier(identifier).map_err(anyhow::Error::msg)?;
                    identifier.clone()
                }
                None => p.text_validated("App identifier", &default_identifier(&name), &validate_identifier)?,
            };
            Ok(ProjectVars {
                name,
                display_name,
                identifier,
            })
        }
    }
}
