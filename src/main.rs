//! `strata` command line.
//!
//! ```bash
//! strata build tokens.project.json --out build --bundle build/tokens.tar.gz
//! strata configs tokens.project.json
//! strata tokens tokens.project.json --layer Semantic --config mode=dark
//! strata import style-dictionary.config.json --into tokens.project.json
//! strata export tokens.project.json
//! ```

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use strata::files::{load_project, save_project, write_bundle_file, write_outputs};
use strata::{BuildReport, Project, StrataError, build_filtered};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Layered design-token pipeline")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every platform under every build config
    Build {
        project: PathBuf,

        /// Output directory, one folder per platform
        #[arg(short, long, default_value = "build")]
        out: PathBuf,

        /// Also write a .tar.gz bundle of all outputs
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Build only this platform
        #[arg(long)]
        platform: Option<String>,

        /// Build only this config (by name, e.g. "dark")
        #[arg(long)]
        config: Option<String>,
    },

    /// List build configs in build order
    Configs { project: PathBuf },

    /// Print the merged view of a layer with provenance
    Tokens {
        project: PathBuf,

        #[arg(long)]
        layer: String,

        /// Variable selection, repeatable: --config mode=dark
        #[arg(long = "config", value_parser = parse_selection)]
        selections: Vec<(String, String)>,
    },

    /// Import a style-dictionary config and print the platforms
    Import {
        config: PathBuf,

        /// Replace the platforms of this project file
        #[arg(long)]
        into: Option<PathBuf>,
    },

    /// Print the project's platforms as a style-dictionary config
    Export { project: PathBuf },
}

fn parse_selection(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", text)),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), StrataError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_defects(report: &BuildReport) {
    for reported in &report.defects {
        eprintln!("warning: [{}] {}", reported.config, reported.defect);
    }
}

fn build(
    project: &Project,
    out: &Path,
    bundle: Option<&Path>,
    platform: Option<&str>,
    config: Option<&str>,
) -> Result<(), StrataError> {
    let report = build_filtered(project, config, platform)?;
    report_defects(&report);
    for path in write_outputs(&report.outputs, out)? {
        println!("{}", path.display());
    }
    if let Some(bundle) = bundle {
        write_bundle_file(&report.outputs, bundle)?;
        println!("{}", bundle.display());
    }
    Ok(())
}

fn tokens(project: &Project, layer: &str, selections: Vec<(String, String)>) -> Result<(), StrataError> {
    let overrides: BTreeMap<String, String> = selections.into_iter().collect();
    let config = project.config_with(&overrides)?;
    let view = project.effective_tokens(layer, &config)?;
    for defect in &view.defects {
        eprintln!("warning: {}", defect);
    }
    print_json(&json!({
        "layer": layer,
        "config": config.name,
        "tokens": view.tree.to_value(),
        "provenance": view.provenance,
    }))
}

fn import(config: &Path, into: Option<&Path>) -> Result<(), StrataError> {
    let text = std::fs::read_to_string(config)?;
    let platforms = match into {
        Some(path) => {
            let mut project = load_project(path)?;
            let warnings = project.import_platforms(&text)?;
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }
            save_project(&project, path)?;
            project.platforms
        }
        None => {
            let imported = strata::interchange::import_config(&text)?;
            for warning in &imported.warnings {
                eprintln!("warning: {}", warning);
            }
            imported.platforms
        }
    };
    print_json(&platforms)
}

fn run(cli: Cli) -> Result<(), StrataError> {
    match cli.command {
        Commands::Build {
            project,
            out,
            bundle,
            platform,
            config,
        } => {
            let project = load_project(&project)?;
            build(
                &project,
                &out,
                bundle.as_deref(),
                platform.as_deref(),
                config.as_deref(),
            )
        }
        Commands::Configs { project } => {
            let project = load_project(&project)?;
            for config in project.build_configs() {
                let selections: Vec<String> = config
                    .selections
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                println!("{}\t{}", config.name, selections.join(" "));
            }
            Ok(())
        }
        Commands::Tokens {
            project,
            layer,
            selections,
        } => tokens(&load_project(&project)?, &layer, selections),
        Commands::Import { config, into } => import(&config, into.as_deref()),
        Commands::Export { project } => {
            let project = load_project(&project)?;
            let exported: Value = project.export_platforms();
            print_json(&exported)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
