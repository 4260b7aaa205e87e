use crate::error::LoadError;
use crate::registry::{LoadOptions, Registry};
use crate::runtime_config::SailConfig;
use crate::spec::{description_slug, load_description, ApiDescription};
use crate::template::{build_uri_template, build_variant_uri_template};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for apisail
#[derive(Parser)]
#[command(name = "apisail")]
#[command(about = "Fixture registries and URI templates from an API description", long_about = None)]
pub struct Cli {
    /// YAML config file (see `runtime_config`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load a description and print its registries as JSON
    Inspect {
        /// Description snapshot (YAML or JSON)
        #[arg(short, long)]
        description: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Report every required declaration without an example
    Check {
        /// Description snapshot (YAML or JSON)
        #[arg(short, long)]
        description: Option<PathBuf>,

        /// Also require examples on required query parameters
        #[arg(long, default_value_t = false)]
        require_parameter_examples: bool,
    },
    /// Print the URI template of every method
    Template {
        /// Description snapshot (YAML or JSON)
        #[arg(short, long)]
        description: Option<PathBuf>,
    },
}

/// Run a parsed command line, writing results to stdout.
///
/// Returns the process exit code.
pub fn run_cli(cli: Cli) -> anyhow::Result<i32> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

pub fn run_with_output<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<i32> {
    let config = match &cli.config {
        Some(path) => SailConfig::from_file(path)?.merge_env(),
        None => SailConfig::from_env(),
    };

    match cli.command {
        Commands::Inspect {
            description,
            pretty,
        } => {
            let description = read_description(description, &config)?;
            let mut registry = Registry::with_options(config.loader_options());
            let summary = registry.load(&description)?;
            let report = serde_json::json!({
                "title": description.title,
                "slug": description_slug(&description),
                "summary": summary,
                "registry": registry,
            });
            if pretty {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "{report}")?;
            }
            Ok(0)
        }
        Commands::Check {
            description,
            require_parameter_examples,
        } => {
            let description = read_description(description, &config)?;
            let mut registry = Registry::with_options(LoadOptions {
                fail_fast: false,
                require_parameter_examples: require_parameter_examples
                    || config.require_parameter_examples,
            });
            match registry.load(&description) {
                Ok(summary) => {
                    writeln!(
                        out,
                        "ok: {} resource(s), {} method(s), {} response(s)",
                        summary.resources, summary.methods, summary.responses
                    )?;
                    Ok(0)
                }
                Err(LoadError::Invalid(issues)) => {
                    for issue in &issues {
                        writeln!(out, "{issue}")?;
                    }
                    writeln!(out, "{} issue(s) found", issues.len())?;
                    Ok(1)
                }
                Err(err) => Err(err.into()),
            }
        }
        Commands::Template { description } => {
            let description = read_description(description, &config)?;
            for method in description.methods() {
                writeln!(out, "{} {}", method.verb(), build_uri_template(method))?;
                for variant in &method.method.traits {
                    writeln!(
                        out,
                        "{} {} [{}]",
                        method.verb(),
                        build_variant_uri_template(method, &variant.name),
                        variant.name
                    )?;
                }
            }
            Ok(0)
        }
    }
}

fn read_description(arg: Option<PathBuf>, config: &SailConfig) -> anyhow::Result<ApiDescription> {
    let path = arg
        .or_else(|| config.source_file.clone())
        .ok_or_else(|| anyhow!("no description given; pass --description or set APISAIL_SOURCE_FILE"))?;
    info!(path = %path.display(), "reading description");
    load_description(&path).context("could not load description")
}
