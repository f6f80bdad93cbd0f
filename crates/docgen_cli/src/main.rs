//! Docgen CLI - generate pod scenario documentation from source markers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use docgen_core::DocgenError;
use std::path::PathBuf;
use std::process;

mod commands;

#[derive(Parser)]
#[command(name = "docgen")]
#[command(about = "Pod scenario documentation from source markers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default docgen.toml in the current directory
    Init {
        /// Overwrite an existing docgen.toml
        #[arg(long)]
        force: bool,
    },
    /// Collect markers and write the document
    Generate {
        #[command(flatten)]
        options: SourceOptions,
    },
    /// Check that the document on disk is up to date
    Check {
        #[command(flatten)]
        options: SourceOptions,
    },
    /// List collected scenarios without writing anything
    Scan {
        #[command(flatten)]
        options: SourceOptions,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Overrides for values normally read from docgen.toml.
#[derive(Args, Debug, Default)]
pub struct SourceOptions {
    /// Configuration file (default: ./docgen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output document file name
    #[arg(long)]
    doc_name: Option<String>,
    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Source path to scan; `dir/...` scans recursively (repeatable)
    #[arg(short, long = "path")]
    paths: Vec<String>,
}

fn main() {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), err);
        if let Some(hint) = recovery_hint(&err) {
            eprintln!("  {} {}", style("hint:").cyan(), hint);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => commands::init::run(force),
        Commands::Generate { options } => commands::generate::run(&options),
        Commands::Check { options } => commands::check::run(&options),
        Commands::Scan { options, format } => commands::scan::run(&options, &format),
    }
}

/// Recovery suggestion of the first docgen error in the chain.
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DocgenError>())
        .and_then(DocgenError::recovery_suggestion)
}
