//! Command-line interface for collector-config
//!
//! Loads config files, applies `--set` overrides and prints the effective
//! configuration.

use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{add_set_flag, apply_set_flag, load_files, ConfigStore};

mod completions;
mod get;
mod keys;
mod print;
mod utils;

/// Load collector configuration and apply --set overrides
#[derive(Parser)]
#[command(name = "collector-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to load (YAML, TOML or JSON); repeat to layer several files
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration (default)
    Print,

    /// Print the value at a dot-delimited key
    Get(get::GetArgs),

    /// List every leaf key of the effective configuration
    Keys,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    Toml,
}

/// The full command, including the `--set` flag.
pub fn command() -> clap::Command {
    add_set_flag(Cli::command())
}

pub fn run() -> Result<()> {
    let matches = command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Some(Commands::Completions(args)) => completions::run(args),
        Some(Commands::Get(args)) => {
            get::run(&effective_config(&cli.config, &matches)?, args, cli.format)
        }
        Some(Commands::Keys) => keys::run(&effective_config(&cli.config, &matches)?),
        Some(Commands::Print) | None => {
            print::run(&effective_config(&cli.config, &matches)?, cli.format)
        }
    }
}

/// Config files layered in order, then `--set` overrides on top.
fn effective_config(config_files: &[PathBuf], matches: &ArgMatches) -> Result<ConfigStore> {
    let mut store = load_files(config_files)?;
    apply_set_flag(&mut store, matches)?;
    Ok(store)
}
