mod commands;
mod config;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

use commands::{CheckCommand, GenerateCommand};

#[derive(Parser)]
#[command(
    name = "gen-mobile-upgraders",
    version,
    about = "Generate the mobile upgrader registry source file"
)]
struct Cli {
    /// Config file (defaults to upgraders.toml in the current directory or a parent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the registry and write the generated file
    Generate(GenerateCommand),
    /// Fail if the generated file on disk is out of date
    Check(CheckCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(cmd) => cmd.run(&config)?,
        Commands::Check(cmd) => cmd.run(&config)?,
    }

    Ok(())
}
