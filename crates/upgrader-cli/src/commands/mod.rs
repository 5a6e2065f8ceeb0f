//! CLI commands.

mod check;
mod generate;

pub use check::CheckCommand;
pub use generate::GenerateCommand;

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use upgrader_bytecode::{RawBytecodeDescription, RawVersionTable};
use upgrader_codegen::{CppRenderer, OutputFormat, Render, SkipSet};

use crate::config::Config;
use crate::input;

/// Output format as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// C++ source for the mobile runtime
    Cpp,
    /// JSON snapshot of the registry
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Cpp => OutputFormat::Cpp,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Arguments shared by `generate` and `check`. Each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Bytecode descriptions (.json for JSON, YAML otherwise)
    #[arg(long)]
    pub bytecode: Option<PathBuf>,

    /// Operator version table (.json for JSON, YAML otherwise)
    #[arg(long)]
    pub version_map: Option<PathBuf>,

    /// Directory holding the generated file
    #[arg(long, env = "UPGRADER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Extra upgrader to skip (repeatable)
    #[arg(long = "skip-upgrader")]
    pub skip_upgraders: Vec<String>,

    /// Extra operator to skip (repeatable)
    #[arg(long = "skip-operator")]
    pub skip_operators: Vec<String>,
}

/// Everything a command needs once flags and config are merged.
#[derive(Debug)]
pub struct Settings {
    pub bytecode: PathBuf,
    pub version_map: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub skips: SkipSet,
    pub regenerate_command: Option<String>,
}

impl Settings {
    /// Merge command-line flags over the config file.
    pub fn resolve(args: &InputArgs, config: &Config) -> Result<Self> {
        let Some(bytecode) = args.bytecode.clone().or_else(|| config.bytecode_path.clone())
        else {
            bail!("No bytecode descriptions given (use --bytecode or bytecode_path)");
        };
        let Some(version_map) = args
            .version_map
            .clone()
            .or_else(|| config.version_map_path.clone())
        else {
            bail!("No version table given (use --version-map or version_map_path)");
        };
        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let format = args
            .format
            .map(OutputFormat::from)
            .or(config.format)
            .unwrap_or_default();

        let base = if config.replace_default_skips {
            SkipSet::empty()
        } else {
            SkipSet::default()
        };
        let skips = base
            .with_upgraders(config.skip_upgraders.iter().chain(&args.skip_upgraders))
            .with_operators(config.skip_operators.iter().chain(&args.skip_operators));

        Ok(Self {
            bytecode,
            version_map,
            output_dir,
            format,
            skips,
            regenerate_command: config.regenerate_command.clone(),
        })
    }

    /// Read both inputs.
    pub fn load_inputs(&self) -> Result<(Vec<RawBytecodeDescription>, RawVersionTable)> {
        let descriptions = input::load_descriptions(&self.bytecode)?;
        let version_table = input::load_version_table(&self.version_map)?;
        Ok((descriptions, version_table))
    }

    /// Renderer for the selected format.
    pub fn renderer(&self) -> Box<dyn Render> {
        match (self.format, &self.regenerate_command) {
            (OutputFormat::Cpp, Some(command)) => {
                Box::new(CppRenderer::with_regenerate_command(command.as_str()))
            }
            (format, _) => format.renderer(),
        }
    }
}
