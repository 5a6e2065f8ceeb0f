//! Configuration file parsing for upgraders.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use upgrader_codegen::OutputFormat;

/// Config file names searched for, in order
const CONFIG_NAMES: &[&str] = &["upgraders.toml", ".upgraders.toml"];

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bytecode description file (YAML or JSON)
    pub bytecode_path: Option<PathBuf>,

    /// Operator version table file (YAML or JSON)
    pub version_map_path: Option<PathBuf>,

    /// Directory the generated file is written to
    pub output_dir: Option<PathBuf>,

    /// Output format
    pub format: Option<OutputFormat>,

    /// Extra upgrader names to skip
    pub skip_upgraders: Vec<String>,

    /// Extra operator names to skip
    pub skip_operators: Vec<String>,

    /// Use only the configured skip lists, dropping the built-in ones
    pub replace_default_skips: bool,

    /// Command shown in the generated file's banner
    pub regenerate_command: Option<String>,
}

impl Config {
    /// Resolve relative paths against the directory holding the config file.
    fn rebase(mut self, base: &Path) -> Self {
        for path in [
            &mut self.bytecode_path,
            &mut self.version_map_path,
            &mut self.output_dir,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Load configuration from a file or search for a default config file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::debug!(path = %path.display(), "Loaded config");
            let base = path.parent().unwrap_or(Path::new("."));
            Ok(config.rebase(base))
        }
        None => Ok(Config::default()),
    }
}

/// Search for a configuration file in the current directory and its parents.
fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    let mut dir = Some(cwd.as_path());
    while let Some(current) = dir {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.exists() {
                return Some(path);
            }
        }
        dir = current.parent();
    }

    None
}
