//! Check command - verifies the generated file matches its inputs.

use anyhow::{Result, bail};
use clap::Args;

use upgrader_codegen::{UpgraderRegistry, is_up_to_date};

use super::{InputArgs, Settings};
use crate::config::Config;

/// Render in memory and compare against the file on disk.
#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub input: InputArgs,
}

impl CheckCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let settings = Settings::resolve(&self.input, config)?;
        let (descriptions, version_table) = settings.load_inputs()?;
        let renderer = settings.renderer();

        let registry = UpgraderRegistry::build(&descriptions, &version_table, &settings.skips)?;
        let contents = renderer.render(&registry)?;
        let path = settings.output_dir.join(renderer.file_name());

        if !is_up_to_date(&path, &contents)? {
            bail!(
                "{} is out of date; rerun gen-mobile-upgraders generate",
                path.display()
            );
        }

        tracing::info!(path = %path.display(), "Generated file is up to date");
        Ok(())
    }
}
