//! Generate command - builds the registry and writes the generated file.

use anyhow::Result;
use clap::Args;

use super::{InputArgs, Settings};
use crate::config::Config;

/// Write the upgrader registry source file.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub input: InputArgs,
}

impl GenerateCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let settings = Settings::resolve(&self.input, config)?;
        let (descriptions, version_table) = settings.load_inputs()?;
        let renderer = settings.renderer();

        let path = upgrader_codegen::generate(
            &descriptions,
            &version_table,
            &settings.skips,
            renderer.as_ref(),
            &settings.output_dir,
        )?;

        println!("Generated {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    pub(crate) const DESCRIPTIONS: &str = "\
- gelu_0_9:
    instructions:
      - [STOREN, 1, 2]
      - [LOADC, 0, 0]
      - [OP, 0, 0]
      - [RET, 0, 0]
    constants:
      - none
    types: []
    operators:
      - ['aten::gelu', '', 2]
    register_size: 2
";

    pub(crate) const VERSIONS: &str = "\
'aten::gelu':
  - upgrader_name: gelu_0_9
    min_version: 0
    max_version: 9
";

    pub(crate) fn write_inputs(dir: &Path) -> InputArgs {
        let bytecode = dir.join("upgraders.yaml");
        let version_map = dir.join("versions.yaml");
        std::fs::write(&bytecode, DESCRIPTIONS).unwrap();
        std::fs::write(&version_map, VERSIONS).unwrap();
        InputArgs {
            bytecode: Some(bytecode),
            version_map: Some(version_map),
            output_dir: Some(dir.join("out")),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_writes_cpp() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = GenerateCommand {
            input: write_inputs(dir.path()),
        };
        cmd.run(&Config::default()).unwrap();

        let generated = std::fs::read_to_string(dir.path().join("out/upgrader_mobile.cpp")).unwrap();
        assert!(generated.contains("\"gelu_0_9\""));
        assert!(generated.contains("OpCode::STOREN"));
    }

    #[test]
    fn test_generate_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut input = write_inputs(dir.path());
        let versions = dir.path().join("bad_versions.yaml");
        std::fs::write(&versions, "'aten::gelu':\n  - {upgrader_name: missing_0_1, min_version: 0, max_version: 1}\n").unwrap();
        input.version_map = Some(versions);

        let cmd = GenerateCommand { input };
        assert!(cmd.run(&Config::default()).is_err());
        assert!(!dir.path().join("out").exists());
    }
}
