//! Loading the two upstream inputs from disk.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use upgrader_bytecode::{RawBytecodeDescription, RawVersionTable};

/// Read the bytecode descriptions: a sequence of `{name: tables}` entries.
pub fn load_descriptions(path: &Path) -> Result<Vec<RawBytecodeDescription>> {
    let descriptions: Vec<RawBytecodeDescription> = load(path)?;
    tracing::debug!(path = %path.display(), count = descriptions.len(), "Loaded bytecode descriptions");
    Ok(descriptions)
}

/// Read the operator version table: `operator -> [upgrader entries]`.
pub fn load_version_table(path: &Path) -> Result<RawVersionTable> {
    let table: RawVersionTable = load(path)?;
    tracing::debug!(path = %path.display(), operators = table.len(), "Loaded version table");
    Ok(table)
}

/// Parse JSON for `.json` files and YAML for anything else.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
