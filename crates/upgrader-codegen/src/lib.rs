//! # Upgrader Codegen
//!
//! Builds the mobile runtime's upgrader registry from bytecode descriptions
//! and the operator version table.
//!
//! ## Pipeline
//!
//! 1. Filter, sort and index descriptions ([`BytecodeFunctionTable`])
//! 2. Resolve the version table against those indices ([`OperatorVersionMap`])
//! 3. Render the pair ([`render`])
//! 4. Replace the output file in one step ([`writer`])
//!
//! Steps 1-3 are pure; nothing is written unless all of them succeed.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod render;
pub mod skip;
pub mod table;
pub mod version_map;
pub mod writer;

pub use error::{CodegenError, CodegenResult, DuplicateKind};
pub use registry::{RegistryStats, UpgraderRegistry};
pub use render::{CppRenderer, JsonRenderer, OutputFormat, Render};
pub use skip::SkipSet;
pub use table::{BytecodeFunctionTable, FunctionIndex};
pub use version_map::{OperatorVersionMap, VersionedUpgrader};
pub use writer::{is_up_to_date, write_atomically};

use std::path::{Path, PathBuf};

use upgrader_bytecode::{RawBytecodeDescription, RawVersionTable};

/// Build, render and write in one call.
///
/// Returns the path written. A failure at any step leaves `output_dir`
/// unchanged.
pub fn generate(
    descriptions: &[RawBytecodeDescription],
    version_table: &RawVersionTable,
    skips: &SkipSet,
    renderer: &dyn Render,
    output_dir: &Path,
) -> CodegenResult<PathBuf> {
    let registry = UpgraderRegistry::build(descriptions, version_table, skips)?;
    let contents = renderer.render(&registry)?;
    write_atomically(output_dir, renderer.file_name(), &contents)
}
