//! The validated pair of generated tables

use serde::Serialize;
use tracing::info;

use upgrader_bytecode::{RawBytecodeDescription, RawVersionTable};

use crate::error::CodegenResult;
use crate::skip::SkipSet;
use crate::table::BytecodeFunctionTable;
use crate::version_map::OperatorVersionMap;

/// Counts reported after a successful build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Functions in the bytecode table
    pub functions: usize,
    /// Operators in the version map
    pub operators: usize,
    /// Version references across all operators
    pub references: usize,
    /// Descriptions left out by the skip set
    pub skipped_upgraders: usize,
    /// Operators left out by the skip set
    pub skipped_operators: usize,
}

/// Function table and version map, built together so every index in the
/// map points into the table
#[derive(Debug, Clone)]
pub struct UpgraderRegistry {
    table: BytecodeFunctionTable,
    version_map: OperatorVersionMap,
    stats: RegistryStats,
}

impl UpgraderRegistry {
    /// Build both tables from the two upstream inputs
    pub fn build(
        descriptions: &[RawBytecodeDescription],
        version_table: &RawVersionTable,
        skips: &SkipSet,
    ) -> CodegenResult<Self> {
        let table = BytecodeFunctionTable::build(descriptions, skips)?;
        let version_map = OperatorVersionMap::build(version_table, &table, skips)?;

        let stats = RegistryStats {
            functions: table.len(),
            operators: version_map.len(),
            references: version_map.reference_count(),
            skipped_upgraders: descriptions
                .iter()
                .filter(|raw| skips.skips_upgrader(&raw.name))
                .count(),
            skipped_operators: version_table
                .entries()
                .iter()
                .filter(|(op, _)| skips.skips_operator(op))
                .count(),
        };
        info!(
            functions = stats.functions,
            operators = stats.operators,
            references = stats.references,
            skipped_upgraders = stats.skipped_upgraders,
            skipped_operators = stats.skipped_operators,
            "Built upgrader registry"
        );

        Ok(Self {
            table,
            version_map,
            stats,
        })
    }

    /// The bytecode function table
    #[inline]
    pub fn table(&self) -> &BytecodeFunctionTable {
        &self.table
    }

    /// The operator version map
    #[inline]
    pub fn version_map(&self) -> &OperatorVersionMap {
        &self.version_map
    }

    /// Build statistics
    #[inline]
    pub fn stats(&self) -> RegistryStats {
        self.stats
    }
}
