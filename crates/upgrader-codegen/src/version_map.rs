//! Operator version map: operator name to the upgraders that apply to it.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use upgrader_bytecode::{RawVersionTable, UpgraderReference};

use crate::error::{CodegenError, CodegenResult, DuplicateKind};
use crate::skip::SkipSet;
use crate::table::{BytecodeFunctionTable, FunctionIndex};

/// A version window resolved against the function table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionedUpgrader {
    /// Lowest serialized version the upgrader applies to
    pub min_version: i64,
    /// Highest serialized version the upgrader applies to
    pub max_version: i64,
    /// Name of the upgrader bytecode
    pub upgrader_name: String,
    /// Position of the upgrader in the function table
    pub bytecode_index: FunctionIndex,
}

/// Operators in ascending name order, each with upgraders sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperatorVersionMap {
    operators: BTreeMap<String, Vec<VersionedUpgrader>>,
}

impl OperatorVersionMap {
    /// Resolve every version table entry against `table`.
    ///
    /// Skipped operators are left out entirely. References to skipped
    /// upgraders are dropped; an operator left with none is omitted.
    pub fn build(
        version_table: &RawVersionTable,
        table: &BytecodeFunctionTable,
        skips: &SkipSet,
    ) -> CodegenResult<Self> {
        let mut operators = BTreeMap::new();
        let mut seen = BTreeSet::new();

        for (operator, entries) in version_table.entries() {
            if !seen.insert(operator.as_str()) {
                return Err(CodegenError::duplicate_operator(operator.clone()));
            }
            if skips.skips_operator(operator) {
                debug!(%operator, "Skipping operator");
                continue;
            }

            let mut references = Vec::with_capacity(entries.len());
            for entry in entries {
                if skips.skips_upgrader(&entry.upgrader_name) {
                    warn!(
                        %operator,
                        upgrader = %entry.upgrader_name,
                        "Dropping reference to skipped upgrader"
                    );
                    continue;
                }
                references.push(UpgraderReference::from_entry(entry)?);
            }
            if references.is_empty() && !entries.is_empty() {
                continue;
            }

            let upgraders = resolve_references(operator, references, table)?;
            operators.insert(operator.clone(), upgraders);
        }

        Ok(Self { operators })
    }

    /// Upgraders registered for an operator
    #[inline]
    pub fn get(&self, operator: &str) -> Option<&[VersionedUpgrader]> {
        self.operators.get(operator).map(Vec::as_slice)
    }

    /// Find the upgrader covering a serialized version of an operator
    pub fn lookup(&self, operator: &str, version: i64) -> Option<&VersionedUpgrader> {
        self.get(operator)?
            .iter()
            .find(|u| (u.min_version..=u.max_version).contains(&version))
    }

    /// Iterate operators in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VersionedUpgrader])> {
        self.operators
            .iter()
            .map(|(name, upgraders)| (name.as_str(), upgraders.as_slice()))
    }

    /// Number of operators
    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if the map is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Total number of references across all operators
    pub fn reference_count(&self) -> usize {
        self.operators.values().map(Vec::len).sum()
    }
}

/// Sort one operator's references by upgrader name and attach indices
fn resolve_references(
    operator: &str,
    mut references: Vec<UpgraderReference>,
    table: &BytecodeFunctionTable,
) -> CodegenResult<Vec<VersionedUpgrader>> {
    references.sort_by(|a, b| a.upgrader_name.cmp(&b.upgrader_name));

    if let Some(pair) = references
        .windows(2)
        .find(|pair| pair[0].upgrader_name == pair[1].upgrader_name)
    {
        return Err(CodegenError::DuplicateName {
            kind: DuplicateKind::OperatorUpgrader {
                operator: operator.to_string(),
            },
            name: pair[0].upgrader_name.clone(),
        });
    }

    references
        .into_iter()
        .map(|reference| {
            let bytecode_index = table.index_of(&reference.upgrader_name).ok_or_else(|| {
                CodegenError::UnresolvedUpgraderReference {
                    operator: operator.to_string(),
                    upgrader: reference.upgrader_name.clone(),
                }
            })?;
            Ok(VersionedUpgrader {
                min_version: reference.min_version,
                max_version: reference.max_version,
                upgrader_name: reference.upgrader_name,
                bytecode_index,
            })
        })
        .collect()
}
