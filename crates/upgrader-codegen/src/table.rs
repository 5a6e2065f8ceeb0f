//! Bytecode function table: every upgrader, sorted by name and indexed.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use upgrader_bytecode::{BytecodeDescription, RawBytecodeDescription};

use crate::error::{CodegenError, CodegenResult};
use crate::skip::SkipSet;

/// Index into the bytecode function table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct FunctionIndex(pub u32);

impl FunctionIndex {
    /// Create a new function index
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get index value
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FunctionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upgrader functions in index order, with a name lookup
#[derive(Debug, Clone, Default)]
pub struct BytecodeFunctionTable {
    functions: Vec<BytecodeDescription>,
    by_name: FxHashMap<String, FunctionIndex>,
}

impl BytecodeFunctionTable {
    /// Sort, filter, validate and index the raw descriptions.
    ///
    /// Indices are contiguous from 0 in ascending name order, so any input
    /// order produces the same table.
    pub fn build(descriptions: &[RawBytecodeDescription], skips: &SkipSet) -> CodegenResult<Self> {
        let mut kept: Vec<&RawBytecodeDescription> = descriptions
            .iter()
            .filter(|raw| {
                let skipped = skips.skips_upgrader(&raw.name);
                if skipped {
                    debug!(upgrader = %raw.name, "Skipping upgrader");
                }
                !skipped
            })
            .collect();
        kept.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(pair) = kept.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(CodegenError::duplicate_upgrader(pair[0].name.clone()));
        }

        let mut table = Self {
            functions: Vec::with_capacity(kept.len()),
            by_name: FxHashMap::default(),
        };
        for raw in kept {
            let description = BytecodeDescription::from_raw(raw)?;
            let index = table.push(description);
            debug!(upgrader = %raw.name, %index, "Indexed upgrader");
        }

        Ok(table)
    }

    fn push(&mut self, description: BytecodeDescription) -> FunctionIndex {
        let index = FunctionIndex::new(self.functions.len() as u32);
        self.by_name.insert(description.name.clone(), index);
        self.functions.push(description);
        index
    }

    /// Look up an upgrader's index by name
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<FunctionIndex> {
        self.by_name.get(name).copied()
    }

    /// Get a function by index
    #[inline]
    pub fn get(&self, index: FunctionIndex) -> Option<&BytecodeDescription> {
        self.functions.get(index.0 as usize)
    }

    /// Number of functions
    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the table is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate over `(index, function)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (FunctionIndex, &BytecodeDescription)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionIndex::new(i as u32), f))
    }

    /// The name to index map
    pub fn name_index(&self) -> &FxHashMap<String, FunctionIndex> {
        &self.by_name
    }
}
