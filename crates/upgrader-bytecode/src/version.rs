//! Version-range references from operators to upgraders

use serde::{Deserialize, Serialize};

use crate::error::{BytecodeError, Result};
use crate::raw::RawUpgraderEntry;

/// Separator between the parts of an upgrader name
pub const UPGRADER_NAME_DELIMITER: char = '_';

/// An inclusive `[min_version, max_version]` window pointing at an upgrader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgraderReference {
    /// Lowest serialized version the upgrader applies to
    pub min_version: i64,
    /// Highest serialized version the upgrader applies to
    pub max_version: i64,
    /// Name of the upgrader bytecode
    pub upgrader_name: String,
}

impl UpgraderReference {
    /// Create a reference, checking `min_version <= max_version`
    pub fn new(upgrader_name: impl Into<String>, min_version: i64, max_version: i64) -> Result<Self> {
        let upgrader_name = upgrader_name.into();
        if min_version > max_version {
            return Err(BytecodeError::InvalidVersionRange {
                upgrader: upgrader_name,
                min: min_version,
                max: max_version,
            });
        }
        Ok(Self {
            min_version,
            max_version,
            upgrader_name,
        })
    }

    /// Resolve a version table entry, deriving missing bounds from the name
    pub fn from_entry(entry: &RawUpgraderEntry) -> Result<Self> {
        let (min, max) = match (entry.min_version, entry.max_version) {
            (Some(min), Some(max)) => (min, max),
            (None, None) => parse_version_bounds(&entry.upgrader_name)?,
            _ => return Err(BytecodeError::PartialVersionBounds(entry.upgrader_name.clone())),
        };
        Self::new(entry.upgrader_name.clone(), min, max)
    }

    /// Whether a serialized version falls inside this window
    #[inline]
    pub fn covers(&self, version: i64) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }
}

/// Derive `(min, max)` from a name such as `div__Scalar_0_3`.
///
/// Empty tokens are discarded; the third and fourth tokens are the bounds.
pub fn parse_version_bounds(upgrader_name: &str) -> Result<(i64, i64)> {
    let malformed = || BytecodeError::MalformedUpgraderName(upgrader_name.to_string());

    let mut tokens = upgrader_name
        .split(UPGRADER_NAME_DELIMITER)
        .filter(|token| !token.is_empty());
    let min = tokens.nth(2).ok_or_else(malformed)?;
    let max = tokens.next().ok_or_else(malformed)?;

    let parse = |token: &str| {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            token.parse::<i64>().map_err(|_| malformed())
        } else {
            Err(malformed())
        }
    };

    Ok((parse(min)?, parse(max)?))
}
