//! Names excluded from generation.
//!
//! The default set is a temporary carve-out for two operator schemas that
//! are known to be broken upstream. Remove the entries once those schemas
//! are fixed.

use std::collections::BTreeSet;

/// Upgraders skipped by default
pub const DEFAULT_SKIPPED_UPGRADERS: &[&str] = &["full_names_0_4", "full_out_0_4"];

/// Operators skipped by default
pub const DEFAULT_SKIPPED_OPERATORS: &[&str] = &["aten::full.names", "aten::full.out"];

/// Upgrader and operator names to leave out of both generated tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipSet {
    upgraders: BTreeSet<String>,
    operators: BTreeSet<String>,
}

impl Default for SkipSet {
    fn default() -> Self {
        Self {
            upgraders: DEFAULT_SKIPPED_UPGRADERS.iter().map(|s| s.to_string()).collect(),
            operators: DEFAULT_SKIPPED_OPERATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SkipSet {
    /// A set that skips nothing
    pub fn empty() -> Self {
        Self {
            upgraders: BTreeSet::new(),
            operators: BTreeSet::new(),
        }
    }

    /// Add an upgrader name
    pub fn skip_upgrader(mut self, name: impl Into<String>) -> Self {
        self.upgraders.insert(name.into());
        self
    }

    /// Add an operator name
    pub fn skip_operator(mut self, name: impl Into<String>) -> Self {
        self.operators.insert(name.into());
        self
    }

    /// Add several upgrader names
    pub fn with_upgraders<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upgraders.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add several operator names
    pub fn with_operators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators.extend(names.into_iter().map(Into::into));
        self
    }

    /// Check if an upgrader is skipped
    #[inline]
    pub fn skips_upgrader(&self, name: &str) -> bool {
        self.upgraders.contains(name)
    }

    /// Check if an operator is skipped
    #[inline]
    pub fn skips_operator(&self, name: &str) -> bool {
        self.operators.contains(name)
    }

    /// Skipped upgrader names, sorted
    pub fn upgraders(&self) -> impl Iterator<Item = &str> {
        self.upgraders.iter().map(String::as_str)
    }

    /// Skipped operator names, sorted
    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carve_out() {
        let skips = SkipSet::default();
        assert!(skips.skips_upgrader("full_names_0_4"));
        assert!(skips.skips_upgrader("full_out_0_4"));
        assert!(skips.skips_operator("aten::full.names"));
        assert!(skips.skips_operator("aten::full.out"));
        assert!(!skips.skips_operator("aten::full"));
    }

    #[test]
    fn test_empty_and_extended() {
        let skips = SkipSet::empty();
        assert!(!skips.skips_upgrader("full_names_0_4"));

        let skips = SkipSet::default()
            .skip_upgrader("gelu_0_9")
            .with_operators(["aten::gelu"]);
        assert!(skips.skips_upgrader("gelu_0_9"));
        assert!(skips.skips_operator("aten::gelu"));
        assert_eq!(skips.upgraders().count(), 3);
    }
}
