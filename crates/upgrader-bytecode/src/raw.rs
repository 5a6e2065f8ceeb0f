//! Untyped input shapes, as produced by the upstream description sources.
//!
//! Bytecode tables are kept as ordered `(key, value)` pairs so a table kind
//! supplied twice is still visible to validation.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One upgrader as read from the bytecode source: `{name: {table: value, ...}}`
#[derive(Debug, Clone, PartialEq)]
pub struct RawBytecodeDescription {
    /// Upgrader name
    pub name: String,
    /// Table entries in source order, duplicates preserved
    pub tables: Vec<(String, Value)>,
}

impl RawBytecodeDescription {
    /// Create a raw description from explicit table entries
    pub fn new(name: impl Into<String>, tables: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            tables,
        }
    }

    /// Create a raw description from a JSON object; non-objects yield no tables
    pub fn from_object(name: impl Into<String>, body: Value) -> Self {
        let tables = match body {
            Value::Object(map) => map.into_iter().collect(),
            _ => Vec::new(),
        };
        Self::new(name, tables)
    }
}

impl<'de> Deserialize<'de> for RawBytecodeDescription {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DescriptionVisitor;

        impl<'de> Visitor<'de> for DescriptionVisitor {
            type Value = RawBytecodeDescription;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-entry mapping from upgrader name to bytecode tables")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let Some((name, RawTables(tables))) = map.next_entry::<String, RawTables>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(RawBytecodeDescription { name, tables })
            }
        }

        deserializer.deserialize_map(DescriptionVisitor)
    }
}

struct RawTables(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawTables {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TablesVisitor;

        impl<'de> Visitor<'de> for TablesVisitor {
            type Value = RawTables;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of bytecode table kinds")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut tables = Vec::with_capacity(map.size_hint().unwrap_or(5));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    tables.push(entry);
                }
                Ok(RawTables(tables))
            }
        }

        deserializer.deserialize_map(TablesVisitor)
    }
}

/// The operator version table: operator name to its upgrader entries.
///
/// Kept as ordered pairs so an operator listed twice can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVersionTable(pub Vec<(String, Vec<RawUpgraderEntry>)>);

impl RawVersionTable {
    /// Create a table from operator entries
    pub fn new(entries: Vec<(String, Vec<RawUpgraderEntry>)>) -> Self {
        Self(entries)
    }

    /// Operator entries in source order
    pub fn entries(&self) -> &[(String, Vec<RawUpgraderEntry>)] {
        &self.0
    }

    /// Number of operators
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<RawUpgraderEntry>)> for RawVersionTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<RawUpgraderEntry>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for RawVersionTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionTableVisitor;

        impl<'de> Visitor<'de> for VersionTableVisitor {
            type Value = RawVersionTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from operator name to upgrader entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<RawUpgraderEntry>>()? {
                    entries.push(entry);
                }
                Ok(RawVersionTable(entries))
            }
        }

        deserializer.deserialize_map(VersionTableVisitor)
    }
}

/// One entry of an operator's upgrader list in the version table.
///
/// Bounds are either given directly or left out and derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUpgraderEntry {
    /// Name of the upgrader bytecode this entry points at
    pub upgrader_name: String,
    /// Lowest serialized version the upgrader applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<i64>,
    /// Highest serialized version the upgrader applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<i64>,
}

impl RawUpgraderEntry {
    /// Entry with explicit bounds
    pub fn new(upgrader_name: impl Into<String>, min_version: i64, max_version: i64) -> Self {
        Self {
            upgrader_name: upgrader_name.into(),
            min_version: Some(min_version),
            max_version: Some(max_version),
        }
    }

    /// Entry whose bounds are embedded in the name
    pub fn named(upgrader_name: impl Into<String>) -> Self {
        Self {
            upgrader_name: upgrader_name.into(),
            min_version: None,
            max_version: None,
        }
    }
}

/// Human-readable type of a raw value, used in error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
