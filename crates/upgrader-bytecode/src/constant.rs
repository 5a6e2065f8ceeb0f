//! Constant table entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BytecodeError, Result};
use crate::raw::value_type_name;

/// A literal in an upgrader's constant table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// String literal
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// Absent value
    None,
}

impl Constant {
    /// Create a string constant
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Convert a raw value, rejecting anything but string, bool and null
    pub fn from_value(upgrader: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Str(s.clone())),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Null => Ok(Self::None),
            other => Err(BytecodeError::UnsupportedConstantType {
                upgrader: upgrader.to_string(),
                value: other.to_string(),
                type_name: value_type_name(other),
            }),
        }
    }
}
