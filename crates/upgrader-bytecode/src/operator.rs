//! Operator call signatures referenced by an upgrader

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BytecodeError, Result};

/// A concrete operator call, `(name, overload_name, num_args)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorString {
    /// Qualified operator name, e.g. `aten::div`
    pub name: String,
    /// Overload name, possibly empty
    pub overload_name: String,
    /// Number of specified arguments; `None` when unspecified
    pub num_args: Option<i64>,
}

impl OperatorString {
    /// Create a new operator signature
    pub fn new(name: impl Into<String>, overload_name: impl Into<String>, num_args: Option<i64>) -> Self {
        Self {
            name: name.into(),
            overload_name: overload_name.into(),
            num_args,
        }
    }

    /// Parse a `[name, overload_name, num_args]` triple
    pub fn from_value(upgrader: &str, value: &Value) -> Result<Self> {
        let malformed = || BytecodeError::MalformedOperator {
            upgrader: upgrader.to_string(),
            value: value.to_string(),
        };

        let [name, overload, num_args] = value.as_array().map(Vec::as_slice).ok_or_else(malformed)? else {
            return Err(malformed());
        };

        let num_args = match num_args {
            Value::Null => None,
            n => Some(n.as_i64().ok_or_else(malformed)?),
        };

        Ok(Self {
            name: name.as_str().ok_or_else(malformed)?.to_string(),
            overload_name: overload.as_str().ok_or_else(malformed)?.to_string(),
            num_args,
        })
    }
}
