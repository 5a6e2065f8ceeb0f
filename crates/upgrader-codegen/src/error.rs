//! Generation errors

use thiserror::Error;

use upgrader_bytecode::BytecodeError;

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A description or version entry failed validation
    #[error(transparent)]
    Bytecode(#[from] BytecodeError),

    /// Two items that must be unique share a name
    #[error("Duplicate {kind}: '{name}'")]
    DuplicateName {
        /// What kind of item is duplicated
        kind: DuplicateKind,
        /// The repeated name
        name: String,
    },

    /// The version table names an upgrader with no bytecode
    #[error("Operator '{operator}' references unknown upgrader '{upgrader}'")]
    UnresolvedUpgraderReference {
        /// Operator whose entry failed to resolve
        operator: String,
        /// Missing upgrader name
        upgrader: String,
    },

    /// Formatting the generated source failed
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while writing the output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of name a [`CodegenError::DuplicateName`] refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKind {
    /// Two bytecode descriptions share a name
    Upgrader,
    /// The version table lists an operator twice
    Operator,
    /// One operator references the same upgrader twice
    OperatorUpgrader {
        /// Operator holding the duplicate reference
        operator: String,
    },
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKind::Upgrader => write!(f, "upgrader name"),
            DuplicateKind::Operator => write!(f, "operator name"),
            DuplicateKind::OperatorUpgrader { operator } => {
                write!(f, "upgrader reference under operator '{}'", operator)
            }
        }
    }
}

impl CodegenError {
    /// Create a duplicate upgrader error
    pub fn duplicate_upgrader(name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: DuplicateKind::Upgrader,
            name: name.into(),
        }
    }

    /// Create a duplicate operator error
    pub fn duplicate_operator(name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: DuplicateKind::Operator,
            name: name.into(),
        }
    }
}

/// Result type for generation
pub type CodegenResult<T> = Result<T, CodegenError>;
