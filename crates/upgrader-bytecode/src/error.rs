//! Bytecode description errors

use thiserror::Error;

/// Errors raised while validating an upgrader's bytecode description
#[derive(Debug, Error)]
pub enum BytecodeError {
    /// Table key is not one of the five bytecode table kinds
    #[error("Unknown bytecode field '{field}' in upgrader '{upgrader}'")]
    UnknownByteCodeField {
        /// Upgrader being validated
        upgrader: String,
        /// Offending key
        field: String,
    },

    /// A table kind was supplied more than once
    #[error("Bytecode field '{field}' supplied more than once in upgrader '{upgrader}'")]
    DuplicateByteCodeField {
        /// Upgrader being validated
        upgrader: String,
        /// Repeated key
        field: &'static str,
    },

    /// A table kind is absent
    #[error("Upgrader '{upgrader}' is missing bytecode field '{field}'")]
    MissingByteCodeField {
        /// Upgrader being validated
        upgrader: String,
        /// Absent key
        field: &'static str,
    },

    /// Constant is not a string, boolean or null
    #[error(
        "The type of {value} is {type_name} in upgrader '{upgrader}'; \
         only string, bool and null constants are supported"
    )]
    UnsupportedConstantType {
        /// Upgrader being validated
        upgrader: String,
        /// Rendered constant value
        value: String,
        /// Type of the constant value
        type_name: &'static str,
    },

    /// Register size is not a non-negative integer
    #[error("Invalid register size {value} ({type_name}) in upgrader '{upgrader}'; a non-negative integer is expected")]
    InvalidRegisterSize {
        /// Upgrader being validated
        upgrader: String,
        /// Rendered register size
        value: String,
        /// Type of the register size value
        type_name: &'static str,
    },

    /// Opcode mnemonic is not known to the mobile interpreter
    #[error("Unknown opcode '{opcode}' in upgrader '{upgrader}'")]
    UnknownOpCode {
        /// Upgrader being validated
        upgrader: String,
        /// Offending mnemonic
        opcode: String,
    },

    /// Instruction is not an `[opcode, X, N]` triple
    #[error("Malformed instruction {value} in upgrader '{upgrader}'; expected [opcode, X, N]")]
    MalformedInstruction {
        /// Upgrader being validated
        upgrader: String,
        /// Rendered instruction
        value: String,
    },

    /// Operator entry is not a `[name, overload, num_args]` triple
    #[error(
        "Malformed operator {value} in upgrader '{upgrader}'; expected [name, overload_name, num_args]"
    )]
    MalformedOperator {
        /// Upgrader being validated
        upgrader: String,
        /// Rendered operator entry
        value: String,
    },

    /// Type descriptor is not a string, or a table is not a sequence
    #[error("Malformed {field} table in upgrader '{upgrader}': {value}")]
    MalformedTable {
        /// Upgrader being validated
        upgrader: String,
        /// Table kind
        field: &'static str,
        /// Rendered offending value
        value: String,
    },

    /// Version bounds cannot be derived from an upgrader name
    #[error("Malformed upgrader name '{0}'; expected <op>_<overload>_<min>_<max>")]
    MalformedUpgraderName(String),

    /// Only one of min_version/max_version was supplied
    #[error("Upgrader entry '{0}' must supply both min_version and max_version or neither")]
    PartialVersionBounds(String),

    /// `min_version` is greater than `max_version`
    #[error("Invalid version range [{min}, {max}] for upgrader '{upgrader}'")]
    InvalidVersionRange {
        /// Upgrader the range belongs to
        upgrader: String,
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
}

/// Result type for bytecode operations
pub type Result<T> = std::result::Result<T, BytecodeError>;
