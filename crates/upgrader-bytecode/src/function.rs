//! Upgrader bytecode functions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constant::Constant;
use crate::error::{BytecodeError, Result};
use crate::instruction::Instruction;
use crate::operator::OperatorString;
use crate::raw::{RawBytecodeDescription, value_type_name};

/// The five table kinds a bytecode description is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteCodeField {
    /// Instruction list
    Instructions,
    /// Constant table
    Constants,
    /// Type descriptor table
    Types,
    /// Operator call table
    Operators,
    /// Register count
    RegisterSize,
}

impl ByteCodeField {
    /// All kinds, in declaration order
    pub const ALL: [ByteCodeField; 5] = [
        Self::Instructions,
        Self::Constants,
        Self::Types,
        Self::Operators,
        Self::RegisterSize,
    ];

    /// Key used in descriptions
    pub fn key(self) -> &'static str {
        match self {
            Self::Instructions => "instructions",
            Self::Constants => "constants",
            Self::Types => "types",
            Self::Operators => "operators",
            Self::RegisterSize => "register_size",
        }
    }

    /// Look up a kind by key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl std::fmt::Display for ByteCodeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One validated table of a bytecode description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteCodeTable {
    /// Instruction list
    Instructions(Vec<Instruction>),
    /// Constant table
    Constants(Vec<Constant>),
    /// Type descriptor strings, parsed later by the runtime
    Types(Vec<String>),
    /// Operator calls
    Operators(Vec<OperatorString>),
    /// Register count
    RegisterSize(u32),
}

impl ByteCodeTable {
    /// Kind of this table
    pub fn field(&self) -> ByteCodeField {
        match self {
            Self::Instructions(_) => ByteCodeField::Instructions,
            Self::Constants(_) => ByteCodeField::Constants,
            Self::Types(_) => ByteCodeField::Types,
            Self::Operators(_) => ByteCodeField::Operators,
            Self::RegisterSize(_) => ByteCodeField::RegisterSize,
        }
    }

    /// Validate a raw `(key, value)` table entry
    pub fn parse(upgrader: &str, key: &str, value: &Value) -> Result<Self> {
        let field = ByteCodeField::from_key(key).ok_or_else(|| BytecodeError::UnknownByteCodeField {
            upgrader: upgrader.to_string(),
            field: key.to_string(),
        })?;

        let table = match field {
            ByteCodeField::Instructions => Self::Instructions(
                sequence(upgrader, field, value)?
                    .iter()
                    .map(|v| Instruction::from_value(upgrader, v))
                    .collect::<Result<_>>()?,
            ),
            ByteCodeField::Constants => Self::Constants(
                sequence(upgrader, field, value)?
                    .iter()
                    .map(|v| Constant::from_value(upgrader, v))
                    .collect::<Result<_>>()?,
            ),
            ByteCodeField::Types => Self::Types(
                sequence(upgrader, field, value)?
                    .iter()
                    .map(|v| {
                        v.as_str().map(str::to_string).ok_or_else(|| BytecodeError::MalformedTable {
                            upgrader: upgrader.to_string(),
                            field: field.key(),
                            value: v.to_string(),
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            ByteCodeField::Operators => Self::Operators(
                sequence(upgrader, field, value)?
                    .iter()
                    .map(|v| OperatorString::from_value(upgrader, v))
                    .collect::<Result<_>>()?,
            ),
            ByteCodeField::RegisterSize => Self::RegisterSize(
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| BytecodeError::InvalidRegisterSize {
                        upgrader: upgrader.to_string(),
                        value: value.to_string(),
                        type_name: value_type_name(value),
                    })?,
            ),
        };

        Ok(table)
    }
}

fn sequence<'a>(upgrader: &str, field: ByteCodeField, value: &'a Value) -> Result<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        // An empty table may come through as null
        Value::Null => Ok(<&[Value]>::default()),
        other => Err(BytecodeError::MalformedTable {
            upgrader: upgrader.to_string(),
            field: field.key(),
            value: other.to_string(),
        }),
    }
}

/// A validated upgrader: everything the runtime needs to register it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytecodeDescription {
    /// Unique upgrader name
    pub name: String,
    /// Instructions
    pub instructions: Vec<Instruction>,
    /// Constant table
    pub constants: Vec<Constant>,
    /// Type descriptor strings
    pub types: Vec<String>,
    /// Number of registers used
    pub register_size: u32,
    /// Operator calls made by the bytecode
    pub operators: Vec<OperatorString>,
}

impl BytecodeDescription {
    /// Create a new description builder
    pub fn builder(name: impl Into<String>) -> BytecodeDescriptionBuilder {
        BytecodeDescriptionBuilder::new(name)
    }

    /// Validate a raw description.
    ///
    /// Each of the five table kinds must appear exactly once.
    pub fn from_raw(raw: &RawBytecodeDescription) -> Result<Self> {
        let upgrader = raw.name.as_str();
        let mut builder = BytecodeDescriptionBuilder::new(upgrader);
        let mut seen = [false; ByteCodeField::ALL.len()];

        for (key, value) in &raw.tables {
            let table = ByteCodeTable::parse(upgrader, key, value)?;
            let field = table.field();
            let slot = &mut seen[field as usize];
            if *slot {
                return Err(BytecodeError::DuplicateByteCodeField {
                    upgrader: upgrader.to_string(),
                    field: field.key(),
                });
            }
            *slot = true;
            builder = builder.table(table);
        }

        if let Some(missing) = ByteCodeField::ALL
            .into_iter()
            .find(|field| !seen[*field as usize])
        {
            return Err(BytecodeError::MissingByteCodeField {
                upgrader: upgrader.to_string(),
                field: missing.key(),
            });
        }

        Ok(builder.build())
    }
}

/// Builder for creating descriptions
#[derive(Debug, Default)]
pub struct BytecodeDescriptionBuilder {
    name: String,
    instructions: Vec<Instruction>,
    constants: Vec<Constant>,
    types: Vec<String>,
    register_size: u32,
    operators: Vec<OperatorString>,
}

impl BytecodeDescriptionBuilder {
    /// Create a new description builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a whole table
    pub fn table(mut self, table: ByteCodeTable) -> Self {
        match table {
            ByteCodeTable::Instructions(v) => self.instructions = v,
            ByteCodeTable::Constants(v) => self.constants = v,
            ByteCodeTable::Types(v) => self.types = v,
            ByteCodeTable::Operators(v) => self.operators = v,
            ByteCodeTable::RegisterSize(n) => self.register_size = n,
        }
        self
    }

    /// Add a single instruction
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Add a constant
    pub fn constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    /// Add a type descriptor
    pub fn type_str(mut self, ty: impl Into<String>) -> Self {
        self.types.push(ty.into());
        self
    }

    /// Add an operator call
    pub fn operator(mut self, operator: OperatorString) -> Self {
        self.operators.push(operator);
        self
    }

    /// Set register count
    pub fn register_size(mut self, size: u32) -> Self {
        self.register_size = size;
        self
    }

    /// Build the description
    pub fn build(self) -> BytecodeDescription {
        BytecodeDescription {
            name: self.name,
            instructions: self.instructions,
            constants: self.constants,
            types: self.types,
            register_size: self.register_size,
            operators: self.operators,
        }
    }
}
