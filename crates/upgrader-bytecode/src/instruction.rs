//! Mobile interpreter instructions (opcodes)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BytecodeError, Result};

/// Opcodes understood by the mobile interpreter.
///
/// Mirrors the runtime's opcode table; an upgrader may only use these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
pub enum OpCode {
    // ==================== Calls ====================
    /// Invoke operator X
    OP,
    /// Invoke vararg operator X with N arguments
    OPN,
    /// Call function X
    CALL,
    /// Replace the current frame with function X
    TAIL_CALL,
    /// Call method X on the first of N arguments
    INTERFACE_CALL,
    /// Callback from the profile function table at X
    PROFILE_OP,

    // ==================== Registers ====================
    /// Push register X
    LOAD,
    /// Push register X and clear it
    MOVE,
    /// Store N values to registers [X, X+N)
    STOREN,
    /// Store one value to register X
    STORE,
    /// Drop the top of the stack
    DROP,
    /// Clear register X
    DROPR,
    /// Push constant X
    LOADC,

    // ==================== Control flow ====================
    /// Pop; branch by X if false
    JF,
    /// Unconditional branch by X
    JMP,
    /// Loop; X is the branch taken when the condition is false
    LOOP,
    /// Exit execution
    RET,
    /// Wait for a future
    WAIT,
    /// Check a guard against the type table
    GUARD,
    /// Check N input types against types[X..X+N]
    TYPECHECK,
    /// Fail a guard
    FAIL_GUARD,
    /// Raise an exception
    RAISE_EXCEPTION,
    /// Emit a warning
    WARN,
    /// Enter a context manager scope
    ENTER,
    /// Exit the last entered context manager
    EXIT,
    /// Launch code entry X with N inputs on another thread
    FORK,
    /// Initialize an await for code entry X with N inputs
    AWAITABLE,

    // ==================== Objects ====================
    /// Get attribute from slot X
    GET_ATTR,
    /// Set attribute at slot X
    SET_ATTR,
    /// Create an object of type X
    CREATE_OBJECT,
    /// Check an object against types[X..X+N]
    ISINSTANCE,
    /// Unchecked cast
    UNCHECKED_CAST,

    // ==================== Containers ====================
    /// Unpack a list of length X
    LIST_UNPACK,
    /// Construct a tuple from X inputs
    TUPLE_CONSTRUCT,
    /// Construct a named tuple of type X from N inputs
    NAMED_TUPLE_CONSTRUCT,
    /// Construct a list of type X from N inputs
    LIST_CONSTRUCT,
    /// Construct a dict of type X from N inputs
    DICT_CONSTRUCT,
    /// Slice tuple[X..X+N]
    TUPLE_SLICE,
    /// Index into a tuple
    TUPLE_INDEX,
    /// Index into a dict
    DICT_INDEX,
    /// Convert the input to a list
    TO_LIST,

    // ==================== Builtins ====================
    /// `is`
    __IS__,
    /// `is not`
    __ISNOT__,
    /// `not`
    __NOT__,
    /// Default value for an uninitialized variable
    UN_INITIALIZED,
    /// String format with X inputs
    FORMAT,
    /// Tensor device
    DEVICE,
    /// Tensor dtype
    DTYPE,
    /// Tensor dim
    DIM,
    /// Scalar to tensor
    NUM_TO_TENSOR,
    /// Tensor is_cuda
    IS_CUDA,
}

impl OpCode {
    /// Every opcode, in table order
    pub const ALL: &'static [OpCode] = &[
        Self::OP,
        Self::OPN,
        Self::CALL,
        Self::TAIL_CALL,
        Self::INTERFACE_CALL,
        Self::PROFILE_OP,
        Self::LOAD,
        Self::MOVE,
        Self::STOREN,
        Self::STORE,
        Self::DROP,
        Self::DROPR,
        Self::LOADC,
        Self::JF,
        Self::JMP,
        Self::LOOP,
        Self::RET,
        Self::WAIT,
        Self::GUARD,
        Self::TYPECHECK,
        Self::FAIL_GUARD,
        Self::RAISE_EXCEPTION,
        Self::WARN,
        Self::ENTER,
        Self::EXIT,
        Self::FORK,
        Self::AWAITABLE,
        Self::GET_ATTR,
        Self::SET_ATTR,
        Self::CREATE_OBJECT,
        Self::ISINSTANCE,
        Self::UNCHECKED_CAST,
        Self::LIST_UNPACK,
        Self::TUPLE_CONSTRUCT,
        Self::NAMED_TUPLE_CONSTRUCT,
        Self::LIST_CONSTRUCT,
        Self::DICT_CONSTRUCT,
        Self::TUPLE_SLICE,
        Self::TUPLE_INDEX,
        Self::DICT_INDEX,
        Self::TO_LIST,
        Self::__IS__,
        Self::__ISNOT__,
        Self::__NOT__,
        Self::UN_INITIALIZED,
        Self::FORMAT,
        Self::DEVICE,
        Self::DTYPE,
        Self::DIM,
        Self::NUM_TO_TENSOR,
        Self::IS_CUDA,
    ];

    /// The mnemonic used in descriptions and generated source
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::OP => "OP",
            Self::OPN => "OPN",
            Self::CALL => "CALL",
            Self::TAIL_CALL => "TAIL_CALL",
            Self::INTERFACE_CALL => "INTERFACE_CALL",
            Self::PROFILE_OP => "PROFILE_OP",
            Self::LOAD => "LOAD",
            Self::MOVE => "MOVE",
            Self::STOREN => "STOREN",
            Self::STORE => "STORE",
            Self::DROP => "DROP",
            Self::DROPR => "DROPR",
            Self::LOADC => "LOADC",
            Self::JF => "JF",
            Self::JMP => "JMP",
            Self::LOOP => "LOOP",
            Self::RET => "RET",
            Self::WAIT => "WAIT",
            Self::GUARD => "GUARD",
            Self::TYPECHECK => "TYPECHECK",
            Self::FAIL_GUARD => "FAIL_GUARD",
            Self::RAISE_EXCEPTION => "RAISE_EXCEPTION",
            Self::WARN => "WARN",
            Self::ENTER => "ENTER",
            Self::EXIT => "EXIT",
            Self::FORK => "FORK",
            Self::AWAITABLE => "AWAITABLE",
            Self::GET_ATTR => "GET_ATTR",
            Self::SET_ATTR => "SET_ATTR",
            Self::CREATE_OBJECT => "CREATE_OBJECT",
            Self::ISINSTANCE => "ISINSTANCE",
            Self::UNCHECKED_CAST => "UNCHECKED_CAST",
            Self::LIST_UNPACK => "LIST_UNPACK",
            Self::TUPLE_CONSTRUCT => "TUPLE_CONSTRUCT",
            Self::NAMED_TUPLE_CONSTRUCT => "NAMED_TUPLE_CONSTRUCT",
            Self::LIST_CONSTRUCT => "LIST_CONSTRUCT",
            Self::DICT_CONSTRUCT => "DICT_CONSTRUCT",
            Self::TUPLE_SLICE => "TUPLE_SLICE",
            Self::TUPLE_INDEX => "TUPLE_INDEX",
            Self::DICT_INDEX => "DICT_INDEX",
            Self::TO_LIST => "TO_LIST",
            Self::__IS__ => "__IS__",
            Self::__ISNOT__ => "__ISNOT__",
            Self::__NOT__ => "__NOT__",
            Self::UN_INITIALIZED => "UN_INITIALIZED",
            Self::FORMAT => "FORMAT",
            Self::DEVICE => "DEVICE",
            Self::DTYPE => "DTYPE",
            Self::DIM => "DIM",
            Self::NUM_TO_TENSOR => "NUM_TO_TENSOR",
            Self::IS_CUDA => "IS_CUDA",
        }
    }

    /// Look up an opcode by mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == mnemonic)
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One `(opcode, X, N)` instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Opcode
    pub op: OpCode,
    /// First operand
    pub x: i64,
    /// Second operand
    pub n: i64,
}

impl Instruction {
    /// Create a new instruction
    #[inline]
    pub const fn new(op: OpCode, x: i64, n: i64) -> Self {
        Self { op, x, n }
    }

    /// Parse an `[opcode, X, N]` triple
    pub fn from_value(upgrader: &str, value: &Value) -> Result<Self> {
        let malformed = || BytecodeError::MalformedInstruction {
            upgrader: upgrader.to_string(),
            value: value.to_string(),
        };

        let [op, x, n] = value.as_array().map(Vec::as_slice).ok_or_else(malformed)? else {
            return Err(malformed());
        };

        let mnemonic = op.as_str().ok_or_else(malformed)?;
        let op = OpCode::from_mnemonic(mnemonic).ok_or_else(|| BytecodeError::UnknownOpCode {
            upgrader: upgrader.to_string(),
            opcode: mnemonic.to_string(),
        })?;
        let x = x.as_i64().ok_or_else(malformed)?;
        let n = n.as_i64().ok_or_else(malformed)?;

        Ok(Self { op, x, n })
    }
}
